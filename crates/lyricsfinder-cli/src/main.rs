use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lyricsfinder_acquire::{extract_lyric_lines, ContainerSelectors, GeniusClient, LyricsProvider, RetryPolicy};
use lyricsfinder_cache::LyricsCache;
use lyricsfinder_clean::ClassifierPatterns;
use lyricsfinder_model::LyricsOutcome;
use lyricsfinder_romanize::{KakasiRomanizer, Romanizer};
use lyricsfinder_service::{build_router, AppState, Pipeline, PipelineConfig, ServerInfo};

#[derive(Parser)]
#[command(name = "lyricsfinder")]
#[command(about = "Lyrics lookup with Japanese romanization and a SQLite cache")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP lyrics API
    Serve {
        /// Address to listen on
        #[arg(long, env = "LYRICSFINDER_BIND", default_value = "127.0.0.1:5000")]
        bind: String,

        /// Deployment name reported by /api/debug
        #[arg(long, env = "LYRICSFINDER_ENV", default_value = "development")]
        environment: String,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Fetch lyrics for one query and print them
    Fetch {
        /// Search text, e.g. "Lemon Kenshi Yonezu"
        query: String,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Extract and clean lyrics from a saved lyrics page
    Clean {
        /// Path to the HTML file
        html: PathBuf,

        /// Classifier pattern file (JSON)
        #[arg(long)]
        patterns: Option<PathBuf>,

        /// Skip romanization
        #[arg(long)]
        no_romanize: bool,
    },

    /// Romanize Japanese text read from stdin
    Romanize,
}

#[derive(Args)]
struct PipelineArgs {
    /// Genius API access token
    #[arg(long, env = "GENIUS_API_KEY", hide_env_values = true)]
    genius_token: Option<String>,

    /// SQLite cache file
    #[arg(long, env = "LYRICSFINDER_DB", default_value = "/tmp/lyrics_cache.db")]
    database: PathBuf,

    /// Classifier pattern file (JSON)
    #[arg(long)]
    patterns: Option<PathBuf>,

    /// Outbound HTTP timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,

    /// Search attempts before giving up on rate limiting
    #[arg(long, default_value_t = 4)]
    max_attempts: u32,

    /// Base backoff between rate-limited attempts, in milliseconds
    #[arg(long, default_value_t = 1000)]
    backoff_ms: u64,
}

fn load_patterns(path: Option<&PathBuf>) -> Result<ClassifierPatterns> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading classifier patterns");
            ClassifierPatterns::load(path)
        }
        None => Ok(ClassifierPatterns::default()),
    }
}

async fn build_pipeline(args: &PipelineArgs) -> Result<Pipeline> {
    let provider: Option<Arc<dyn LyricsProvider>> = match args.genius_token.as_deref() {
        Some(token) if !token.trim().is_empty() => {
            let client = GeniusClient::new(token.trim(), Duration::from_secs(args.timeout_secs))
                .context("Failed to build Genius HTTP client")?;
            Some(Arc::new(client) as Arc<dyn LyricsProvider>)
        }
        _ => {
            tracing::error!("GENIUS_API_KEY is not set; only cached lyrics can be served");
            None
        }
    };

    let cache = LyricsCache::connect(&args.database)
        .await
        .with_context(|| format!("Failed to open cache at {}", args.database.display()))?;

    let config = PipelineConfig {
        retry: RetryPolicy {
            max_attempts: args.max_attempts.max(1),
            base_delay: Duration::from_millis(args.backoff_ms),
        },
        selectors: ContainerSelectors::default(),
        patterns: load_patterns(args.patterns.as_ref())?,
    };

    Ok(Pipeline::new(provider, Arc::new(KakasiRomanizer), cache, config))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing and SQL crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn,sqlx=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn,sqlx=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    match cli.command {
        Commands::Serve { bind, environment, pipeline } => {
            let database_path = pipeline.database.display().to_string();
            let pipeline = build_pipeline(&pipeline).await?;
            let state = AppState::new(pipeline, ServerInfo { environment, database_path });
            let app = build_router(state.clone());

            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("Failed to bind {bind}"))?;
            tracing::info!(addr = %bind, "Listening");

            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    tokio::signal::ctrl_c().await.ok();
                    tracing::info!("Shutting down");
                })
                .await?;

            state.pipeline.cache().close().await;
        }
        Commands::Fetch { query, pipeline } => {
            tracing::info!(query = %query, "Fetching lyrics");
            let pipeline = build_pipeline(&pipeline).await?;
            let outcome = pipeline.fetch(&query).await;
            pipeline.cache().close().await;

            match outcome? {
                LyricsOutcome::NoResults => {
                    tracing::warn!(query = %query, "No search results");
                }
                outcome => println!("{}", outcome.lyrics()),
            }
        }
        Commands::Clean { html, patterns, no_romanize } => {
            tracing::info!(html = %html.display(), "Cleaning lyrics page");
            let page = std::fs::read_to_string(&html)
                .with_context(|| format!("Failed to read {}", html.display()))?;
            let patterns = load_patterns(patterns.as_ref())?;

            let Some(lines) = extract_lyric_lines(&page, &ContainerSelectors::default()) else {
                anyhow::bail!("No lyrics container found in {}", html.display());
            };

            for line in lyricsfinder_clean::classify_lines(lines.as_slice(), &patterns) {
                tracing::debug!(decision = ?line.decision, state = ?line.state, "{}", line.text);
            }

            let block = lyricsfinder_clean::clean(lines.as_slice(), &patterns);
            if no_romanize {
                println!("{}", block.as_str());
            } else {
                println!("{}", KakasiRomanizer.romanize(block.as_str()));
            }
        }
        Commands::Romanize => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            print!("{}", KakasiRomanizer.romanize(&input));
        }
    }

    Ok(())
}
