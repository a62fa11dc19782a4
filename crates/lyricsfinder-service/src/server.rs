//! HTTP API: `GET /api/lyrics?query=...` (also `/lyrics` and `q=`).

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use lyricsfinder_model::FetchError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::pipeline::Pipeline;

/// Deployment details reported by `/api/debug`.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub environment: String,
    pub database_path: String,
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub info: ServerInfo,
}

impl AppState {
    pub fn new(pipeline: Pipeline, info: ServerInfo) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            info,
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/lyrics", get(get_lyrics))
        .route("/lyrics", get(get_lyrics))
        .route("/api/debug", get(debug_info))
        .route("/health", get(health_check))
        .layer(security_header(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .layer(security_header(header::X_FRAME_OPTIONS, "DENY"))
        .layer(security_header(header::X_XSS_PROTECTION, "1; mode=block"))
        .layer(security_header(
            header::STRICT_TRANSPORT_SECURITY,
            "max-age=31536000; includeSubDomains",
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn security_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

/// Query parameters for the lyrics endpoint; `q` is an alias for `query`.
#[derive(Debug, Deserialize)]
pub struct LyricsParams {
    pub query: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LyricsResponse {
    pub lyrics: String,
}

/// GET /api/lyrics?query=...
///
/// Returns `{"lyrics": "..."}`, with an empty string when the provider has
/// no hits for the query.
pub async fn get_lyrics(
    State(state): State<AppState>,
    params: Result<Query<LyricsParams>, QueryRejection>,
) -> Result<Json<LyricsResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let raw = [params.query, params.q]
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
        .unwrap_or_default();
    let outcome = state.pipeline.fetch(&raw).await?;
    Ok(Json(LyricsResponse {
        lyrics: outcome.into_lyrics(),
    }))
}

/// GET /api/debug
pub async fn debug_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "has_api_key": state.pipeline.has_provider(),
        "environment": state.info.environment,
        "database_path": state.info.database_path,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "lyricsfinder",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// A failure rendered as `{"error": "..."}` with a matching status.
#[derive(Debug)]
pub enum ApiError {
    /// The query string could not be decoded.
    BadRequest(String),
    Fetch(FetchError),
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

fn status_for(error: &FetchError) -> StatusCode {
    match error {
        FetchError::MissingQuery => StatusCode::BAD_REQUEST,
        FetchError::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
        FetchError::UpstreamRequestFailed(_) => StatusCode::BAD_GATEWAY,
        FetchError::ExtractionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        FetchError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => {
                tracing::warn!(kind = "bad_request", "{message}");
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::Fetch(e) => {
                let status = status_for(&e);
                if status.is_server_error() {
                    tracing::error!(kind = e.kind(), "{e}");
                } else {
                    tracing::warn!(kind = e.kind(), "{e}");
                }
                (status, e.to_string())
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
