//! Cache-backed lyrics pipeline and its HTTP API.

pub mod pipeline;
pub mod server;

pub use pipeline::{Pipeline, PipelineConfig};
pub use server::{build_router, AppState, ServerInfo};
