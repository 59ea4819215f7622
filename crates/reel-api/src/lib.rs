//! Axum HTTP API server for the story-to-video pipeline.
//!
//! Every endpoint is a stateless JSON POST handler. Batched endpoints process
//! one window of parts per call and return the cursor for the next window.

pub mod codec;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, PipelineConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::{AppState, Backends};
