//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::handlers::{
    create_long_video, create_videos, extract_text, generate_images, generate_metadata,
    generate_thumbnail, generate_tts, health, split_story, translate_text,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let pipeline_routes = Router::new()
        .route("/split_story", post(split_story))
        .route("/translate_text", post(translate_text))
        .route("/generate_tts", post(generate_tts))
        .route("/generate_images", post(generate_images))
        .route("/create_videos", post(create_videos))
        .route("/create_long_video", post(create_long_video))
        .route("/generate_metadata", post(generate_metadata))
        .route("/generate_thumbnail", post(generate_thumbnail))
        .route("/extract_text", post(extract_text));

    let health_routes = Router::new().route("/health", get(health));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", pipeline_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        // Oversized bodies surface as JSON 413s through ApiJson
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_logging))
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
