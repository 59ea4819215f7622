//! Video thumbnail.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use reel_inference::ImageRequest;
use reel_text::{thumbnail_prompt, ThumbnailStyle};

use crate::codec;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ThumbnailRequest {
    pub title: Option<String>,
    /// Accepted for compatibility; the prompt is derived from the title
    pub description: Option<String>,
    pub style: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ThumbnailResponse {
    pub thumbnail: String,
    pub width: u32,
    pub height: u32,
    pub size: usize,
    pub format: String,
}

pub async fn generate_thumbnail(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ThumbnailRequest>,
) -> ApiResult<Json<ThumbnailResponse>> {
    let title = request
        .title
        .ok_or_else(|| ApiError::validation("Missing 'title' field in request"))?;
    let style = request
        .style
        .as_deref()
        .map(ThumbnailStyle::from_name)
        .unwrap_or_default();

    let prompt = thumbnail_prompt(&title, style);
    let media = &state.pipeline.media;

    let background = state
        .images
        .generate(&ImageRequest::thumbnail(prompt))
        .await
        .map_err(|e| ApiError::from(e).context("Thumbnail generation failed"))?;
    let thumbnail = state
        .media
        .render_thumbnail(&background, &title)
        .await
        .map_err(|e| ApiError::from(e).context("Thumbnail generation failed"))?;

    info!(size = thumbnail.len(), style = ?style, "Thumbnail generated");

    Ok(Json(ThumbnailResponse {
        thumbnail: codec::encode(&thumbnail),
        width: media.thumbnail_width,
        height: media.thumbnail_height,
        size: thumbnail.len(),
        format: "jpeg".to_string(),
    }))
}
