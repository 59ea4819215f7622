//! Batched illustration images.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};

use reel_inference::ImageRequest;
use reel_media::{optimize_jpeg, MediaError};
use reel_models::{BatchEnvelope, BatchWindow, ImageItem, EMPTY_TEXT_ERROR};
use reel_text::image_prompt;

use super::window_params;
use crate::codec;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ImagesRequest {
    pub parts: Option<Vec<String>>,
    pub batch_index: Option<usize>,
    pub batch_size: Option<usize>,
}

pub async fn generate_images(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ImagesRequest>,
) -> ApiResult<Json<BatchEnvelope<ImageItem>>> {
    let parts = request
        .parts
        .ok_or_else(|| ApiError::validation("Missing 'parts' field in request"))?;
    let (batch_index, batch_size) =
        window_params(request.batch_index, request.batch_size, state.pipeline.image_batch_size);
    let window = BatchWindow::new(&parts, batch_index, batch_size)?;

    info!(
        kind = "image",
        batch_index,
        start = window.bounds().batch_start,
        end = window.bounds().batch_end,
        total = window.bounds().total_parts,
        "Processing batch"
    );

    let state_ref = &state;
    let items = window
        .process_isolated(move |index, part| generate_part_image(state_ref, part, index))
        .await;

    let envelope = BatchEnvelope::new(items, window.bounds());
    let failed = envelope.failed_count();
    metrics::record_batch("image", envelope.items.len() - failed, failed);

    Ok(Json(envelope))
}

async fn generate_part_image(state: &AppState, text: &str, index: usize) -> ApiResult<ImageItem> {
    if text.trim().is_empty() {
        return Err(ApiError::validation(EMPTY_TEXT_ERROR));
    }

    let prompt = image_prompt(text);
    let raw = state
        .images
        .generate(&ImageRequest::part(prompt.clone()))
        .await
        .map_err(|e| {
            warn!(part = index + 1, error = %e, "Image generation failed");
            ApiError::from(e)
        })?;

    let media = &state.pipeline.media;
    let (max_width, max_height) = (media.width, media.height);
    let max_bytes = state.pipeline.image_max_bytes;
    let optimized =
        tokio::task::spawn_blocking(move || optimize_jpeg(&raw, max_width, max_height, max_bytes))
            .await
            .map_err(|e| ApiError::internal(format!("Image task failed: {e}")))?
            .map_err(|e| match e {
                MediaError::InvalidImage(detail) => {
                    ApiError::decode(format!("Invalid image response: {detail}"))
                }
                other => ApiError::from(other),
            })?;

    info!(
        part = index + 1,
        width = optimized.width,
        height = optimized.height,
        size = optimized.bytes.len(),
        "Image generated"
    );

    Ok(ImageItem {
        image: Some(codec::encode(&optimized.bytes)),
        width: optimized.width,
        height: optimized.height,
        size: optimized.bytes.len(),
        format: Some("jpeg".to_string()),
        prompt: Some(prompt),
        error: None,
    })
}
