//! Batched translation. The first failing part fails the whole request.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use reel_inference::{InferenceError, Translator};
use reel_models::{BatchBounds, BatchWindow};

use super::window_params;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub parts: Option<Vec<String>>,
    pub batch_index: Option<usize>,
    pub batch_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated_batch: Vec<String>,
    #[serde(flatten)]
    pub bounds: BatchBounds,
    pub original_chars: usize,
    pub translated_chars: usize,
}

pub async fn translate_text(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TranslateRequest>,
) -> ApiResult<Json<TranslateResponse>> {
    let parts = request
        .parts
        .ok_or_else(|| ApiError::validation("Missing 'parts' field in request"))?;
    let (batch_index, batch_size) = window_params(
        request.batch_index,
        request.batch_size,
        state.pipeline.translate_batch_size,
    );
    let window = BatchWindow::new(&parts, batch_index, batch_size)?;
    let bounds = window.bounds();

    info!(
        kind = "translation",
        batch_index,
        start = bounds.batch_start,
        end = bounds.batch_end,
        total = bounds.total_parts,
        "Processing batch"
    );

    let translator = state.translator.as_ref();
    let translated = window
        .process_strict(move |index, part| {
            translate_part(translator, part, index, bounds.total_parts)
        })
        .await
        .map_err(|(index, e)| {
            error!(part = index + 1, error = %e, "Translation failed");
            metrics::record_batch("translation", index - bounds.batch_start, 1);
            ApiError::from_kind(
                e.kind(),
                format!("Translation failed at part {}: {}", index + 1, e),
            )
        })?;

    metrics::record_batch("translation", translated.len(), 0);

    let original_chars = window.items().iter().map(|p| p.chars().count()).sum();
    let translated_chars = translated.iter().map(|t| t.chars().count()).sum();

    Ok(Json(TranslateResponse {
        translated_batch: translated,
        bounds,
        original_chars,
        translated_chars,
    }))
}

async fn translate_part(
    translator: &dyn Translator,
    part: &str,
    index: usize,
    total: usize,
) -> Result<String, InferenceError> {
    if part.trim().is_empty() {
        // Keeps indexes aligned without calling a backend
        return Ok(String::new());
    }
    let translated = translator.translate(part).await?;
    info!(part = index + 1, total, chars = translated.chars().count(), "Part translated");
    Ok(translated)
}
