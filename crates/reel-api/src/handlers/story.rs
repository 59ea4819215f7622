//! Transcript splitting.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use reel_models::SplitOutcome;
use reel_text::segment;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

/// Largest accepted `target_words`.
pub const MAX_TARGET_WORDS: usize = 100_000;

#[derive(Debug, Deserialize)]
pub struct SplitStoryRequest {
    pub text: Option<String>,
    pub target_words: Option<usize>,
}

/// Parts are returned as plain strings, ready to send to translation.
#[derive(Debug, Serialize)]
pub struct SplitStoryResponse {
    pub parts: Vec<String>,
    pub part_count: usize,
    pub total_words: usize,
    pub avg_words_per_part: usize,
    pub target_words: usize,
}

impl From<SplitOutcome> for SplitStoryResponse {
    fn from(outcome: SplitOutcome) -> Self {
        Self {
            parts: outcome.parts.into_iter().map(|p| p.text).collect(),
            part_count: outcome.part_count,
            total_words: outcome.total_words,
            avg_words_per_part: outcome.avg_words_per_part,
            target_words: outcome.target_words,
        }
    }
}

pub async fn split_story(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SplitStoryRequest>,
) -> ApiResult<Json<SplitStoryResponse>> {
    let text = request
        .text
        .ok_or_else(|| ApiError::validation("Missing 'text' field in request"))?;
    if text.trim().is_empty() {
        return Err(ApiError::validation("Text cannot be empty"));
    }

    let target_words = request
        .target_words
        .unwrap_or(state.pipeline.default_target_words);
    if target_words == 0 {
        return Err(ApiError::validation("target_words must be greater than 0"));
    }
    if target_words > MAX_TARGET_WORDS {
        return Err(ApiError::validation(format!(
            "target_words must be at most {MAX_TARGET_WORDS}"
        )));
    }

    let outcome = segment(&text, target_words)?;
    info!(
        parts = outcome.part_count,
        total_words = outcome.total_words,
        target_words,
        "Story split"
    );

    Ok(Json(outcome.into()))
}
