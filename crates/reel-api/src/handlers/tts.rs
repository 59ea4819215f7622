//! Batched narration audio.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};

use reel_inference::Voice;
use reel_models::{count_words, round2, AudioItem, BatchEnvelope, BatchWindow, EMPTY_TEXT_ERROR};

use super::window_params;
use crate::codec;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::metrics;
use crate::state::AppState;

/// Narration pace used when the audio cannot be probed.
const ESTIMATED_WORDS_PER_MINUTE: f64 = 150.0;

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    pub parts: Option<Vec<String>>,
    pub batch_index: Option<usize>,
    pub batch_size: Option<usize>,
    pub voice_lang: Option<String>,
    /// Slow speech when true
    pub voice_speed: Option<bool>,
}

pub async fn generate_tts(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TtsRequest>,
) -> ApiResult<Json<BatchEnvelope<AudioItem>>> {
    let parts = request
        .parts
        .ok_or_else(|| ApiError::validation("Missing 'parts' field in request"))?;
    let (batch_index, batch_size) =
        window_params(request.batch_index, request.batch_size, state.pipeline.tts_batch_size);
    let window = BatchWindow::new(&parts, batch_index, batch_size)?;
    let voice = Voice::new(request.voice_lang.as_deref(), request.voice_speed.unwrap_or(false));

    info!(
        kind = "audio",
        batch_index,
        start = window.bounds().batch_start,
        end = window.bounds().batch_end,
        total = window.bounds().total_parts,
        lang = voice.lang(),
        slow = voice.is_slow(),
        "Processing batch"
    );

    let state_ref = &state;
    let voice_ref = &voice;
    let items = window
        .process_isolated(move |index, part| synthesize_part(state_ref, voice_ref, part, index))
        .await;

    let envelope = BatchEnvelope::new(items, window.bounds());
    let failed = envelope.failed_count();
    metrics::record_batch("audio", envelope.items.len() - failed, failed);

    Ok(Json(envelope))
}

async fn synthesize_part(
    state: &AppState,
    voice: &Voice,
    text: &str,
    index: usize,
) -> ApiResult<AudioItem> {
    if text.trim().is_empty() {
        return Err(ApiError::validation(EMPTY_TEXT_ERROR));
    }

    let audio = state.speech.synthesize(text, voice).await.map_err(|e| {
        warn!(part = index + 1, error = %e, "Audio generation failed");
        ApiError::from(e)
    })?;

    let duration = match state.media.audio_duration(&audio).await {
        Ok(duration) => duration,
        Err(e) => {
            let estimated = count_words(text) as f64 / ESTIMATED_WORDS_PER_MINUTE * 60.0;
            warn!(part = index + 1, error = %e, estimated, "Could not probe audio duration");
            estimated
        }
    };

    info!(part = index + 1, duration, size = audio.len(), "Audio generated");

    Ok(AudioItem {
        audio: Some(codec::encode(&audio)),
        duration: round2(duration),
        size: audio.len(),
        format: Some("mp3".to_string()),
        error: None,
    })
}
