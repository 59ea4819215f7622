//! Part video composition and the long-form compilation.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use reel_media::PartInputs;
use reel_models::{round2, BatchEnvelope, BatchWindow, VideoItem};

use super::window_params;
use crate::codec;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::metrics;
use crate::state::AppState;

/// Seconds assumed when an audio entry carries no duration.
pub const DEFAULT_AUDIO_DURATION: f64 = 10.0;

/// An `audio_batch` item from the TTS endpoint. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioInput {
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// An `image_batch` item from the image endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageInput {
    #[serde(default)]
    pub image: Option<String>,
}

/// A `video_batch` item from [`create_videos`].
#[derive(Debug, Clone, Deserialize)]
pub struct VideoInput {
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVideosRequest {
    pub audio_files: Option<Vec<AudioInput>>,
    pub image_files: Option<Vec<ImageInput>>,
    pub translated_parts: Option<Vec<String>>,
    pub batch_index: Option<usize>,
    pub batch_size: Option<usize>,
}

pub async fn create_videos(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateVideosRequest>,
) -> ApiResult<Json<BatchEnvelope<VideoItem>>> {
    let (Some(audio_files), Some(image_files), Some(parts)) =
        (request.audio_files, request.image_files, request.translated_parts)
    else {
        return Err(ApiError::validation(
            "Missing required fields: audio_files, image_files, translated_parts",
        ));
    };
    if audio_files.len() != image_files.len() || audio_files.len() != parts.len() {
        return Err(ApiError::validation(
            "audio_files, image_files, and translated_parts must have the same length",
        ));
    }

    let (batch_index, batch_size) =
        window_params(request.batch_index, request.batch_size, state.pipeline.video_batch_size);
    let window = BatchWindow::new(&parts, batch_index, batch_size)?;

    info!(
        kind = "video",
        batch_index,
        start = window.bounds().batch_start,
        end = window.bounds().batch_end,
        total = window.bounds().total_parts,
        "Processing batch"
    );

    let state_ref = &state;
    let (audio_ref, image_ref) = (&audio_files, &image_files);
    let items = window
        .process_isolated(move |index, subtitle| {
            compose_part(state_ref, &audio_ref[index], &image_ref[index], subtitle, index)
        })
        .await;

    let envelope = BatchEnvelope::new(items, window.bounds());
    let failed = envelope.failed_count();
    metrics::record_batch("video", envelope.items.len() - failed, failed);

    Ok(Json(envelope))
}

async fn compose_part(
    state: &AppState,
    audio: &AudioInput,
    image: &ImageInput,
    subtitle: &str,
    index: usize,
) -> ApiResult<VideoItem> {
    let audio_bytes = codec::decode_required("audio", audio.audio.as_deref())?;
    let image_bytes = codec::decode_required("image", image.image.as_deref())?;
    let duration = audio.duration.unwrap_or(DEFAULT_AUDIO_DURATION);

    let video = state
        .media
        .compose_part(PartInputs {
            image: &image_bytes,
            audio: &audio_bytes,
            subtitle,
            duration,
        })
        .await
        .map_err(|e| {
            warn!(part = index + 1, error = %e, "Video creation failed");
            ApiError::from(e)
        })?;

    info!(
        part = index + 1,
        duration = video.duration,
        size = video.bytes.len(),
        reencoded = video.reencoded,
        "Video created"
    );

    let media = &state.pipeline.media;
    Ok(VideoItem {
        video: Some(codec::encode(&video.bytes)),
        duration: round2(video.duration),
        width: media.width,
        height: media.height,
        size: video.bytes.len(),
        format: Some("mp4".to_string()),
        fps: Some(media.fps),
        error: None,
    })
}

#[derive(Debug, Deserialize)]
pub struct LongVideoRequest {
    pub video_files: Option<Vec<VideoInput>>,
}

#[derive(Debug, Serialize)]
pub struct LongVideoResponse {
    pub video: String,
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub size: usize,
    pub format: String,
    pub total_parts: usize,
}

pub async fn create_long_video(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LongVideoRequest>,
) -> ApiResult<Json<LongVideoResponse>> {
    let video_files = request
        .video_files
        .ok_or_else(|| ApiError::validation("Missing 'video_files' field in request"))?;
    if video_files.is_empty() {
        return Err(ApiError::validation("video_files must be a non-empty array"));
    }

    let mut videos = Vec::with_capacity(video_files.len());
    for (index, file) in video_files.iter().enumerate() {
        let bytes = codec::decode_required("video", file.video.as_deref())
            .map_err(|e| e.context(&format!("Part {}", index + 1)))?;
        videos.push(bytes);
    }
    let total_duration: f64 = video_files.iter().filter_map(|f| f.duration).sum();

    info!(parts = videos.len(), duration = total_duration, "Creating long video");

    let combined = state.media.concat(&videos).await?;
    let media = &state.pipeline.media;

    info!(size = combined.len(), "Long video created");

    Ok(Json(LongVideoResponse {
        video: codec::encode(&combined),
        duration: round2(total_duration),
        width: media.width,
        height: media.height,
        size: combined.len(),
        format: "mp4".to_string(),
        total_parts: video_files.len(),
    }))
}
