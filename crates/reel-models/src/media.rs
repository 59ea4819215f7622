//! Media envelopes returned by the batched generation endpoints.
//!
//! Binary payloads travel as base64 strings. A failed slot carries `null` media,
//! zeroed metadata and an `error` message.

use serde::{Deserialize, Serialize};

use crate::batch::{BatchKind, FailedItem};

/// Synthesized narration for one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioItem {
    /// Base64 encoded MP3
    pub audio: Option<String>,
    /// Seconds, rounded to two decimals
    pub duration: f64,
    /// Decoded size in bytes
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchKind for AudioItem {
    const FIELD: &'static str = "audio_batch";
}

impl FailedItem for AudioItem {
    fn failed(error: String) -> Self {
        Self {
            audio: None,
            duration: 0.0,
            size: 0,
            format: None,
            error: Some(error),
        }
    }
}

/// Generated illustration for one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    /// Base64 encoded JPEG
    pub image: Option<String>,
    pub width: u32,
    pub height: u32,
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Prompt sent to the image model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchKind for ImageItem {
    const FIELD: &'static str = "image_batch";
}

impl FailedItem for ImageItem {
    fn failed(error: String) -> Self {
        Self {
            image: None,
            width: 0,
            height: 0,
            size: 0,
            format: None,
            prompt: None,
            error: Some(error),
        }
    }
}

/// Composed vertical video for one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoItem {
    /// Base64 encoded MP4
    pub video: Option<String>,
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchKind for VideoItem {
    const FIELD: &'static str = "video_batch";
}

impl FailedItem for VideoItem {
    fn failed(error: String) -> Self {
        Self {
            video: None,
            duration: 0.0,
            width: 0,
            height: 0,
            size: 0,
            format: None,
            fps: None,
            error: Some(error),
        }
    }
}
