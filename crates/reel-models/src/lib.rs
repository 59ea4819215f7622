//! Shared data models for the StoryReel pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Story parts produced by the segmenter
//! - Batch windows and per-item results for the batched endpoints
//! - Media envelopes (audio, image, video, thumbnail) returned to the caller
//! - Generated video metadata
//! - Encoding configuration shared by the media layer

pub mod batch;
pub mod encoding;
pub mod error;
pub mod media;
pub mod metadata;
pub mod story;
pub mod utils;

// Re-export common types
pub use batch::{
    BatchBounds, BatchEnvelope, BatchError, BatchKind, BatchWindow, FailedItem, PartResult,
    EMPTY_TEXT_ERROR,
};
pub use encoding::EncodingConfig;
pub use error::ErrorKind;
pub use media::{AudioItem, ImageItem, VideoItem};
pub use metadata::{FullMetadata, PartMetadata};
pub use story::{SplitOutcome, StoryPart};
pub use utils::{count_words, round2, truncate_chars};
