//! Pure text processing for the StoryReel pipeline.
//!
//! - [`segmenter`]: transcript cleaning and target-length splitting
//! - [`metadata`]: titles, descriptions and tags for each part and the compilation
//! - [`prompt`]: image generation prompts
//! - [`wrap`]: greedy word wrapping for on-screen text

pub mod metadata;
pub mod prompt;
pub mod segmenter;
pub mod wrap;

pub use metadata::{extract_key_phrases, MetadataGenerator, MetadataTemplate};
pub use prompt::{image_prompt, thumbnail_prompt, ThumbnailStyle};
pub use segmenter::{clean_transcript, segment, split_into_parts, split_sentences, SegmentError};
pub use wrap::{wrap_words, SUBTITLE_LINE_CHARS};
