//! Generated titles, descriptions and tags.

use serde::{Deserialize, Serialize};

/// Metadata for one short video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartMetadata {
    /// 1-based part number
    pub part_number: usize,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Top keywords of the part
    pub key_phrases: Vec<String>,
}

/// Metadata for the long-form compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub total_parts: usize,
}
