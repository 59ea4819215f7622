//! Text-to-image prompts for part illustrations and thumbnails.

use serde::{Deserialize, Serialize};

use reel_models::truncate_chars;

pub const MAX_PROMPT_CHARS: usize = 200;

const IMAGE_BASE: &str = "dark atmospheric scene, horror, true crime story, cinematic lighting, \
                          dramatic shadows, mysterious";
const IMAGE_MODIFIERS: &str =
    "high quality, detailed, 4k, professional photography, moody, suspenseful";
const THUMBNAIL_MODIFIERS: &str = "high quality, detailed, 4k, professional photography, \
    YouTube thumbnail style, eye-catching, bold colors, high contrast";

/// Prompt for the illustration of one part.
///
/// Up to three words longer than four characters are taken from the first three
/// `.`-separated sentences.
pub fn image_prompt(text: &str) -> String {
    let context = text.split('.').take(3).collect::<Vec<_>>().join(". ");
    let key_words: Vec<&str> = context
        .split_whitespace()
        .filter(|w| w.chars().count() > 4)
        .take(3)
        .collect();

    compose(IMAGE_BASE, &key_words, IMAGE_MODIFIERS)
}

/// Visual direction of a thumbnail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailStyle {
    #[default]
    Horror,
    TrueCrime,
    /// Anything else falls back to a generic dramatic scene.
    #[serde(other)]
    Dramatic,
}

impl ThumbnailStyle {
    pub fn from_name(name: &str) -> Self {
        match name {
            "horror" => Self::Horror,
            "true_crime" => Self::TrueCrime,
            _ => Self::Dramatic,
        }
    }

    /// The requested style, overridden by genre words in the title.
    fn resolve(self, title_lower: &str) -> Self {
        if self == Self::Horror || title_lower.contains("horror") {
            Self::Horror
        } else if self == Self::TrueCrime || title_lower.contains("crime") {
            Self::TrueCrime
        } else {
            Self::Dramatic
        }
    }

    fn base(self) -> &'static str {
        match self {
            Self::Horror => "dark atmospheric horror scene, mysterious, suspenseful",
            Self::TrueCrime => "true crime scene, dramatic, investigative, mysterious",
            Self::Dramatic => "dramatic scene, cinematic",
        }
    }
}

/// Prompt for a thumbnail background.
pub fn thumbnail_prompt(title: &str, style: ThumbnailStyle) -> String {
    let lowered = title.to_lowercase();
    let key_words: Vec<&str> = lowered
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .take(3)
        .collect();

    compose(style.resolve(&lowered).base(), &key_words, THUMBNAIL_MODIFIERS)
}

fn compose(base: &str, key_words: &[&str], modifiers: &str) -> String {
    let prompt = if key_words.is_empty() {
        format!("{base}, {modifiers}")
    } else {
        format!("{base}, {}, {modifiers}", key_words.join(", "))
    };
    truncate_chars(&prompt, MAX_PROMPT_CHARS).to_string()
}
