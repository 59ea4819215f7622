//! Text translation backends and the ordered fallback chain.

mod chain;
mod google;
mod huggingface;
mod libre;
mod mymemory;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::{InferenceError, InferenceResult};

pub use chain::TranslatorChain;
pub use google::GoogleTranslator;
pub use huggingface::{parse_hf_translation, HfTranslator};
pub use libre::LibreTranslator;
pub use mymemory::MyMemoryTranslator;

/// Label used in user-facing translation errors.
pub(crate) const SERVICE: &str = "Translation";

#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn translate(&self, text: &str) -> InferenceResult<String>;
}

/// A configurable translation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslatorKind {
    Helsinki,
    Nllb,
    MyMemory,
    LibreTranslate,
    Google,
}

pub const DEFAULT_TRANSLATOR_ORDER: &[TranslatorKind] = &[
    TranslatorKind::Helsinki,
    TranslatorKind::Nllb,
    TranslatorKind::MyMemory,
    TranslatorKind::LibreTranslate,
    TranslatorKind::Google,
];

impl TranslatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Helsinki => "helsinki",
            Self::Nllb => "nllb",
            Self::MyMemory => "mymemory",
            Self::LibreTranslate => "libretranslate",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for TranslatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslatorKind {
    type Err = InferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "helsinki" | "opus-mt" => Ok(Self::Helsinki),
            "nllb" => Ok(Self::Nllb),
            "mymemory" => Ok(Self::MyMemory),
            "libretranslate" | "libre" => Ok(Self::LibreTranslate),
            "google" => Ok(Self::Google),
            other => Err(InferenceError::UnknownTranslator(other.to_string())),
        }
    }
}

/// Parse a comma-separated translator list, dropping duplicates.
pub fn parse_translator_order(raw: &str) -> InferenceResult<Vec<TranslatorKind>> {
    let mut order = Vec::new();
    for name in raw.split(',').filter(|s| !s.trim().is_empty()) {
        let kind: TranslatorKind = name.parse()?;
        if !order.contains(&kind) {
            order.push(kind);
        }
    }
    if order.is_empty() {
        return Err(InferenceError::NoTranslators);
    }
    Ok(order)
}
