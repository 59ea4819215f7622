//! Inference client configuration.

use std::time::Duration;

use tracing::warn;

use crate::retry::{LoadingRetryPolicy, DEFAULT_LOADING_DELAY, DEFAULT_LOADING_RETRIES};
use crate::translate::{parse_translator_order, TranslatorKind, DEFAULT_TRANSLATOR_ORDER};

pub const DEFAULT_HF_API_BASE: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_IMAGE_MODEL: &str = "runwayml/stable-diffusion-v1-5";
pub const DEFAULT_MYMEMORY_URL: &str = "https://api.mymemory.translated.net/get";
pub const DEFAULT_LIBRETRANSLATE_URL: &str = "https://libretranslate.com";
pub const DEFAULT_GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Settings shared by the translation, speech and image clients.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Hosted inference API base (models are addressed as `{base}/models/{id}`)
    pub hf_api_base: String,
    /// Optional bearer token for the hosted inference API
    pub hf_token: Option<String>,
    pub image_model: String,
    pub translator_order: Vec<TranslatorKind>,
    pub source_lang: String,
    pub target_lang: String,
    pub libretranslate_url: String,
    pub libretranslate_api_key: Option<String>,
    pub mymemory_url: String,
    pub google_translate_url: String,
    pub tts_url: String,
    pub loading_retry: LoadingRetryPolicy,
    pub translate_timeout: Duration,
    pub image_timeout: Duration,
    pub tts_timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            hf_api_base: DEFAULT_HF_API_BASE.to_string(),
            hf_token: None,
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            translator_order: DEFAULT_TRANSLATOR_ORDER.to_vec(),
            source_lang: "en".to_string(),
            target_lang: "tl".to_string(),
            libretranslate_url: DEFAULT_LIBRETRANSLATE_URL.to_string(),
            libretranslate_api_key: None,
            mymemory_url: DEFAULT_MYMEMORY_URL.to_string(),
            google_translate_url: DEFAULT_GOOGLE_TRANSLATE_URL.to_string(),
            tts_url: DEFAULT_TTS_URL.to_string(),
            loading_retry: LoadingRetryPolicy::default(),
            translate_timeout: Duration::from_secs(30),
            image_timeout: Duration::from_secs(20),
            tts_timeout: Duration::from_secs(30),
        }
    }
}

impl InferenceConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let translator_order = match std::env::var("TRANSLATOR_ORDER") {
            Ok(raw) => match parse_translator_order(&raw) {
                Ok(order) => order,
                Err(e) => {
                    warn!("Ignoring TRANSLATOR_ORDER: {}", e);
                    defaults.translator_order.clone()
                }
            },
            Err(_) => defaults.translator_order.clone(),
        };

        Self {
            hf_api_base: env_or("HF_API_BASE", defaults.hf_api_base),
            hf_token: env_opt("HF_TOKEN"),
            image_model: env_or("IMAGE_MODEL", defaults.image_model),
            translator_order,
            source_lang: env_or("TRANSLATE_SOURCE_LANG", defaults.source_lang),
            target_lang: env_or("TRANSLATE_TARGET_LANG", defaults.target_lang),
            libretranslate_url: env_or("LIBRETRANSLATE_URL", defaults.libretranslate_url),
            libretranslate_api_key: env_opt("LIBRETRANSLATE_API_KEY"),
            mymemory_url: env_or("MYMEMORY_URL", defaults.mymemory_url),
            google_translate_url: env_or("GOOGLE_TRANSLATE_URL", defaults.google_translate_url),
            tts_url: env_or("TTS_URL", defaults.tts_url),
            loading_retry: LoadingRetryPolicy::new(
                env_parse("MODEL_LOADING_RETRIES").unwrap_or(DEFAULT_LOADING_RETRIES),
                env_parse("MODEL_LOADING_DELAY_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_LOADING_DELAY),
            ),
            translate_timeout: secs_or("TRANSLATE_TIMEOUT_SECS", defaults.translate_timeout),
            image_timeout: secs_or("IMAGE_TIMEOUT_SECS", defaults.image_timeout),
            tts_timeout: secs_or("TTS_TIMEOUT_SECS", defaults.tts_timeout),
        }
    }

    /// URL of a hosted model.
    pub fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.hf_api_base.trim_end_matches('/'), model)
    }
}

fn env_or(key: &str, default: String) -> String {
    env_opt(key).unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn secs_or(key: &str, default: Duration) -> Duration {
    env_parse(key).map(Duration::from_secs).unwrap_or(default)
}
