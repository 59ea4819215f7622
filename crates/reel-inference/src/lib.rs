//! HTTP clients for the remote services the pipeline depends on.
//!
//! - Translation: Helsinki-NLP opus-mt, NLLB, MyMemory, LibreTranslate and
//!   Google, tried in a configurable order
//! - Speech synthesis for narration audio
//! - Text-to-image generation for part frames and thumbnails
//!
//! Every backend sits behind a trait so the API layer can swap in fakes.

pub mod config;
pub mod error;
mod http;
pub mod image;
pub mod retry;
pub mod translate;
pub mod tts;

pub use config::InferenceConfig;
pub use error::{InferenceError, InferenceResult};
pub use image::{HfImageGenerator, ImageGenerator, ImageRequest};
pub use retry::LoadingRetryPolicy;
pub use translate::{parse_translator_order, Translator, TranslatorChain, TranslatorKind};
pub use tts::{GoogleTts, SpeechSynthesizer, Voice, VALID_VOICE_LANGS};
