//! Ordered fallback across translation backends.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{
    GoogleTranslator, HfTranslator, LibreTranslator, MyMemoryTranslator, Translator, TranslatorKind,
};
use crate::config::InferenceConfig;
use crate::error::{InferenceError, InferenceResult};

/// Tries each translator in order until one succeeds. When all fail the
/// last error is returned.
pub struct TranslatorChain {
    translators: Vec<Arc<dyn Translator>>,
}

impl TranslatorChain {
    pub fn new(translators: Vec<Arc<dyn Translator>>) -> Self {
        Self { translators }
    }

    pub fn from_config(config: &InferenceConfig) -> InferenceResult<Self> {
        let mut translators: Vec<Arc<dyn Translator>> = Vec::new();
        for kind in &config.translator_order {
            let translator: Arc<dyn Translator> = match kind {
                TranslatorKind::Helsinki => Arc::new(HfTranslator::helsinki(config)?),
                TranslatorKind::Nllb => Arc::new(HfTranslator::nllb(config)?),
                TranslatorKind::MyMemory => Arc::new(MyMemoryTranslator::new(config)?),
                TranslatorKind::LibreTranslate => Arc::new(LibreTranslator::new(config)?),
                TranslatorKind::Google => Arc::new(GoogleTranslator::new(config)?),
            };
            translators.push(translator);
        }
        if translators.is_empty() {
            return Err(InferenceError::NoTranslators);
        }

        info!(
            order = %config
                .translator_order
                .iter()
                .map(TranslatorKind::as_str)
                .collect::<Vec<_>>()
                .join(","),
            "Translator chain configured"
        );
        Ok(Self::new(translators))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.translators.iter().map(|t| t.name()).collect()
    }
}

#[async_trait]
impl Translator for TranslatorChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    async fn translate(&self, text: &str) -> InferenceResult<String> {
        let mut last_error = None;

        for (position, translator) in self.translators.iter().enumerate() {
            match translator.translate(text).await {
                Ok(translated) => {
                    if position > 0 {
                        info!(translator = translator.name(), "Fallback translator succeeded");
                    }
                    return Ok(translated);
                }
                Err(e) => {
                    warn!(
                        translator = translator.name(),
                        error = %e,
                        "Translator failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(InferenceError::NoTranslators))
    }
}
