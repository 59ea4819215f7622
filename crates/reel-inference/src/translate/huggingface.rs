//! Hosted seq2seq translation models (Helsinki-NLP opus-mt, NLLB).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{Translator, SERVICE};
use crate::config::InferenceConfig;
use crate::error::{InferenceError, InferenceResult};
use crate::http::{build_client, check_status};
use crate::retry::LoadingRetryPolicy;

pub const NLLB_MODEL: &str = "facebook/nllb-200-distilled-600M";

pub struct HfTranslator {
    name: &'static str,
    http: Client,
    url: String,
    token: Option<String>,
    retry: LoadingRetryPolicy,
    parameters: Option<Value>,
}

impl HfTranslator {
    /// Helsinki-NLP opus-mt model for the configured language pair.
    pub fn helsinki(config: &InferenceConfig) -> InferenceResult<Self> {
        let model = format!("Helsinki-NLP/opus-mt-{}-{}", config.source_lang, config.target_lang);
        Self::build("helsinki", config, &model, None)
    }

    pub fn nllb(config: &InferenceConfig) -> InferenceResult<Self> {
        let parameters = json!({
            "src_lang": nllb_code(&config.source_lang),
            "tgt_lang": nllb_code(&config.target_lang),
        });
        Self::build("nllb", config, NLLB_MODEL, Some(parameters))
    }

    fn build(
        name: &'static str,
        config: &InferenceConfig,
        model: &str,
        parameters: Option<Value>,
    ) -> InferenceResult<Self> {
        Ok(Self {
            name,
            http: build_client(SERVICE, config.translate_timeout)?,
            url: config.model_url(model),
            token: config.hf_token.clone(),
            retry: config.loading_retry,
            parameters,
        })
    }

    async fn request_once(&self, text: &str) -> InferenceResult<String> {
        let mut payload = json!({
            "inputs": text,
            "options": {"wait_for_model": true},
        });
        if let Some(parameters) = &self.parameters {
            payload["parameters"] = parameters.clone();
        }

        let mut builder = self.http.post(&self.url).json(&payload);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| InferenceError::from_reqwest(SERVICE, e))?;
        let response = check_status(SERVICE, response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        parse_hf_translation(&body)
    }
}

#[async_trait]
impl Translator for HfTranslator {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn translate(&self, text: &str) -> InferenceResult<String> {
        self.retry.run(self.name, || self.request_once(text)).await
    }
}

/// Accepts `[{"translation_text": ..}]`, `["..."]` or a bare object.
pub fn parse_hf_translation(body: &Value) -> InferenceResult<String> {
    let first = match body {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(body),
        _ => None,
    };

    let text = first.and_then(|item| match item {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map
            .get("translation_text")
            .or_else(|| map.get("generated_text"))
            .and_then(Value::as_str),
        _ => None,
    });

    match text {
        Some(text) => Ok(text.trim().to_string()),
        None => Err(InferenceError::InvalidResponse(body.to_string())),
    }
}

/// FLORES-200 code for an ISO 639-1 language.
fn nllb_code(lang: &str) -> &str {
    match lang {
        "en" => "eng_Latn",
        "tl" => "tgl_Latn",
        "es" => "spa_Latn",
        "fr" => "fra_Latn",
        "de" => "deu_Latn",
        "it" => "ita_Latn",
        "pt" => "por_Latn",
        "ja" => "jpn_Jpan",
        "ko" => "kor_Hang",
        "zh" => "zho_Hans",
        "hi" => "hin_Deva",
        "ar" => "arb_Arab",
        other => other,
    }
}
