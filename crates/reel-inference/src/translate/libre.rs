//! LibreTranslate (self-hosted or public instance).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Translator, SERVICE};
use crate::config::InferenceConfig;
use crate::error::{InferenceError, InferenceResult};
use crate::http::{build_client, check_status};

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

pub struct LibreTranslator {
    http: Client,
    url: String,
    api_key: Option<String>,
    source: String,
    target: String,
}

impl LibreTranslator {
    pub fn new(config: &InferenceConfig) -> InferenceResult<Self> {
        Ok(Self {
            http: build_client(SERVICE, config.translate_timeout)?,
            url: format!("{}/translate", config.libretranslate_url.trim_end_matches('/')),
            api_key: config.libretranslate_api_key.clone(),
            source: config.source_lang.clone(),
            target: config.target_lang.clone(),
        })
    }
}

#[async_trait]
impl Translator for LibreTranslator {
    fn name(&self) -> &'static str {
        "libretranslate"
    }

    async fn translate(&self, text: &str) -> InferenceResult<String> {
        let request = TranslateRequest {
            q: text,
            source: &self.source,
            target: &self.target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::from_reqwest(SERVICE, e))?;
        let response = check_status(SERVICE, response).await?;
        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        Ok(body.translated_text.trim().to_string())
    }
}
