//! MyMemory public translation API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{Translator, SERVICE};
use crate::config::InferenceConfig;
use crate::error::{InferenceError, InferenceResult};
use crate::http::{build_client, check_status, chunk_text};

/// The free tier rejects queries longer than this.
const MAX_QUERY_CHARS: usize = 500;

pub struct MyMemoryTranslator {
    http: Client,
    url: String,
    langpair: String,
}

impl MyMemoryTranslator {
    pub fn new(config: &InferenceConfig) -> InferenceResult<Self> {
        Ok(Self {
            http: build_client(SERVICE, config.translate_timeout)?,
            url: config.mymemory_url.clone(),
            langpair: format!("{}|{}", config.source_lang, config.target_lang),
        })
    }

    async fn translate_chunk(&self, chunk: &str) -> InferenceResult<String> {
        let response = self
            .http
            .get(&self.url)
            .query(&[("q", chunk), ("langpair", self.langpair.as_str())])
            .send()
            .await
            .map_err(|e| InferenceError::from_reqwest(SERVICE, e))?;
        let response = check_status(SERVICE, response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        parse_response(&body)
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    fn name(&self) -> &'static str {
        "mymemory"
    }

    async fn translate(&self, text: &str) -> InferenceResult<String> {
        let mut out = Vec::new();
        for chunk in chunk_text(text, MAX_QUERY_CHARS) {
            out.push(self.translate_chunk(&chunk).await?);
        }
        Ok(out.join(" "))
    }
}

/// `responseStatus` arrives as either a number or a string.
fn parse_response(body: &Value) -> InferenceResult<String> {
    let status = match body.get("responseStatus") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    };

    match status {
        Some(200) | None => {}
        Some(429) => return Err(InferenceError::RateLimited { service: SERVICE }),
        Some(code) => {
            let details = body
                .get("responseDetails")
                .and_then(Value::as_str)
                .unwrap_or("request rejected");
            return Err(InferenceError::upstream(SERVICE, Some(code as u16), details));
        }
    }

    body.pointer("/responseData/translatedText")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| InferenceError::InvalidResponse(body.to_string()))
}
