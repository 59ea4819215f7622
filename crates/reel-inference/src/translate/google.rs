//! Google Translate web endpoint (`client=gtx`).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{Translator, SERVICE};
use crate::config::InferenceConfig;
use crate::error::{InferenceError, InferenceResult};
use crate::http::{build_client, check_status};

pub struct GoogleTranslator {
    http: Client,
    url: String,
    source: String,
    target: String,
}

impl GoogleTranslator {
    pub fn new(config: &InferenceConfig) -> InferenceResult<Self> {
        Ok(Self {
            http: build_client(SERVICE, config.translate_timeout)?,
            url: config.google_translate_url.clone(),
            source: config.source_lang.clone(),
            target: config.target_lang.clone(),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn translate(&self, text: &str) -> InferenceResult<String> {
        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| InferenceError::from_reqwest(SERVICE, e))?;
        let response = check_status(SERVICE, response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        parse_segments(&body)
    }
}

/// The response nests translated segments as `[[["out", "in", ..], ..], ..]`.
fn parse_segments(body: &Value) -> InferenceResult<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| InferenceError::InvalidResponse(body.to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        return Err(InferenceError::InvalidResponse(body.to_string()));
    }
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_segments() {
        let body = json!([
            [
                ["Magandang gabi. ", "Good night. ", null],
                ["Paalam.", "Goodbye.", null]
            ],
            null,
            "en"
        ]);
        assert_eq!(parse_segments(&body).unwrap(), "Magandang gabi. Paalam.");
        assert!(parse_segments(&json!({"x": 1})).is_err());
        assert!(parse_segments(&json!([[]])).is_err());
    }

    #[tokio::test]
    async fn test_translate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("client", "gtx"))
            .and(query_param("tl", "tl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[["Kumusta", "Hello"]]])))
            .mount(&server)
            .await;

        let config = InferenceConfig {
            google_translate_url: server.uri(),
            ..Default::default()
        };
        let translator = GoogleTranslator::new(&config).unwrap();
        assert_eq!(translator.translate("Hello").await.unwrap(), "Kumusta");
    }
}
