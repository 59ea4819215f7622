//! Text-to-speech.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::InferenceConfig;
use crate::error::{InferenceError, InferenceResult};
use crate::http::{build_client, check_status, chunk_text};

const SERVICE: &str = "TTS";

/// Languages the speech endpoint accepts.
pub const VALID_VOICE_LANGS: &[&str] = &[
    "tl", "en", "es", "fr", "de", "it", "pt", "ja", "ko", "zh", "hi", "ar",
];
pub const DEFAULT_VOICE_LANG: &str = "tl";

/// Longest text the endpoint accepts in one request.
pub const TTS_CHUNK_CHARS: usize = 100;

const NORMAL_SPEED: &str = "1";
const SLOW_SPEED: &str = "0.3";

/// Voice selection for one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    lang: String,
    slow: bool,
}

impl Voice {
    /// Unsupported or missing languages fall back to Tagalog.
    pub fn new(lang: Option<&str>, slow: bool) -> Self {
        let lang = lang
            .map(|l| l.trim().to_lowercase())
            .filter(|l| VALID_VOICE_LANGS.contains(&l.as_str()))
            .unwrap_or_else(|| DEFAULT_VOICE_LANG.to_string());
        Self { lang, slow }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn is_slow(&self) -> bool {
        self.slow
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new(None, false)
    }
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Returns MP3 bytes.
    async fn synthesize(&self, text: &str, voice: &Voice) -> InferenceResult<Vec<u8>>;
}

/// Google Translate speech endpoint. Long text is sent in chunks and the
/// MP3 responses are concatenated.
pub struct GoogleTts {
    http: Client,
    url: String,
}

impl GoogleTts {
    pub fn new(config: &InferenceConfig) -> InferenceResult<Self> {
        Ok(Self {
            http: build_client(SERVICE, config.tts_timeout)?,
            url: config.tts_url.clone(),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, voice: &Voice) -> InferenceResult<Vec<u8>> {
        let chunks = chunk_text(text, TTS_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(InferenceError::upstream(SERVICE, None, "no text to speak"));
        }

        let total = chunks.len().to_string();
        let speed = if voice.is_slow() { SLOW_SPEED } else { NORMAL_SPEED };
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let textlen = chunk.chars().count().to_string();
            let idx_str = idx.to_string();
            let response = self
                .http
                .get(&self.url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", voice.lang()),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx_str.as_str()),
                    ("textlen", textlen.as_str()),
                    ("ttsspeed", speed),
                ])
                .send()
                .await
                .map_err(|e| InferenceError::from_reqwest(SERVICE, e))?;
            let response = check_status(SERVICE, response).await?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| InferenceError::from_reqwest(SERVICE, e))?;
            audio.extend_from_slice(&bytes);
        }

        debug!(
            chunks = chunks.len(),
            size = audio.len(),
            lang = voice.lang(),
            "Speech synthesized"
        );

        if audio.is_empty() {
            return Err(InferenceError::InvalidResponse("empty audio body".to_string()));
        }
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_voice_fallback() {
        assert_eq!(Voice::new(Some("en"), false).lang(), "en");
        assert_eq!(Voice::new(Some("EN "), false).lang(), "en");
        assert_eq!(Voice::new(Some("xx"), false).lang(), "tl");
        assert_eq!(Voice::new(None, true).lang(), "tl");
        assert!(Voice::new(None, true).is_slow());
    }

    #[tokio::test]
    async fn test_chunks_are_concatenated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("idx", "0"))
            .and(query_param("tl", "tl"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"AA".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("idx", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"BB".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let config = InferenceConfig {
            tts_url: format!("{}/translate_tts", server.uri()),
            ..Default::default()
        };
        let tts = GoogleTts::new(&config).unwrap();
        let text = "word ".repeat(30);

        let audio = tts.synthesize(&text, &Voice::new(Some("zz"), false)).await.unwrap();
        assert_eq!(audio, b"AABB".to_vec());
    }

    #[tokio::test]
    async fn test_slow_speed_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("ttsspeed", SLOW_SPEED))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"A".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let config = InferenceConfig {
            tts_url: server.uri(),
            ..Default::default()
        };
        let tts = GoogleTts::new(&config).unwrap();
        tts.synthesize("Kumusta", &Voice::new(Some("tl"), true)).await.unwrap();
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let config = InferenceConfig {
            tts_url: server.uri(),
            ..Default::default()
        };
        let tts = GoogleTts::new(&config).unwrap();
        let err = tts.synthesize("hello", &Voice::default()).await.unwrap_err();
        assert!(err.is_rate_limited());
    }
}
