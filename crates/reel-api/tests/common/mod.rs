//! Shared fixtures: in-memory backends and request helpers.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, Rgb, RgbImage};
use serde_json::Value;
use tower::ServiceExt;

use reel_api::{create_router, ApiConfig, AppState, Backends, PipelineConfig};
use reel_inference::{
    ImageGenerator, ImageRequest, InferenceError, InferenceResult, SpeechSynthesizer, Translator,
    Voice,
};
use reel_media::{check_pdf_magic, MediaEngine, MediaError, MediaResult, PartInputs, PartVideo,
    PdfText, TextExtractor};
use reel_text::{MetadataGenerator, MetadataTemplate};

/// Text containing this marker makes the fake backends fail.
pub const FAIL: &str = "FAIL";

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([40, 10, 10]));
    let mut out = Cursor::new(Vec::new());
    PngEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, image::ColorType::Rgb8)
        .unwrap();
    out.into_inner()
}

#[derive(Default)]
pub struct FakeTranslator {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Translator for FakeTranslator {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn translate(&self, text: &str) -> InferenceResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains(FAIL) {
            return Err(InferenceError::upstream("Translation", Some(500), "boom"));
        }
        Ok(format!("tl:{text}"))
    }
}

#[derive(Default)]
pub struct FakeSpeech {
    pub calls: AtomicUsize,
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(&self, text: &str, voice: &Voice) -> InferenceResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains(FAIL) {
            return Err(InferenceError::RateLimited { service: "TTS" });
        }
        Ok(format!("mp3:{}:{text}", voice.lang()).into_bytes())
    }
}

#[derive(Default)]
pub struct FakeImages {
    pub prompts: std::sync::Mutex<Vec<ImageRequest>>,
}

#[async_trait]
impl ImageGenerator for FakeImages {
    async fn generate(&self, request: &ImageRequest) -> InferenceResult<Vec<u8>> {
        self.prompts.lock().unwrap().push(request.clone());
        if request.prompt.to_lowercase().contains("fail") {
            return Err(InferenceError::upstream("HuggingFace", Some(500), "model crashed"));
        }
        if request.prompt.to_lowercase().contains("garbage") {
            return Ok(b"<html>not an image</html>".to_vec());
        }
        Ok(png(96, 160))
    }
}

pub struct FakeMedia;

#[async_trait]
impl MediaEngine for FakeMedia {
    async fn audio_duration(&self, audio: &[u8]) -> MediaResult<f64> {
        if audio.starts_with(b"mp3:") {
            Ok(4.256)
        } else {
            Err(MediaError::internal("not audio"))
        }
    }

    async fn compose_part(&self, part: PartInputs<'_>) -> MediaResult<PartVideo> {
        if part.subtitle.contains(FAIL) {
            return Err(MediaError::internal("encoder crashed"));
        }
        Ok(PartVideo {
            bytes: format!("mp4:{}", part.subtitle).into_bytes(),
            duration: part.duration,
            reencoded: false,
        })
    }

    async fn concat(&self, videos: &[Vec<u8>]) -> MediaResult<Vec<u8>> {
        if videos.is_empty() {
            return Err(MediaError::InvalidVideo("no parts".to_string()));
        }
        Ok(videos.concat())
    }

    async fn render_thumbnail(&self, image: &[u8], title: &str) -> MediaResult<Vec<u8>> {
        let mut out = b"jpeg:".to_vec();
        out.extend_from_slice(title.as_bytes());
        out.extend_from_slice(&image[..4.min(image.len())]);
        Ok(out)
    }
}

pub struct FakePdf;

#[async_trait]
impl TextExtractor for FakePdf {
    async fn extract(&self, pdf: &[u8]) -> MediaResult<PdfText> {
        check_pdf_magic(pdf)?;
        if pdf.windows(8).any(|w| w == b"/Encrypt") {
            return Err(MediaError::EncryptedPdf);
        }
        let text = "Page one.\nPage two.\n".to_string();
        Ok(PdfText {
            characters: text.chars().count(),
            text,
            pages: 3,
            extracted_pages: 2,
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub translator: Arc<FakeTranslator>,
    pub speech: Arc<FakeSpeech>,
    pub images: Arc<FakeImages>,
}

pub fn test_app() -> TestApp {
    test_app_with(ApiConfig::default())
}

pub fn test_app_with(config: ApiConfig) -> TestApp {
    let translator = Arc::new(FakeTranslator::default());
    let speech = Arc::new(FakeSpeech::default());
    let images = Arc::new(FakeImages::default());

    let backends = Backends {
        translator: translator.clone(),
        speech: speech.clone(),
        images: images.clone(),
        media: Arc::new(FakeMedia),
        pdf: Arc::new(FakePdf),
    };
    let state = AppState::with_backends(
        config,
        PipelineConfig::default(),
        MetadataGenerator::new(MetadataTemplate::default()),
        backends,
    );

    TestApp {
        router: create_router(state, None),
        translator,
        speech,
        images,
    }
}

pub async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(router, uri, body.to_string()).await
}

pub async fn post_raw(router: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub fn b64(bytes: &[u8]) -> String {
    reel_api::codec::encode(bytes)
}

pub fn unb64(value: &Value) -> Vec<u8> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(value.as_str().unwrap())
        .unwrap()
}
