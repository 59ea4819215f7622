//! Text-to-image generation.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use reel_models::encoding::{THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH, VIDEO_HEIGHT, VIDEO_WIDTH};

use crate::config::InferenceConfig;
use crate::error::{InferenceError, InferenceResult};
use crate::http::{build_client, check_status};
use crate::retry::LoadingRetryPolicy;

const SERVICE: &str = "HuggingFace";

/// Parameters for one generated image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub guidance_scale: f32,
}

impl ImageRequest {
    /// Portrait frame for a story part.
    pub fn part(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            width: VIDEO_WIDTH,
            height: VIDEO_HEIGHT,
            steps: 30,
            guidance_scale: 7.5,
        }
    }

    /// Landscape thumbnail background.
    pub fn thumbnail(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            width: THUMBNAIL_WIDTH,
            height: THUMBNAIL_HEIGHT,
            steps: 25,
            guidance_scale: 7.5,
        }
    }
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Returns the encoded image bytes as produced by the backend.
    async fn generate(&self, request: &ImageRequest) -> InferenceResult<Vec<u8>>;
}

/// Hosted diffusion model client.
pub struct HfImageGenerator {
    http: Client,
    url: String,
    token: Option<String>,
    retry: LoadingRetryPolicy,
}

impl HfImageGenerator {
    pub fn new(config: &InferenceConfig) -> InferenceResult<Self> {
        Ok(Self {
            http: build_client(SERVICE, config.image_timeout)?,
            url: config.model_url(&config.image_model),
            token: config.hf_token.clone(),
            retry: config.loading_retry,
        })
    }

    async fn request_once(&self, request: &ImageRequest) -> InferenceResult<Vec<u8>> {
        let payload = json!({
            "inputs": request.prompt,
            "parameters": {
                "num_inference_steps": request.steps,
                "guidance_scale": request.guidance_scale,
                "width": request.width,
                "height": request.height,
            }
        });

        let mut builder = self.http.post(&self.url).json(&payload);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| InferenceError::from_reqwest(SERVICE, e))?;
        let response = check_status(SERVICE, response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| InferenceError::from_reqwest(SERVICE, e))?;

        if bytes.is_empty() {
            return Err(InferenceError::InvalidResponse("empty image body".to_string()));
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageGenerator for HfImageGenerator {
    async fn generate(&self, request: &ImageRequest) -> InferenceResult<Vec<u8>> {
        debug!(width = request.width, height = request.height, "Requesting image");

        let bytes = self
            .retry
            .run("generate_image", || self.request_once(request))
            .await?;

        info!(size = bytes.len(), "Image generated");
        Ok(bytes)
    }
}
