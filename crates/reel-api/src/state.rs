//! Application state.

use std::sync::Arc;

use reel_inference::{
    GoogleTts, HfImageGenerator, ImageGenerator, InferenceConfig, SpeechSynthesizer, Translator,
    TranslatorChain,
};
use reel_media::{FfmpegEngine, MediaEngine, PopplerExtractor, TextExtractor};
use reel_text::MetadataGenerator;

use crate::config::{ApiConfig, PipelineConfig};

/// External capabilities the handlers call through.
#[derive(Clone)]
pub struct Backends {
    pub translator: Arc<dyn Translator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub images: Arc<dyn ImageGenerator>,
    pub media: Arc<dyn MediaEngine>,
    pub pdf: Arc<dyn TextExtractor>,
}

fn pdf_extractor(pipeline: &PipelineConfig) -> PopplerExtractor {
    PopplerExtractor::new(pipeline.pdf_max_pages)
        .with_work_dir(pipeline.media.work_dir.clone())
        .with_timeout(pipeline.pdf_timeout_secs)
}

impl Backends {
    /// Production backends: remote inference clients, FFmpeg and poppler.
    pub fn from_config(
        pipeline: &PipelineConfig,
        inference: &InferenceConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            translator: Arc::new(TranslatorChain::from_config(inference)?),
            speech: Arc::new(GoogleTts::new(inference)?),
            images: Arc::new(HfImageGenerator::new(inference)?),
            media: Arc::new(FfmpegEngine::new(pipeline.media.clone())),
            pdf: Arc::new(pdf_extractor(pipeline)),
        })
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<PipelineConfig>,
    pub metadata: Arc<MetadataGenerator>,
    pub translator: Arc<dyn Translator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub images: Arc<dyn ImageGenerator>,
    pub media: Arc<dyn MediaEngine>,
    pub pdf: Arc<dyn TextExtractor>,
}

impl AppState {
    /// Create application state with production backends.
    pub fn new(
        config: ApiConfig,
        pipeline: PipelineConfig,
        inference: &InferenceConfig,
    ) -> anyhow::Result<Self> {
        let backends = Backends::from_config(&pipeline, inference)?;
        let template = pipeline.load_metadata_template()?;
        Ok(Self::with_backends(
            config,
            pipeline,
            MetadataGenerator::new(template),
            backends,
        ))
    }

    pub fn with_backends(
        config: ApiConfig,
        pipeline: PipelineConfig,
        metadata: MetadataGenerator,
        backends: Backends,
    ) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
            metadata: Arc::new(metadata),
            translator: backends.translator,
            speech: backends.speech,
            images: backends.images,
            media: backends.media,
            pdf: backends.pdf,
        }
    }
}
