//! Media backends behind trait objects, so request handlers can run against
//! the FFmpeg implementation or a test double.

use async_trait::async_trait;

use crate::compose::{compose_part_video, PartInputs, PartVideo};
use crate::concat::concat_videos;
use crate::error::MediaResult;
use crate::pdf::{PdfText, PopplerExtractor};
use crate::probe::get_duration;
use crate::settings::MediaSettings;
use crate::thumbnail::render_thumbnail;

#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Duration of an encoded audio clip, in seconds.
    async fn audio_duration(&self, audio: &[u8]) -> MediaResult<f64>;

    async fn compose_part(&self, part: PartInputs<'_>) -> MediaResult<PartVideo>;

    /// Concatenate part videos into one long-form video.
    async fn concat(&self, videos: &[Vec<u8>]) -> MediaResult<Vec<u8>>;

    /// JPEG thumbnail from a background image and a title.
    async fn render_thumbnail(&self, image: &[u8], title: &str) -> MediaResult<Vec<u8>>;
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, pdf: &[u8]) -> MediaResult<PdfText>;
}

/// [`MediaEngine`] backed by the FFmpeg CLI.
#[derive(Debug, Clone, Default)]
pub struct FfmpegEngine {
    settings: MediaSettings,
}

impl FfmpegEngine {
    pub fn new(settings: MediaSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MediaSettings {
        &self.settings
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn audio_duration(&self, audio: &[u8]) -> MediaResult<f64> {
        let scratch = self.settings.scratch_dir()?;
        let path = scratch.path().join("audio.mp3");
        tokio::fs::write(&path, audio).await?;
        get_duration(&path).await
    }

    async fn compose_part(&self, part: PartInputs<'_>) -> MediaResult<PartVideo> {
        compose_part_video(&self.settings, part).await
    }

    async fn concat(&self, videos: &[Vec<u8>]) -> MediaResult<Vec<u8>> {
        concat_videos(&self.settings, videos).await
    }

    async fn render_thumbnail(&self, image: &[u8], title: &str) -> MediaResult<Vec<u8>> {
        render_thumbnail(&self.settings, image, title).await
    }
}

#[async_trait]
impl TextExtractor for PopplerExtractor {
    async fn extract(&self, pdf: &[u8]) -> MediaResult<PdfText> {
        self.extract_text(pdf).await
    }
}
