//! API and pipeline configuration.

use std::path::PathBuf;

use anyhow::Context;
use reel_media::pdf::{DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT_SECS as DEFAULT_PDF_TIMEOUT_SECS};
use reel_media::settings::DEFAULT_FFMPEG_TIMEOUT_SECS;
use reel_media::MediaSettings;
use reel_models::encoding::{
    DEFAULT_FPS, IMAGE_MAX_BYTES, LONG_VIDEO_MAX_BYTES, PART_VIDEO_MAX_BYTES, VIDEO_HEIGHT,
    VIDEO_WIDTH,
};
use reel_text::MetadataTemplate;

/// Default word budget per story part.
pub const DEFAULT_TARGET_WORDS: usize = 350;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_body_size: 64 * 1024 * 1024, // 64MB, batches carry base64 media
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT").unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: env_parse("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

/// Defaults applied to requests that do not override them.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub default_target_words: usize,
    pub translate_batch_size: usize,
    pub tts_batch_size: usize,
    pub image_batch_size: usize,
    pub video_batch_size: usize,
    /// Re-encode generated images at lower quality above this size
    pub image_max_bytes: usize,
    pub pdf_max_pages: usize,
    /// Limit for each poppler invocation
    pub pdf_timeout_secs: u64,
    pub media: MediaSettings,
    /// JSON file overriding the built-in metadata template
    pub metadata_template_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_target_words: DEFAULT_TARGET_WORDS,
            translate_batch_size: 5,
            tts_batch_size: 5,
            image_batch_size: 1,
            video_batch_size: 1,
            image_max_bytes: IMAGE_MAX_BYTES,
            pdf_max_pages: DEFAULT_MAX_PAGES,
            pdf_timeout_secs: DEFAULT_PDF_TIMEOUT_SECS,
            media: MediaSettings::default(),
            metadata_template_path: None,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let media_defaults = defaults.media.clone();

        let media = MediaSettings {
            width: env_parse("VIDEO_WIDTH").unwrap_or(VIDEO_WIDTH),
            height: env_parse("VIDEO_HEIGHT").unwrap_or(VIDEO_HEIGHT),
            fps: env_parse("VIDEO_FPS").unwrap_or(DEFAULT_FPS),
            part_max_bytes: env_parse("PART_VIDEO_MAX_BYTES").unwrap_or(PART_VIDEO_MAX_BYTES),
            long_max_bytes: env_parse("LONG_VIDEO_MAX_BYTES").unwrap_or(LONG_VIDEO_MAX_BYTES),
            font_path: env_path("SUBTITLE_FONT_PATH").or(media_defaults.font_path),
            work_dir: env_path("WORK_DIR"),
            ffmpeg_timeout_secs: env_parse("FFMPEG_TIMEOUT_SECS")
                .unwrap_or(DEFAULT_FFMPEG_TIMEOUT_SECS),
            ..media_defaults
        };

        Self {
            default_target_words: env_parse("DEFAULT_TARGET_WORDS")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.default_target_words),
            translate_batch_size: batch_size("TRANSLATE_BATCH_SIZE", defaults.translate_batch_size),
            tts_batch_size: batch_size("TTS_BATCH_SIZE", defaults.tts_batch_size),
            image_batch_size: batch_size("IMAGE_BATCH_SIZE", defaults.image_batch_size),
            video_batch_size: batch_size("VIDEO_BATCH_SIZE", defaults.video_batch_size),
            image_max_bytes: env_parse("IMAGE_MAX_BYTES").unwrap_or(defaults.image_max_bytes),
            pdf_max_pages: env_parse("PDF_MAX_PAGES").unwrap_or(defaults.pdf_max_pages),
            pdf_timeout_secs: env_parse("PDF_TIMEOUT_SECS").unwrap_or(defaults.pdf_timeout_secs),
            media,
            metadata_template_path: env_path("METADATA_TEMPLATE_PATH"),
        }
    }

    /// The metadata template, read from `metadata_template_path` when set.
    /// Keys missing from the file keep their built-in values.
    pub fn load_metadata_template(&self) -> anyhow::Result<MetadataTemplate> {
        let Some(path) = &self.metadata_template_path else {
            return Ok(MetadataTemplate::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata template {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid metadata template {}", path.display()))
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

fn batch_size(key: &str, default: usize) -> usize {
    env_parse(key).filter(|&n: &usize| n > 0).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.default_target_words, 350);
        assert_eq!(config.translate_batch_size, 5);
        assert_eq!(config.tts_batch_size, 5);
        assert_eq!(config.image_batch_size, 1);
        assert_eq!(config.video_batch_size, 1);
        assert_eq!(config.pdf_max_pages, 100);
        assert_eq!(config.pdf_timeout_secs, 60);
        assert_eq!(config.media.fps, 30);
    }

    #[test]
    fn test_is_production() {
        let config = ApiConfig {
            environment: "Production".to_string(),
            ..Default::default()
        };
        assert!(config.is_production());
        assert!(!ApiConfig::default().is_production());
    }

    #[test]
    fn test_metadata_template_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"title_prefix": "Part {{part}}: "}}"#).unwrap();

        let config = PipelineConfig {
            metadata_template_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let template = config.load_metadata_template().unwrap();
        assert_eq!(template.title_prefix, "Part {part}: ");
        assert_eq!(template.default_tags, MetadataTemplate::default().default_tags);
    }

    #[test]
    fn test_metadata_template_missing_file() {
        let config = PipelineConfig {
            metadata_template_path: Some(PathBuf::from("/nonexistent/template.json")),
            ..Default::default()
        };
        assert!(config.load_metadata_template().is_err());
    }
}
