//! Output geometry, encoding and limits for media rendering.

use std::path::PathBuf;

use reel_models::encoding::{
    DEFAULT_FPS, LONG_VIDEO_MAX_BYTES, PART_VIDEO_MAX_BYTES, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH,
    VIDEO_HEIGHT, VIDEO_WIDTH,
};
use reel_models::EncodingConfig;

/// Default FFmpeg timeout per invocation.
pub const DEFAULT_FFMPEG_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub encoding: EncodingConfig,
    /// Re-encode part videos above this size
    pub part_max_bytes: usize,
    /// Re-encode the long-form video above this size
    pub long_max_bytes: usize,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    /// TrueType font for burned-in text; FFmpeg's default font when unset or missing
    pub font_path: Option<PathBuf>,
    /// Parent for per-operation temp dirs; the OS temp dir when unset
    pub work_dir: Option<PathBuf>,
    pub ffmpeg_timeout_secs: u64,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            width: VIDEO_WIDTH,
            height: VIDEO_HEIGHT,
            fps: DEFAULT_FPS,
            encoding: EncodingConfig::for_still_image(),
            part_max_bytes: PART_VIDEO_MAX_BYTES,
            long_max_bytes: LONG_VIDEO_MAX_BYTES,
            thumbnail_width: THUMBNAIL_WIDTH,
            thumbnail_height: THUMBNAIL_HEIGHT,
            font_path: Some(PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf")),
            work_dir: None,
            ffmpeg_timeout_secs: DEFAULT_FFMPEG_TIMEOUT_SECS,
        }
    }
}

impl MediaSettings {
    /// Create a scratch directory removed when the guard drops.
    pub fn scratch_dir(&self) -> std::io::Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("reel-");
        match &self.work_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
    }
}
