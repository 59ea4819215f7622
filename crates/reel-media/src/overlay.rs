//! Outlined text burned into frames with FFmpeg `drawtext`.
//!
//! Each line is written to its own text file and referenced with `textfile=`,
//! so story text never needs filter-graph escaping.

use std::path::{Path, PathBuf};

use reel_text::{wrap_words, SUBTITLE_LINE_CHARS};

use crate::command::escape_filter_path;
use crate::error::MediaResult;

const SUBTITLE_MAX_LINES: usize = 3;
const SUBTITLE_FONT_SIZE: u32 = 48;
const SUBTITLE_LINE_HEIGHT: u32 = 60;
const SUBTITLE_BORDER: u32 = 2;

const TITLE_MAX_LINES: usize = 2;
const TITLE_FONT_SIZE: u32 = 72;
const TITLE_LINE_HEIGHT: u32 = 90;
const TITLE_BORDER: u32 = 3;

/// Horizontally centered lines of white text with a black outline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    lines: Vec<String>,
    /// Vertical center of each line, in pixels
    centers: Vec<u32>,
    font_size: u32,
    border: u32,
    font_path: Option<PathBuf>,
}

impl TextOverlay {
    /// Up to three subtitle lines, centered as a block at 75% of the frame height.
    pub fn subtitle(text: &str, frame_height: u32) -> Self {
        let lines = wrap_words(text, SUBTITLE_LINE_CHARS, SUBTITLE_MAX_LINES);
        let anchor = frame_height * 3 / 4;
        let start = anchor.saturating_sub(lines.len() as u32 * SUBTITLE_LINE_HEIGHT / 2);
        let centers = (0..lines.len() as u32)
            .map(|i| start + i * SUBTITLE_LINE_HEIGHT)
            .collect();

        Self {
            lines,
            centers,
            font_size: SUBTITLE_FONT_SIZE,
            border: SUBTITLE_BORDER,
            font_path: None,
        }
    }

    /// Up to two title lines, the first centered at 40% of the frame height.
    pub fn title(text: &str, frame_height: u32) -> Self {
        let lines = wrap_words(text, SUBTITLE_LINE_CHARS, TITLE_MAX_LINES);
        let anchor = frame_height * 2 / 5;
        let centers = (0..lines.len() as u32)
            .map(|i| anchor + i * TITLE_LINE_HEIGHT)
            .collect();

        Self {
            lines,
            centers,
            font_size: TITLE_FONT_SIZE,
            border: TITLE_BORDER,
            font_path: None,
        }
    }

    pub fn with_font(mut self, font_path: Option<PathBuf>) -> Self {
        self.font_path = font_path;
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Write the line files into `dir` and return the `drawtext` chain, or `None`
    /// when there is no text to draw.
    pub async fn write_filter(&self, dir: &Path) -> MediaResult<Option<String>> {
        if self.is_empty() {
            return Ok(None);
        }

        let mut paths = Vec::with_capacity(self.lines.len());
        for (i, line) in self.lines.iter().enumerate() {
            let path = dir.join(format!("line_{i}.txt"));
            tokio::fs::write(&path, line).await?;
            paths.push(path);
        }

        Ok(Some(self.build_filter(&paths)))
    }

    fn build_filter(&self, line_files: &[PathBuf]) -> String {
        let font = self
            .font_path
            .as_deref()
            .filter(|p| p.exists())
            .map(|p| format!("fontfile='{}':", escape_filter_path(p)))
            .unwrap_or_default();

        line_files
            .iter()
            .zip(&self.centers)
            .map(|(file, center)| {
                format!(
                    "drawtext={font}textfile='{}':expansion=none:fontsize={}:fontcolor=white:\
                     bordercolor=black:borderw={}:x=(w-text_w)/2:y={}-text_h/2",
                    escape_filter_path(file),
                    self.font_size,
                    self.border,
                    center
                )
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}
