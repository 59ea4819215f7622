//! Media processing for StoryReel.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building and a runner with timeouts
//! - FFprobe duration and stream probing
//! - Image fitting and JPEG optimisation
//! - Per-part video composition with burned-in subtitles
//! - Long-form concatenation and thumbnail rendering
//! - PDF text extraction through poppler
//!
//! Every operation works inside its own temporary directory, removed when the
//! operation returns.

pub mod command;
pub mod compose;
pub mod concat;
pub mod engine;
pub mod error;
pub mod overlay;
pub mod pdf;
pub mod picture;
pub mod probe;
pub mod settings;
pub mod thumbnail;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use compose::{compose_part_video, PartInputs, PartVideo};
pub use concat::concat_videos;
pub use engine::{FfmpegEngine, MediaEngine, TextExtractor};
pub use error::{MediaError, MediaResult};
pub use overlay::TextOverlay;
pub use pdf::{check_pdf_magic, PdfText, PopplerExtractor};
pub use picture::{decode_image, fit_to_aspect, optimize_jpeg, OptimizedImage};
pub use probe::{get_duration, probe_media, MediaInfo};
pub use settings::MediaSettings;
pub use thumbnail::render_thumbnail;
