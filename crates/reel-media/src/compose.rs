//! Per-part vertical video: one fitted still, narration audio and burned-in
//! subtitles.

use std::path::Path;

use tracing::{debug, info};

use reel_models::EncodingConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::overlay::TextOverlay;
use crate::picture::{decode_image, encode_png, fit_to_aspect};
use crate::settings::MediaSettings;

/// Inputs for one part video.
#[derive(Debug, Clone, Copy)]
pub struct PartInputs<'a> {
    pub image: &'a [u8],
    pub audio: &'a [u8],
    pub subtitle: &'a str,
    /// Seconds of narration; the video is cut to this length
    pub duration: f64,
}

/// An encoded part video.
#[derive(Debug, Clone)]
pub struct PartVideo {
    pub bytes: Vec<u8>,
    pub duration: f64,
    /// Whether the compact re-encode was needed to meet the size ceiling
    pub reencoded: bool,
}

/// Decode the still and prepare the frame PNG off the async runtime.
pub(crate) async fn prepare_frame(image: &[u8], width: u32, height: u32) -> MediaResult<Vec<u8>> {
    let image = image.to_vec();
    tokio::task::spawn_blocking(move || {
        let img = decode_image(&image)?;
        encode_png(&fit_to_aspect(&img, width, height))
    })
    .await
    .map_err(|e| MediaError::internal(format!("Frame task failed: {e}")))?
}

pub async fn compose_part_video(
    settings: &MediaSettings,
    part: PartInputs<'_>,
) -> MediaResult<PartVideo> {
    if part.duration.is_nan() || part.duration <= 0.0 {
        return Err(MediaError::internal("Audio duration must be positive"));
    }

    let scratch = settings.scratch_dir()?;
    let dir = scratch.path();

    let frame_path = dir.join("frame.png");
    let audio_path = dir.join("audio.mp3");
    let output_path = dir.join("part.mp4");

    let frame = prepare_frame(part.image, settings.width, settings.height).await?;
    tokio::fs::write(&frame_path, frame).await?;
    tokio::fs::write(&audio_path, part.audio).await?;

    let filter = TextOverlay::subtitle(part.subtitle, settings.height)
        .with_font(settings.font_path.clone())
        .write_filter(dir)
        .await?;

    let encode = |encoding: EncodingConfig| {
        let mut cmd = FfmpegCommand::new(&frame_path, &output_path)
            .loop_still(settings.fps)
            .add_input(&audio_path)
            .map("0:v")
            .map("1:a");
        if let Some(filter) = &filter {
            cmd = cmd.video_filter(filter.clone());
        }
        cmd.frame_rate(settings.fps)
            .duration(part.duration)
            .output_args(encoding.to_ffmpeg_args())
    };

    let runner = FfmpegRunner::new().with_timeout(settings.ffmpeg_timeout_secs);
    runner.run(&encode(settings.encoding.clone())).await?;
    let mut bytes = read_output(&output_path).await?;
    let mut reencoded = false;

    if bytes.len() > settings.part_max_bytes {
        info!(
            size = bytes.len(),
            max = settings.part_max_bytes,
            "Part video over size ceiling, re-encoding at lower quality"
        );
        runner.run(&encode(settings.encoding.compact())).await?;
        bytes = read_output(&output_path).await?;
        reencoded = true;
    }

    debug!(size = bytes.len(), duration = part.duration, "Part video encoded");

    Ok(PartVideo {
        bytes,
        duration: part.duration,
        reencoded,
    })
}

pub(crate) async fn read_output(path: &Path) -> MediaResult<Vec<u8>> {
    let bytes = tokio::fs::read(path).await?;
    if bytes.is_empty() {
        return Err(MediaError::ffmpeg_failed("FFmpeg produced an empty file", None, None));
    }
    Ok(bytes)
}
