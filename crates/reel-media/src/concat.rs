//! Long-form compilation of part videos.

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use reel_models::EncodingConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::compose::read_output;
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_media;
use crate::settings::MediaSettings;

/// Concat demuxer list: one `file '<path>'` line per input.
fn concat_list(paths: &[impl AsRef<Path>]) -> String {
    let mut list = String::new();
    for path in paths {
        let quoted = path.as_ref().to_string_lossy().replace('\'', "'\\''");
        let _ = writeln!(list, "file '{quoted}'");
    }
    list
}

/// Concatenate `videos` in order and re-encode to the vertical output geometry.
pub async fn concat_videos(settings: &MediaSettings, videos: &[Vec<u8>]) -> MediaResult<Vec<u8>> {
    if videos.is_empty() {
        return Err(MediaError::InvalidVideo("No videos to concatenate".to_string()));
    }

    let scratch = settings.scratch_dir()?;
    let dir = scratch.path();

    let mut paths = Vec::with_capacity(videos.len());
    for (i, video) in videos.iter().enumerate() {
        let path = dir.join(format!("part_{i:03}.mp4"));
        tokio::fs::write(&path, video).await?;

        let info = probe_media(&path)
            .await
            .map_err(|e| MediaError::InvalidVideo(format!("Part {}: {e}", i + 1)))?;
        if !info.has_video {
            return Err(MediaError::InvalidVideo(format!("Part {} has no video stream", i + 1)));
        }
        paths.push(path);
    }

    let list_path = dir.join("parts.txt");
    tokio::fs::write(&list_path, concat_list(&paths)).await?;
    let output_path = dir.join("long.mp4");

    let scale = format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,fps={fps}",
        w = settings.width,
        h = settings.height,
        fps = settings.fps
    );
    let encode = |encoding: EncodingConfig| {
        FfmpegCommand::new(&list_path, &output_path)
            .input_args(["-f", "concat", "-safe", "0"])
            .video_filter(scale.clone())
            .output_args(encoding.to_ffmpeg_args())
    };

    let runner = FfmpegRunner::new().with_timeout(settings.ffmpeg_timeout_secs);
    runner.run(&encode(settings.encoding.clone())).await?;
    let mut bytes = read_output(&output_path).await?;

    if bytes.len() > settings.long_max_bytes {
        info!(
            size = bytes.len(),
            max = settings.long_max_bytes,
            "Long video over size ceiling, re-encoding at lower quality"
        );
        runner.run(&encode(settings.encoding.compact())).await?;
        bytes = read_output(&output_path).await?;
    }

    Ok(bytes)
}
