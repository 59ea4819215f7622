//! Landscape thumbnail with a burned-in title.

use image::imageops::FilterType;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::compose::read_output;
use crate::error::{MediaError, MediaResult};
use crate::overlay::TextOverlay;
use crate::picture::{
    decode_image, encode_jpeg, encode_png, flatten_rgb, THUMBNAIL_JPEG_QUALITY,
};
use crate::settings::MediaSettings;

/// Resize the background to the thumbnail size, draw `title` and encode as JPEG.
pub async fn render_thumbnail(
    settings: &MediaSettings,
    image: &[u8],
    title: &str,
) -> MediaResult<Vec<u8>> {
    let (width, height) = (settings.thumbnail_width, settings.thumbnail_height);
    let source = image.to_vec();
    let background = tokio::task::spawn_blocking(move || {
        let img = decode_image(&source)?;
        Ok::<_, MediaError>(flatten_rgb(&img.resize_exact(width, height, FilterType::Lanczos3)))
    })
    .await
    .map_err(|e| MediaError::internal(format!("Thumbnail task failed: {e}")))??;

    let overlay = TextOverlay::title(title, height).with_font(settings.font_path.clone());
    if overlay.is_empty() {
        return encode_jpeg(&background, THUMBNAIL_JPEG_QUALITY);
    }

    let scratch = settings.scratch_dir()?;
    let dir = scratch.path();
    let base_path = dir.join("background.png");
    let titled_path = dir.join("titled.png");

    tokio::fs::write(&base_path, encode_png(&background)?).await?;
    let filter = overlay
        .write_filter(dir)
        .await?
        .ok_or_else(|| MediaError::internal("Title overlay produced no filter"))?;

    let cmd = FfmpegCommand::new(&base_path, &titled_path)
        .video_filter(filter)
        .single_frame();
    FfmpegRunner::new()
        .with_timeout(settings.ffmpeg_timeout_secs)
        .run(&cmd)
        .await?;

    let titled = decode_image(&read_output(&titled_path).await?)?;
    encode_jpeg(&flatten_rgb(&titled), THUMBNAIL_JPEG_QUALITY)
}
