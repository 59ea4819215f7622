//! Still image decoding, fitting and JPEG encoding.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageEncoder, Rgb, RgbImage};

use crate::error::{MediaError, MediaResult};

pub const GENERATED_JPEG_QUALITY: u8 = 85;
pub const COMPACT_JPEG_QUALITY: u8 = 75;
pub const THUMBNAIL_JPEG_QUALITY: u8 = 90;

/// Decode any supported image format.
pub fn decode_image(bytes: &[u8]) -> MediaResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| MediaError::invalid_image(e.to_string()))
}

/// Drop the alpha channel, compositing transparent pixels over black.
pub fn flatten_rgb(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let scale = |c: u8| ((c as u16 * a as u16) / 255) as u8;
        Rgb([scale(r), scale(g), scale(b)])
    })
}

/// Center-crop to the target aspect ratio, then resize to exactly `width`×`height`.
pub fn fit_to_aspect(img: &DynamicImage, width: u32, height: u32) -> RgbImage {
    let (w, h) = (img.width(), img.height());
    let target_aspect = width as f64 / height as f64;

    let cropped = if w as f64 / h as f64 > target_aspect {
        let new_w = ((h as f64 * target_aspect) as u32).clamp(1, w);
        img.crop_imm((w - new_w) / 2, 0, new_w, h)
    } else {
        let new_h = ((w as f64 / target_aspect) as u32).clamp(1, h);
        img.crop_imm(0, (h - new_h) / 2, w, new_h)
    };

    let resized = cropped.resize_exact(width, height, FilterType::Lanczos3);
    flatten_rgb(&resized)
}

/// Shrink to fit within `max_width`×`max_height`, keeping the aspect ratio.
/// Smaller images are returned unscaled.
pub fn fit_within(img: &DynamicImage, max_width: u32, max_height: u32) -> RgbImage {
    if img.width() > max_width || img.height() > max_height {
        flatten_rgb(&img.resize(max_width, max_height, FilterType::Lanczos3))
    } else {
        flatten_rgb(img)
    }
}

/// Encode an RGB image as baseline JPEG.
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> MediaResult<Vec<u8>> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(img.as_raw(), img.width(), img.height(), ColorType::Rgb8)
        .map_err(|e| MediaError::internal(format!("JPEG encoding failed: {e}")))?;
    Ok(out)
}

/// Encode an RGB image as PNG, the lossless hand-off format for FFmpeg.
pub fn encode_png(img: &RgbImage) -> MediaResult<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgb8)
        .map_err(|e| MediaError::internal(format!("PNG encoding failed: {e}")))?;
    Ok(out)
}

/// A generated image re-encoded for transport.
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub bytes: Vec<u8>,
    /// Dimensions of the decoded source image
    pub width: u32,
    pub height: u32,
}

/// Decode, bound to `max_width`×`max_height` and encode as JPEG, falling back to a
/// lower quality when the first encode exceeds `max_bytes`.
pub fn optimize_jpeg(
    bytes: &[u8],
    max_width: u32,
    max_height: u32,
    max_bytes: usize,
) -> MediaResult<OptimizedImage> {
    let img = decode_image(bytes)?;
    let (width, height) = (img.width(), img.height());
    let fitted = fit_within(&img, max_width, max_height);

    let mut encoded = encode_jpeg(&fitted, GENERATED_JPEG_QUALITY)?;
    if encoded.len() > max_bytes {
        encoded = encode_jpeg(&fitted, COMPACT_JPEG_QUALITY)?;
    }

    Ok(OptimizedImage {
        bytes: encoded,
        width,
        height,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    pub(crate) fn png_bytes(img: DynamicImage) -> Vec<u8> {
        encode_png(&img.to_rgb8()).unwrap()
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, MediaError::InvalidImage(_)));
    }

    #[test]
    fn test_fit_wide_image_crops_width() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(400, 100, Rgb([10, 20, 30])));
        let fitted = fit_to_aspect(&img, 90, 160);
        assert_eq!(fitted.dimensions(), (90, 160));
    }

    #[test]
    fn test_fit_tall_image_keeps_center() {
        // top half red, bottom half blue; a 1:1 target crops the middle square
        let img = RgbImage::from_fn(10, 40, |_, y| {
            if y < 20 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        let fitted = fit_to_aspect(&DynamicImage::ImageRgb8(img), 10, 10);
        assert_eq!(fitted.dimensions(), (10, 10));
        assert!(fitted.get_pixel(5, 1).0[0] > 200);
        assert!(fitted.get_pixel(5, 8).0[2] > 200);
    }

    #[test]
    fn test_flatten_composites_over_black() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 0]));
        let flat = flatten_rgb(&DynamicImage::ImageRgba8(img));
        assert_eq!(flat.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_fit_within_only_shrinks() {
        let small = DynamicImage::ImageRgb8(RgbImage::new(50, 80));
        assert_eq!(fit_within(&small, 1080, 1920).dimensions(), (50, 80));

        let large = DynamicImage::ImageRgb8(RgbImage::new(2160, 1920));
        assert_eq!(fit_within(&large, 1080, 1920).dimensions(), (1080, 960));
    }

    #[test]
    fn test_optimize_reports_source_dimensions() {
        let source = RgbImage::from_pixel(64, 32, Rgb([1, 2, 3]));
        let bytes = png_bytes(DynamicImage::ImageRgb8(source));
        let optimized = optimize_jpeg(&bytes, 1080, 1920, usize::MAX).unwrap();
        assert_eq!((optimized.width, optimized.height), (64, 32));
        assert_eq!(&optimized.bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(decode_image(&optimized.bytes).unwrap().width(), 64);
    }

    #[test]
    fn test_optimize_falls_back_to_lower_quality() {
        let noise = RgbImage::from_fn(128, 128, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) % 256) as u8])
        });
        let bytes = png_bytes(DynamicImage::ImageRgb8(noise.clone()));
        let compact = optimize_jpeg(&bytes, 1080, 1920, 1).unwrap();
        assert_eq!(compact.bytes, encode_jpeg(&noise, COMPACT_JPEG_QUALITY).unwrap());
    }
}
