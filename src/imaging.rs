//! Shrink oversized images before they are uploaded.
//!
//! A standalone helper; conversion never calls it, and the
//! `compress_images` option stays a no-op. Landscape images wider than
//! 1920 px are scaled to 1920 px wide, portrait images taller than 1080 px to
//! 1080 px tall, and the result is re-encoded as a JPEG next to the source.

use crate::error::ZhihuMdError;
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MAX_LANDSCAPE_WIDTH: u32 = 1920;
pub const MAX_PORTRAIT_HEIGHT: u32 = 1080;
pub const JPEG_QUALITY: u8 = 85;

/// Resize `image_path` if needed and save it as `<stem>.jpg` beside it.
///
/// Returns the path of the written JPEG. A `.jpg` source is overwritten in
/// place.
pub fn reduce_image_size(image_path: &Path) -> Result<PathBuf, ZhihuMdError> {
    if !image_path.exists() {
        return Err(ZhihuMdError::FileNotFound {
            path: image_path.to_path_buf(),
        });
    }
    let processing = |source| ZhihuMdError::ImageProcessing {
        path: image_path.to_path_buf(),
        source,
    };

    let img = image::open(image_path).map_err(processing)?;
    let (width, height) = (img.width(), img.height());
    let img = match target_dimensions(width, height) {
        Some((w, h)) => {
            debug!("Resizing {} from {width}x{height} to {w}x{h}", image_path.display());
            img.resize_exact(w, h, FilterType::Lanczos3)
        }
        None => img,
    };

    let output_path = jpeg_path(image_path);
    save_jpeg(&img, &output_path).map_err(processing)?;
    info!("Compressed image written: {}", output_path.display());
    Ok(output_path)
}

/// New dimensions when the image exceeds the limits, `None` otherwise.
pub fn target_dimensions(width: u32, height: u32) -> Option<(u32, u32)> {
    if width > height && width > MAX_LANDSCAPE_WIDTH {
        let h = (u64::from(MAX_LANDSCAPE_WIDTH) * u64::from(height) / u64::from(width)) as u32;
        Some((MAX_LANDSCAPE_WIDTH, h.max(1)))
    } else if height > width && height > MAX_PORTRAIT_HEIGHT {
        let w = (u64::from(MAX_PORTRAIT_HEIGHT) * u64::from(width) / u64::from(height)) as u32;
        Some((w.max(1), MAX_PORTRAIT_HEIGHT))
    } else {
        None
    }
}

fn jpeg_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("jpg")
}

fn save_jpeg(img: &DynamicImage, path: &Path) -> Result<(), image::ImageError> {
    let rgb = img.to_rgb8();
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new_with_quality(writer, JPEG_QUALITY).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        image::ExtendedColorType::Rgb8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn limits() {
        assert_eq!(target_dimensions(3840, 2160), Some((1920, 1080)));
        assert_eq!(target_dimensions(1000, 2160), Some((500, 1080)));
        assert_eq!(target_dimensions(1920, 1000), None);
        // Square images are never resized.
        assert_eq!(target_dimensions(4000, 4000), None);
    }

    #[test]
    fn wide_png_becomes_smaller_jpeg() {
        let dir = TempDir::new().unwrap();
        let src = write_png(dir.path(), "wide.png", 2400, 600);

        let out = reduce_image_size(&src).unwrap();
        assert_eq!(out, dir.path().join("wide.jpg"));
        let img = image::open(&out).unwrap();
        assert_eq!((img.width(), img.height()), (1920, 480));
    }

    #[test]
    fn small_image_only_reencoded() {
        let dir = TempDir::new().unwrap();
        let src = write_png(dir.path(), "small.png", 40, 30);
        let out = reduce_image_size(&src).unwrap();
        let img = image::open(&out).unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[test]
    fn missing_source_is_not_found() {
        let err = reduce_image_size(Path::new("/nonexistent/image.png")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn undecodable_source_is_processing_error() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("fake.png");
        std::fs::write(&src, b"not an image").unwrap();
        let err = reduce_image_size(&src).unwrap_err();
        assert!(matches!(err, ZhihuMdError::ImageProcessing { .. }));
    }
}
