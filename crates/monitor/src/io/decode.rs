use std::path::Path;

use image::RgbaImage;
use tracing::debug;
use crate::error::{MonitorError, Result};

/// Decode an encoded image (PNG, JPEG, TIFF) into an RGBA buffer
pub fn decode_image_bytes(bytes: &[u8]) -> Result<RgbaImage> {
    if bytes.is_empty() {
        return Err(MonitorError::NoInputFile);
    }
    let image = image::load_from_memory(bytes)?.to_rgba8();
    debug!("Decoded image {}x{}", image.width(), image.height());
    Ok(image)
}

/// Read and decode an image file
pub fn decode_image_file(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MonitorError::MissingFile {
            path: path.display().to_string(),
        });
    }
    Ok(image::open(path)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    #[test]
    fn test_decode_png_round_trip() {
        let source = RgbaImage::from_pixel(4, 2, Rgba([12, 34, 56, 255]));
        let mut encoded = Vec::new();
        source
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .unwrap();

        let decoded = decode_image_bytes(&encoded).unwrap();
        assert_eq!(decoded.dimensions(), (4, 2));
        assert_eq!(decoded.get_pixel(3, 1), &Rgba([12, 34, 56, 255]));
    }

    #[test]
    fn test_decode_garbage_is_a_decode_error() {
        let error = decode_image_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(error, MonitorError::Decode(_)));
        assert_eq!(error.user_message(), "Error analyzing image. Please try again.");
    }

    #[test]
    fn test_missing_inputs() {
        assert!(matches!(decode_image_bytes(&[]), Err(MonitorError::NoInputFile)));
        assert!(matches!(
            decode_image_file("/nonexistent/photo.png"),
            Err(MonitorError::MissingFile { .. })
        ));
    }
}
