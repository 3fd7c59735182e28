//! JPEG encoding for uploads.
//!
//! Every compression attempt ends here: the rendered pixel surface is
//! serialized with the `image` crate's baseline JPEG encoder at the attempt's
//! quality, and the resulting byte count drives the next attempt.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::decode::DecodedImage;

/// Largest edge a baseline JPEG frame header can describe.
pub const MAX_JPEG_DIMENSION: u32 = 65_535;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// An edge exceeds what the JPEG format can store
    #[error("Dimensions {width}x{height} exceed the JPEG limit of {}", MAX_JPEG_DIMENSION)]
    TooLarge { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Something that can serialize a pixel surface to bytes.
///
/// The compressor only needs the encoded size and bytes back, so the encoder
/// is a seam: the default is [`StandardJpegEncoder`], and callers with a
/// faster native encoder can plug it in.
pub trait Encoder {
    /// Encode `image` at `quality` in the 0.0 to 1.0 range.
    fn encode(&self, image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError>;
}

/// Baseline JPEG via the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardJpegEncoder;

impl Encoder for StandardJpegEncoder {
    fn encode(&self, image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
        encode_jpeg(&image.pixels, image.width, image.height, quality_to_u8(quality))
    }
}

/// Map a 0.0 to 1.0 quality onto the encoder's 1 to 100 scale.
///
/// Rounds to nearest so 0.92 becomes 92 and 0.35 becomes 35. Out-of-range and
/// NaN inputs clamp.
pub fn quality_to_u8(quality: f32) -> u8 {
    if quality.is_nan() {
        return 1;
    }
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality, clamped to 1-100
///
/// # Errors
///
/// Fails on zero or oversized dimensions, a pixel buffer that does not match
/// them, or an encoder I/O failure.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    if width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION {
        return Err(EncodeError::TooLarge { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::with_capacity(expected_len / 8));
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise_pixels(width: u32, height: u32, seed: u32) -> Vec<u8> {
        let mut state = seed.max(1);
        (0..width * height * 3)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state & 0xFF) as u8
            })
            .collect()
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let pixels = vec![128u8; 64 * 48 * 3];
        let jpeg = encode_jpeg(&pixels, 64, 48, 90).unwrap();

        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_lower_quality_is_smaller_for_detailed_content() {
        let pixels = noise_pixels(64, 64, 7);
        let low = encode_jpeg(&pixels, 64, 64, 35).unwrap();
        let high = encode_jpeg(&pixels, 64, 64, 92).unwrap();
        assert!(low.len() < high.len(), "low={} high={}", low.len(), high.len());
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let pixels = vec![128u8; 99 * 100 * 3];
        let result = encode_jpeg(&pixels, 100, 100, 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_zero_dimensions() {
        assert!(matches!(
            encode_jpeg(&[], 0, 100, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_jpeg(&[], 100, 0, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_jpeg_too_large() {
        // Rejected before the pixel buffer is inspected.
        assert!(matches!(
            encode_jpeg(&[], 70_000, 1, 90),
            Err(EncodeError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_quality_to_u8() {
        assert_eq!(quality_to_u8(0.92), 92);
        assert_eq!(quality_to_u8(0.35), 35);
        assert_eq!(quality_to_u8(0.5), 50);
        assert_eq!(quality_to_u8(1.0), 100);
        assert_eq!(quality_to_u8(0.0), 1);
        assert_eq!(quality_to_u8(1.7), 100);
        assert_eq!(quality_to_u8(-0.2), 1);
        assert_eq!(quality_to_u8(f32::NAN), 1);
    }

    #[test]
    fn test_standard_encoder_round_trip_dimensions() {
        let image = DecodedImage::new(37, 23, noise_pixels(37, 23, 3));
        let jpeg = StandardJpegEncoder.encode(&image, 0.8).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (37, 23));
    }
}
