//! Raster image decoding with EXIF orientation handling.
//!
//! Uploads arrive as whatever the user's device produced: JPEG from most
//! cameras, PNG screenshots, WebP or GIF saved from the web. The format is
//! sniffed from the bytes, not trusted from the declared MIME type.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};

use super::heic::is_heic;
use super::{DecodeError, DecodedImage, Orientation};

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// # Errors
///
/// - `DecodeError::Empty` for zero-length input
/// - `DecodeError::UnsupportedFormat` for HEIC/HEIF or a recognized format
///   this build cannot decode
/// - `DecodeError::InvalidFormat` when the bytes match no known signature
/// - `DecodeError::CorruptedFile` when decoding fails part-way
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let format = sniff_format(bytes)?;
    let orientation = extract_orientation(bytes);

    let img = image::load_from_memory_with_format(bytes, format).map_err(map_image_error)?;
    let oriented = apply_orientation(img, orientation);

    Ok(DecodedImage::from_rgb_image(oriented.into_rgb8()))
}

/// Read the displayed dimensions from the header without decoding pixels.
///
/// The EXIF orientation is taken into account, so a portrait phone photo
/// stored as 4032x3024 reports 3024x4032.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    let format = sniff_format(bytes)?;
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(map_image_error)?;

    Ok(extract_orientation(bytes).oriented(width, height))
}

/// Identify the container format from the leading bytes.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Extract the EXIF orientation, defaulting to `Normal` when absent.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    if is_heic(bytes) {
        return Err(DecodeError::UnsupportedFormat("HEIC/HEIF".to_string()));
    }
    detect_format(bytes).ok_or(DecodeError::InvalidFormat)
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(e) => DecodeError::UnsupportedFormat(e.to_string()),
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
