//! Image decoding and resizing.
//!
//! This module provides functionality for:
//! - Decoding uploaded images (JPEG, PNG, WebP, GIF) with EXIF orientation applied
//! - Recognizing HEIC/HEIF uploads that must be converted before decoding
//! - Aspect-preserving dimension arithmetic
//! - Single-pass and progressive (successive halving) resizing
//!
//! # Architecture
//!
//! Everything here is synchronous and single-threaded so it can run inside
//! WASM on the browser's main thread or a worker.
//!
//! # Examples
//!
//! ```ignore
//! use storefront_core::decode::{decode_image, calculate_fit_dimensions};
//!
//! let image = decode_image(&bytes)?;
//! let (w, h) = calculate_fit_dimensions(image.width, image.height, 4096, 4096);
//! ```

mod heic;
mod raster;
mod resize;
mod types;

pub use heic::{is_heic, is_heic_mime};
pub use raster::{decode_image, detect_format, get_orientation, probe_dimensions};
pub use resize::{
    calculate_fit_dimensions, clamp_to_max_pixels, halving_steps, progressive_resize, resize,
    scale_dimensions,
};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
