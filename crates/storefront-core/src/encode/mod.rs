//! Image encoding.
//!
//! Only JPEG output is produced; the storefront's image host serves every
//! listing photo as JPEG.

mod jpeg;

pub use jpeg::{
    encode_jpeg, quality_to_u8, EncodeError, Encoder, StandardJpegEncoder, MAX_JPEG_DIMENSION,
};
