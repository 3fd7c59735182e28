//! Adaptive compression of listing photos to a byte budget.
//!
//! Photos taken on modern phones routinely exceed what the image host
//! accepts. The compressor re-encodes them as JPEG, trading quality first
//! and resolution second, until the output fits the budget or a floor is
//! reached.
//!
//! # Outcomes
//!
//! - Sources already within budget come back untouched, without decoding.
//! - Otherwise the result is either within budget, or a best-effort output
//!   flagged [`CompressionStatus::BudgetUnmet`]. Missing the budget is never
//!   an error; the caller decides whether to accept it.
//! - Undecodable input and unrecoverable encode failures are
//!   [`CompressError`]s.
//!
//! # Examples
//!
//! ```ignore
//! use storefront_core::compress::{compress_image, CompressionConfig, SourceImage};
//!
//! let source = SourceImage::new(bytes, "image/jpeg");
//! let result = compress_image(&source, &CompressionConfig::general())?;
//! if result.exceeds_budget() {
//!     // warn the seller, or retry with CompressionConfig::mobile()
//! }
//! ```

mod compressor;
mod config;
mod platform;
mod types;

pub use compressor::{
    compress_image, compress_image_for_platform, dimension_scale, initial_dimensions,
    next_quality, Compressor, ENCODE_RETRY_SCALE, MIN_QUALITY_STEP, QUALITY_AGGRESSIVENESS,
};
pub use config::{CompressionConfig, CompressionProfile, DEFAULT_MAX_SIZE_BYTES, JPEG_MIME_TYPE};
pub use platform::PlatformProfile;
pub use types::{
    CompressError, CompressionAttempt, CompressionResult, CompressionStatus, SourceImage,
    StopReason,
};
