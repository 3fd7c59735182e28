//! Storefront Core - image and catalog logic for the secondhand storefront
//!
//! This crate provides the logic behind the listing upload form and the
//! listing grid: adaptive compression of seller photos to the image host's
//! byte budget, the decode/resize/encode primitives it is built on, the
//! document shapes stored in the database, and catalog filtering.

pub mod catalog;
pub mod compress;
pub mod decode;
pub mod encode;
pub mod records;

pub use catalog::{filter_items, suggest_tags, CatalogQuery, SortOrder, TagSuggestion};
pub use compress::{
    compress_image, compress_image_for_platform, CompressError, CompressionConfig,
    CompressionProfile, CompressionResult, CompressionStatus, Compressor, PlatformProfile,
    SourceImage,
};
pub use records::{ContactRequest, Item, Price, RequestStatus, UserProfile};
