//! Storefront WASM - WebAssembly bindings for the storefront
//!
//! This crate exposes the storefront-core compressor and catalog logic to
//! the browser's JavaScript glue.
//!
//! # Module Structure
//!
//! - `compress` - Adaptive compression of listing photos to a byte budget
//! - `decode` - HEIC detection and dimension probing for the upload form
//! - `catalog` - Listing grid filters, tag suggestions, and record checks
//! - `types` - WASM-compatible wrapper types for results
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image, is_heic } from '@storefront/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (!is_heic(bytes, file.type)) {
//!   const result = compress_image(bytes, file.type);
//!   console.log(`Compressed to ${result.sizeBytes} bytes`);
//! }
//! ```

use wasm_bindgen::prelude::*;

mod catalog;
mod compress;
mod decode;
mod types;

pub use catalog::{
    filter_items, format_price, normalize_tags, suggest_tags, validate_contact_request,
};
pub use compress::{
    compress_image, compress_image_for_platform, default_compression_config,
    detect_platform_profile,
};
pub use decode::{is_heic, probe_dimensions};
pub use types::{JsCompressionResult, JsDimensions};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
