//! Image inspection WASM bindings.
//!
//! The upload form uses these before compressing: HEIC files need a
//! JavaScript-side conversion first, and the preview shows the photo's
//! dimensions as the browser will display them.

use storefront_core::decode;
use wasm_bindgen::prelude::*;

use crate::types::JsDimensions;

/// Check whether a file is HEIC/HEIF.
///
/// Matches on either the container's brand or the declared MIME type, since
/// some browsers report an empty type for `.heic` files and some converters
/// leave a stale one.
///
/// # Example
///
/// ```typescript
/// if (is_heic(bytes, file.type)) {
///   bytes = await convertHeicToJpeg(file);
/// }
/// ```
#[wasm_bindgen]
pub fn is_heic(bytes: &[u8], mime_type: Option<String>) -> bool {
    decode::is_heic(bytes) || mime_type.as_deref().is_some_and(decode::is_heic_mime)
}

/// Read an image's display dimensions without decoding its pixels.
///
/// EXIF orientation is applied, so a portrait phone photo stored sideways
/// reports as portrait.
///
/// # Errors
///
/// Returns an error if the bytes are empty, HEIC, or not a supported image.
#[wasm_bindgen]
pub fn probe_dimensions(bytes: &[u8]) -> Result<JsDimensions, JsValue> {
    decode::probe_dimensions(bytes)
        .map(JsDimensions::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_probe_dimensions_invalid() {
        assert!(probe_dimensions(&[0, 1, 2, 3]).is_err());
        assert!(probe_dimensions(&[]).is_err());
    }
}
