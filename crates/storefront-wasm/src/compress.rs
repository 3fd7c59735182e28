//! Adaptive compression WASM bindings.
//!
//! This module exposes the storefront-core compressor to the upload form.
//!
//! # Functions
//!
//! - [`compress_image`] - Compress a file to a byte budget
//! - [`compress_image_for_platform`] - Same, within the browser's hardware ceilings
//! - [`default_compression_config`] - Preset config object for a profile name
//! - [`detect_platform_profile`] - The profile the platform variant would pick
//!
//! # Example
//!
//! ```typescript
//! import { compress_image_for_platform, default_compression_config } from '@storefront/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const config = default_compression_config(isMobile ? 'mobile' : 'general');
//! const result = compress_image_for_platform(bytes, file.type, config, (attempt) => {
//!   progress.value = attempt.attempt / config.maxAttempts;
//! });
//! if (result.budgetUnmet) {
//!   showWarning(`Photo is still ${result.sizeBytes} bytes`);
//! }
//! const blob = new Blob([result.bytes()], { type: result.mimeType });
//! ```

use storefront_core::compress::{
    CompressionAttempt, CompressionConfig, CompressionProfile, CompressionResult, Compressor,
    PlatformProfile, SourceImage,
};
use wasm_bindgen::prelude::*;

use crate::types::JsCompressionResult;

/// Read a config object from JavaScript. `undefined` or `null` selects the
/// `general` preset; missing fields take their `general` values.
fn config_from_js(config: JsValue) -> Result<CompressionConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(CompressionConfig::general());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid compression config: {}", e)))
}

/// Forward an attempt to the optional progress callback.
///
/// Callback failures are logged and otherwise ignored; a broken progress bar
/// must not abort the upload.
fn report_progress(on_progress: Option<&js_sys::Function>, attempt: &CompressionAttempt) {
    let Some(callback) = on_progress else {
        return;
    };
    let value = match serde_wasm_bindgen::to_value(attempt) {
        Ok(value) => value,
        Err(e) => {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
            return;
        }
    };
    if let Err(e) = callback.call1(&JsValue::NULL, &value) {
        web_sys::console::warn_2(&JsValue::from_str("Progress callback failed:"), &e);
    }
}

fn run(
    compressor: Compressor,
    bytes: Vec<u8>,
    mime_type: &str,
    config: JsValue,
    on_progress: Option<js_sys::Function>,
) -> Result<JsCompressionResult, JsValue> {
    let config = config_from_js(config)?;
    let source = SourceImage::new(bytes, mime_type);

    let result: CompressionResult = compressor
        .compress_with_progress(&source, &config, |attempt| {
            report_progress(on_progress.as_ref(), attempt)
        })
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    if result.exceeds_budget() {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "Could not compress image below {} bytes; best effort is {} bytes",
            config.max_size_bytes, result.size_bytes
        )));
    }

    Ok(JsCompressionResult::from_result(result))
}

/// Compress an uploaded file to fit the config's byte budget.
///
/// Files already within budget are returned unchanged without decoding.
/// Anything else is re-encoded as JPEG, lowering quality first and then
/// resolution until it fits or a floor is reached.
///
/// # Arguments
///
/// * `bytes` - The file bytes as a `Uint8Array`
/// * `mime_type` - The file's declared type (`File.type`)
/// * `config` - Optional config object; see [`default_compression_config`]
/// * `on_progress` - Optional callback receiving each attempt as
///   `{ attempt, width, height, quality, resultSizeBytes }`
///
/// # Errors
///
/// Returns an error if:
/// - The bytes are not a decodable image (HEIC must be converted first)
/// - The config is malformed or out of range
/// - The JPEG encoder fails
///
/// Missing the budget is not an error; check `budgetUnmet` on the result.
#[wasm_bindgen]
pub fn compress_image(
    bytes: Vec<u8>,
    mime_type: &str,
    config: JsValue,
    on_progress: Option<js_sys::Function>,
) -> Result<JsCompressionResult, JsValue> {
    run(Compressor::new(), bytes, mime_type, config, on_progress)
}

/// Compress an uploaded file within this browser's canvas limits.
///
/// Like [`compress_image`], but the first attempt is clamped to the
/// detected platform profile and a failed encode is retried once at a
/// smaller size.
#[wasm_bindgen]
pub fn compress_image_for_platform(
    bytes: Vec<u8>,
    mime_type: &str,
    config: JsValue,
    on_progress: Option<js_sys::Function>,
) -> Result<JsCompressionResult, JsValue> {
    let compressor = Compressor::new().with_platform(current_platform());
    run(compressor, bytes, mime_type, config, on_progress)
}

/// Preset config object for `"general"` or `"mobile"`.
///
/// Unknown names return the general preset.
#[wasm_bindgen]
pub fn default_compression_config(profile: &str) -> Result<JsValue, JsValue> {
    let config = CompressionProfile::from_name(profile).config();
    serde_wasm_bindgen::to_value(&config).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `"low"` or `"high"`, as detected from `navigator`.
#[wasm_bindgen]
pub fn detect_platform_profile() -> String {
    profile_name(current_platform()).to_string()
}

fn profile_name(profile: PlatformProfile) -> &'static str {
    match profile {
        PlatformProfile::Low => "low",
        PlatformProfile::High => "high",
    }
}

/// Detect the platform profile from the user agent and `deviceMemory`.
///
/// Outside a window context (e.g. a worker without `window`) this falls back
/// to the default profile.
fn current_platform() -> PlatformProfile {
    let Some(window) = web_sys::window() else {
        return PlatformProfile::default();
    };
    let navigator = window.navigator();
    let user_agent = navigator.user_agent().unwrap_or_default();
    let device_memory = js_sys::Reflect::get(&navigator, &JsValue::from_str("deviceMemory"))
        .ok()
        .and_then(|value| value.as_f64());
    PlatformProfile::detect(&user_agent, device_memory)
}
