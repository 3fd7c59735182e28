//! WASM-compatible wrapper types for compression results.
//!
//! Plain data such as configs, attempts, and catalog items crosses the
//! boundary through `serde-wasm-bindgen`. The result types here are
//! `#[wasm_bindgen]` classes instead, so the output bytes stay in WASM
//! memory until JavaScript asks for them.

use storefront_core::compress::{CompressionResult, CompressionStatus, StopReason};
use wasm_bindgen::prelude::*;

/// The outcome of a compression call.
///
/// # Memory Management
///
/// The encoded bytes are stored in WASM memory. `bytes()` copies them into a
/// fresh `Uint8Array`; call it once and build the upload `Blob` from that.
#[wasm_bindgen]
pub struct JsCompressionResult {
    bytes: Vec<u8>,
    size_bytes: u64,
    mime_type: String,
    attempts: u32,
    dimensions: Option<(u32, u32)>,
    quality: Option<f32>,
    was_resized: bool,
    status: CompressionStatus,
}

#[wasm_bindgen]
impl JsCompressionResult {
    /// Returns the output bytes as Uint8Array.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter, js_name = sizeBytes)]
    pub fn size_bytes(&self) -> f64 {
        self.size_bytes as f64
    }

    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    /// Encode attempts made; 0 when the source was returned untouched.
    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Output width, or `undefined` on passthrough.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> Option<u32> {
        self.dimensions.map(|(w, _)| w)
    }

    /// Output height, or `undefined` on passthrough.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> Option<u32> {
        self.dimensions.map(|(_, h)| h)
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> Option<f32> {
        self.quality
    }

    #[wasm_bindgen(getter, js_name = wasResized)]
    pub fn was_resized(&self) -> bool {
        self.was_resized
    }

    /// `true` when the output is a best effort still over the budget.
    #[wasm_bindgen(getter, js_name = budgetUnmet)]
    pub fn budget_unmet(&self) -> bool {
        matches!(self.status, CompressionStatus::BudgetUnmet(_))
    }

    /// One of `"passthrough"`, `"withinBudget"`, `"budgetUnmet"`.
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        match self.status {
            CompressionStatus::Passthrough => "passthrough",
            CompressionStatus::WithinBudget => "withinBudget",
            CompressionStatus::BudgetUnmet(_) => "budgetUnmet",
        }
        .to_string()
    }

    /// Why the budget was missed: `"maxAttempts"` or `"minimumDimensions"`.
    #[wasm_bindgen(getter, js_name = stopReason)]
    pub fn stop_reason(&self) -> Option<String> {
        match self.status {
            CompressionStatus::BudgetUnmet(StopReason::MaxAttempts) => {
                Some("maxAttempts".to_string())
            }
            CompressionStatus::BudgetUnmet(StopReason::MinimumDimensions) => {
                Some("minimumDimensions".to_string())
            }
            _ => None,
        }
    }
}

impl JsCompressionResult {
    pub(crate) fn from_result(result: CompressionResult) -> Self {
        let was_resized = result.was_resized();
        Self {
            bytes: result.bytes,
            size_bytes: result.size_bytes,
            mime_type: result.mime_type,
            attempts: result.attempts,
            dimensions: result.dimensions,
            quality: result.quality,
            was_resized,
            status: result.status,
        }
    }
}

/// Pixel dimensions as the browser will display them.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsDimensions {
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsDimensions {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl From<(u32, u32)> for JsDimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}
