//! Inputs, per-attempt records, and results of a compression call.

use serde::Serialize;
use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Fatal compression failures.
///
/// Missing the byte budget is not one of these; see
/// [`CompressionStatus::BudgetUnmet`].
#[derive(Debug, Error)]
pub enum CompressError {
    /// The source bytes are not a decodable image. Never retried.
    #[error("Failed to decode source image: {0}")]
    Decode(#[from] DecodeError),

    /// The pixel surface could not be serialized, including after the
    /// reduced-size retry where one applies.
    #[error("Failed to encode image: {0}")]
    Encode(#[from] EncodeError),

    /// The configuration cannot drive the compression loop.
    #[error("Invalid compression config: {0}")]
    InvalidConfig(String),
}

/// An uploaded file as read from the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl SourceImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type as declared by the browser. Not trusted for decoding.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// One iteration of the compression loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionAttempt {
    /// 1-based attempt number.
    pub attempt: u32,
    pub width: u32,
    pub height: u32,
    pub quality: f32,
    pub result_size_bytes: u64,
}

/// Why the loop gave up before meeting the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StopReason {
    /// `maxAttempts` encodes were made.
    MaxAttempts,
    /// The next dimension cut would have crossed the minimum size.
    MinimumDimensions,
}

/// How a compression call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "camelCase")]
pub enum CompressionStatus {
    /// The source already fit the budget and was returned untouched.
    Passthrough,
    /// A re-encode fit the budget.
    WithinBudget,
    /// Best-effort output that still exceeds the budget.
    BudgetUnmet(StopReason),
}

/// Output of a compression call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionResult {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub size_bytes: u64,
    pub mime_type: String,
    /// Encode attempts made; 0 on passthrough.
    pub attempts: u32,
    /// Output dimensions; `None` on passthrough, where nothing was decoded.
    pub dimensions: Option<(u32, u32)>,
    /// Source dimensions after orientation; `None` on passthrough.
    pub source_dimensions: Option<(u32, u32)>,
    /// Encoder quality of the returned bytes; `None` on passthrough.
    pub quality: Option<f32>,
    pub status: CompressionStatus,
}

impl CompressionResult {
    pub(crate) fn passthrough(source: &SourceImage) -> Self {
        Self {
            bytes: source.bytes.clone(),
            size_bytes: source.byte_len(),
            mime_type: source.mime_type.clone(),
            attempts: 0,
            dimensions: None,
            source_dimensions: None,
            quality: None,
            status: CompressionStatus::Passthrough,
        }
    }

    /// Whether the output dimensions differ from the source.
    pub fn was_resized(&self) -> bool {
        match (self.dimensions, self.source_dimensions) {
            (Some(out), Some(src)) => out != src,
            _ => false,
        }
    }

    /// Whether the output is still over budget.
    pub fn exceeds_budget(&self) -> bool {
        matches!(self.status, CompressionStatus::BudgetUnmet(_))
    }
}
