//! Compression settings and the two tuning profiles.

use serde::{Deserialize, Serialize};

use super::CompressError;
use crate::decode::FilterType;

/// Output MIME type; JPEG is the only encoding the compressor produces.
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// Default upload budget: 8 MiB.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 8 * 1024 * 1024;

/// Named tuning presets.
///
/// `Mobile` trades visual quality for a much better chance of meeting the
/// budget on phones: lower quality floor, smaller minimum size, more
/// attempts, and more aggressive dimension cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionProfile {
    #[default]
    General,
    Mobile,
}

impl CompressionProfile {
    /// Default configuration for this profile.
    pub fn config(self) -> CompressionConfig {
        match self {
            CompressionProfile::General => CompressionConfig::general(),
            CompressionProfile::Mobile => CompressionConfig::mobile(),
        }
    }

    /// Parse a profile name as sent from JavaScript. Unknown names fall back
    /// to `General`.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("mobile") {
            CompressionProfile::Mobile
        } else {
            CompressionProfile::General
        }
    }
}

/// Parameters for one compression call.
///
/// Deserializes from a camelCase object where every field is optional;
/// missing fields take the `General` profile values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressionConfig {
    /// Byte budget for the output.
    pub max_size_bytes: u64,
    /// Largest allowed output width.
    pub max_width: u32,
    /// Largest allowed output height.
    pub max_height: u32,
    /// Starting encoder quality (0.0 to 1.0).
    pub quality: f32,
    /// Output MIME type. Must be `image/jpeg`.
    pub mime_type: String,
    /// Upper bound on encode attempts.
    pub max_attempts: u32,
    /// Quality is never reduced below this.
    pub quality_floor: f32,
    /// Minimum output width; dimension cuts stop before crossing it.
    pub min_width: u32,
    /// Minimum output height.
    pub min_height: u32,
    /// Smallest per-step dimension scale factor.
    pub dimension_floor: f64,
    /// Headroom applied to the size ratio before taking its square root.
    pub safety_factor: f64,
    /// Filter for the final resize pass.
    pub filter: FilterType,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self::general()
    }
}

impl CompressionConfig {
    /// Desktop-oriented defaults.
    pub fn general() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            max_width: 4096,
            max_height: 4096,
            quality: 0.92,
            mime_type: JPEG_MIME_TYPE.to_string(),
            max_attempts: 10,
            quality_floor: 0.5,
            min_width: 800,
            min_height: 600,
            dimension_floor: 0.7,
            safety_factor: 0.9,
            filter: FilterType::Lanczos3,
        }
    }

    /// Phone-oriented defaults.
    pub fn mobile() -> Self {
        Self {
            max_attempts: 15,
            quality_floor: 0.35,
            min_width: 400,
            min_height: 300,
            dimension_floor: 0.6,
            safety_factor: 0.8,
            ..Self::general()
        }
    }

    /// Same config with a different byte budget.
    pub fn with_max_size(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    /// Same config with different maximum dimensions.
    pub fn with_max_dimensions(mut self, max_width: u32, max_height: u32) -> Self {
        self.max_width = max_width;
        self.max_height = max_height;
        self
    }

    /// Same config with different minimum dimensions.
    pub fn with_min_dimensions(mut self, min_width: u32, min_height: u32) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    /// Minimum edges as (long, short), so the floor applies the same way to
    /// portrait and landscape images.
    pub fn min_edges(&self) -> (u32, u32) {
        (
            self.min_width.max(self.min_height),
            self.min_width.min(self.min_height),
        )
    }

    /// Whether `width x height` is smaller than the configured minimum.
    pub fn is_below_minimum(&self, width: u32, height: u32) -> bool {
        let (min_long, min_short) = self.min_edges();
        width.max(height) < min_long || width.min(height) < min_short
    }

    /// Check the config for values the compression loop cannot work with.
    pub fn validate(&self) -> Result<(), CompressError> {
        let invalid = |msg: String| Err(CompressError::InvalidConfig(msg));

        if !self.mime_type.trim().eq_ignore_ascii_case(JPEG_MIME_TYPE) {
            return invalid(format!("unsupported output type {}", self.mime_type));
        }
        if self.max_size_bytes == 0 {
            return invalid("maxSizeBytes must be positive".to_string());
        }
        if self.max_width == 0 || self.max_height == 0 {
            return invalid(format!(
                "max dimensions must be positive, got {}x{}",
                self.max_width, self.max_height
            ));
        }
        if self.max_attempts == 0 {
            return invalid("maxAttempts must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.quality) {
            return invalid(format!("quality {} outside 0.0..=1.0", self.quality));
        }
        if !(self.quality_floor > 0.0 && self.quality_floor <= 1.0) {
            return invalid(format!("qualityFloor {} outside (0, 1]", self.quality_floor));
        }
        if self.quality < self.quality_floor {
            return invalid(format!(
                "quality {} below qualityFloor {}",
                self.quality, self.quality_floor
            ));
        }
        if !(self.dimension_floor > 0.0 && self.dimension_floor < 1.0) {
            return invalid(format!(
                "dimensionFloor {} outside (0, 1)",
                self.dimension_floor
            ));
        }
        if !(self.safety_factor > 0.0 && self.safety_factor <= 1.0) {
            return invalid(format!("safetyFactor {} outside (0, 1]", self.safety_factor));
        }
        let (min_long, min_short) = self.min_edges();
        let max_long = self.max_width.max(self.max_height);
        let max_short = self.max_width.min(self.max_height);
        if min_long > max_long || min_short > max_short {
            return invalid(format!(
                "minimum {}x{} exceeds maximum {}x{}",
                self.min_width, self.min_height, self.max_width, self.max_height
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_defaults() {
        let config = CompressionConfig::default();
        assert_eq!(config.max_size_bytes, 8 * 1024 * 1024);
        assert_eq!((config.max_width, config.max_height), (4096, 4096));
        assert_eq!(config.quality, 0.92);
        assert_eq!(config.max_attempts, 10);
        assert_eq!(config.quality_floor, 0.5);
        assert_eq!((config.min_width, config.min_height), (800, 600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mobile_defaults() {
        let config = CompressionProfile::Mobile.config();
        assert_eq!(config.max_attempts, 15);
        assert_eq!(config.quality_floor, 0.35);
        assert_eq!((config.min_width, config.min_height), (400, 300));
        assert_eq!(config.dimension_floor, 0.6);
        assert_eq!(config.safety_factor, 0.8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profile_from_name() {
        assert_eq!(CompressionProfile::from_name("Mobile"), CompressionProfile::Mobile);
        assert_eq!(CompressionProfile::from_name("desktop"), CompressionProfile::General);
        assert_eq!(CompressionProfile::from_name(""), CompressionProfile::General);
    }

    #[test]
    fn test_deserialize_partial_camel_case() {
        let config: CompressionConfig =
            serde_json::from_str(r#"{"maxSizeBytes": 1048576, "maxWidth": 2048, "quality": 0.8}"#)
                .unwrap();
        assert_eq!(config.max_size_bytes, 1_048_576);
        assert_eq!(config.max_width, 2048);
        assert_eq!(config.max_height, 4096);
        assert_eq!(config.quality, 0.8);
        assert_eq!(config.mime_type, "image/jpeg");
    }

    #[test]
    fn test_minimum_is_orientation_agnostic() {
        let config = CompressionConfig::general();
        assert!(!config.is_below_minimum(800, 600));
        assert!(!config.is_below_minimum(600, 800));
        assert!(config.is_below_minimum(799, 600));
        assert!(config.is_below_minimum(1000, 599));
        assert!(config.is_below_minimum(599, 1000));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = CompressionConfig::general();

        let mut c = base.clone();
        c.quality = 1.2;
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.max_attempts = 0;
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.mime_type = "image/png".to_string();
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.max_size_bytes = 0;
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.dimension_floor = 1.0;
        assert!(c.validate().is_err());

        let c = base.clone().with_max_dimensions(640, 480);
        assert!(matches!(c.validate(), Err(CompressError::InvalidConfig(_))));

        let mut c = base.clone();
        c.quality_floor = f32::NAN;
        assert!(c.validate().is_err());

        let mut c = base;
        c.quality = 0.2;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_starting_quality_at_floor_is_valid() {
        let mut config = CompressionConfig::mobile();
        config.quality = config.quality_floor;
        assert!(config.validate().is_ok());

        config.quality = 0.3;
        assert!(matches!(
            config.validate(),
            Err(CompressError::InvalidConfig(msg)) if msg.contains("qualityFloor")
        ));
    }

    #[test]
    fn test_builders() {
        let config = CompressionConfig::mobile()
            .with_max_size(500_000)
            .with_max_dimensions(1600, 1600)
            .with_min_dimensions(320, 240);
        assert_eq!(config.max_size_bytes, 500_000);
        assert_eq!((config.max_width, config.max_height), (1600, 1600));
        assert_eq!(config.min_edges(), (320, 240));
        assert_eq!(config.quality_floor, 0.35);
    }
}
