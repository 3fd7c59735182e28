//! The adaptive compression loop.
//!
//! Each attempt renders the decoded source at the current dimensions,
//! encodes it at the current quality, and compares the byte count against
//! the budget. Overshoots first cost quality, scaled by how far over the
//! budget the attempt landed; once quality sits at its floor, the dimensions
//! shrink instead. Attempts are strictly sequential because each one's
//! parameters come from the previous one's measured size.

use tracing::{debug, warn};

use super::{
    CompressError, CompressionAttempt, CompressionConfig, CompressionResult, CompressionStatus,
    PlatformProfile, SourceImage, StopReason, JPEG_MIME_TYPE,
};
use crate::decode::{
    calculate_fit_dimensions, decode_image, is_heic_mime, progressive_resize, scale_dimensions,
    DecodeError, DecodedImage,
};
use crate::encode::{Encoder, StandardJpegEncoder};

/// Smallest quality reduction per attempt.
pub const MIN_QUALITY_STEP: f32 = 0.1;

/// Scales the overshoot into a quality reduction.
pub const QUALITY_AGGRESSIVENESS: f64 = 0.3;

/// Dimension scale for the single retry after an encode failure.
pub const ENCODE_RETRY_SCALE: f64 = 0.7;

/// Next quality after an attempt that landed at `size_ratio` of the budget
/// (budget / actual, so below 1 when over).
///
/// Large overshoots cut harder; the cut is never less than
/// [`MIN_QUALITY_STEP`] and never goes below `floor`.
pub fn next_quality(quality: f32, size_ratio: f64, floor: f32) -> f32 {
    let step = ((1.0 - size_ratio) * QUALITY_AGGRESSIVENESS) as f32;
    (quality - step.max(MIN_QUALITY_STEP)).max(floor)
}

/// Per-edge scale factor once quality is exhausted.
///
/// Encoded size tracks pixel area, so shrinking the area by `size_ratio`
/// means shrinking each edge by its square root.
pub fn dimension_scale(size_ratio: f64, config: &CompressionConfig) -> f64 {
    (size_ratio * config.safety_factor)
        .sqrt()
        .max(config.dimension_floor)
}

/// Dimensions of the first attempt: the source fitted inside the configured
/// maximum and, when a platform profile is given, inside its ceilings.
pub fn initial_dimensions(
    source_width: u32,
    source_height: u32,
    config: &CompressionConfig,
    platform: Option<PlatformProfile>,
) -> (u32, u32) {
    let (w, h) = calculate_fit_dimensions(
        source_width,
        source_height,
        config.max_width,
        config.max_height,
    );
    match platform {
        Some(profile) => profile.clamp(w, h),
        None => (w, h),
    }
}

/// Compress `source` to fit `config` using the default JPEG encoder.
pub fn compress_image(
    source: &SourceImage,
    config: &CompressionConfig,
) -> Result<CompressionResult, CompressError> {
    Compressor::new().compress(source, config)
}

/// Compress `source` within the hardware ceilings of `platform`.
pub fn compress_image_for_platform(
    source: &SourceImage,
    config: &CompressionConfig,
    platform: PlatformProfile,
) -> Result<CompressionResult, CompressError> {
    Compressor::new().with_platform(platform).compress(source, config)
}

/// An encoded attempt kept as a candidate result.
struct Candidate {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    quality: f32,
}

/// Runs the compression loop with a given encoder.
///
/// Without a platform profile this is the general variant: encode failures
/// propagate immediately. With one, the first attempt is clamped to the
/// profile's ceilings and a failed encode is retried once at 70% size.
#[derive(Debug, Clone, Default)]
pub struct Compressor<E = StandardJpegEncoder> {
    encoder: E,
    platform: Option<PlatformProfile>,
}

impl Compressor<StandardJpegEncoder> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: Encoder> Compressor<E> {
    pub fn with_encoder(encoder: E) -> Self {
        Self {
            encoder,
            platform: None,
        }
    }

    /// Switch to the platform-aware variant.
    pub fn with_platform(mut self, platform: PlatformProfile) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn compress(
        &self,
        source: &SourceImage,
        config: &CompressionConfig,
    ) -> Result<CompressionResult, CompressError> {
        self.compress_with_progress(source, config, |_| {})
    }

    /// Like [`compress`](Self::compress), reporting each finished attempt to
    /// `on_attempt` before the next one starts.
    pub fn compress_with_progress<F>(
        &self,
        source: &SourceImage,
        config: &CompressionConfig,
        mut on_attempt: F,
    ) -> Result<CompressionResult, CompressError>
    where
        F: FnMut(&CompressionAttempt),
    {
        config.validate()?;

        if source.byte_len() <= config.max_size_bytes {
            debug!(
                size = source.byte_len(),
                budget = config.max_size_bytes,
                "source within budget, returning unchanged"
            );
            return Ok(CompressionResult::passthrough(source));
        }

        if is_heic_mime(source.mime_type()) {
            return Err(DecodeError::UnsupportedFormat(source.mime_type().to_string()).into());
        }

        let decoded = decode_image(source.bytes())?;
        let source_dimensions = (decoded.width, decoded.height);
        let (mut width, mut height) =
            initial_dimensions(decoded.width, decoded.height, config, self.platform);
        let mut quality = config.quality;
        let mut best: Option<Candidate> = None;
        let mut attempts = 0;
        let mut stop_reason = StopReason::MaxAttempts;

        for attempt in 1..=config.max_attempts {
            attempts = attempt;
            let candidate = self.render_attempt(&decoded, width, height, quality, config)?;
            // A platform retry may have shrunk the surface.
            width = candidate.width;
            height = candidate.height;

            let size = candidate.bytes.len() as u64;
            on_attempt(&CompressionAttempt {
                attempt,
                width,
                height,
                quality,
                result_size_bytes: size,
            });
            debug!(attempt, width, height, quality, size, "compression attempt");

            if size <= config.max_size_bytes {
                return Ok(finish(
                    candidate,
                    attempt,
                    source_dimensions,
                    CompressionStatus::WithinBudget,
                ));
            }

            if best.as_ref().map_or(true, |b| size < b.bytes.len() as u64) {
                best = Some(candidate);
            }

            if attempt == config.max_attempts {
                break;
            }

            let size_ratio = config.max_size_bytes as f64 / size as f64;
            if quality > config.quality_floor {
                quality = next_quality(quality, size_ratio, config.quality_floor);
            } else {
                let scale = dimension_scale(size_ratio, config);
                let (next_w, next_h) = scale_dimensions(width, height, scale);
                if config.is_below_minimum(next_w, next_h) {
                    stop_reason = StopReason::MinimumDimensions;
                    break;
                }
                width = next_w;
                height = next_h;
            }
        }

        let Some(best) = best else {
            return Err(CompressError::InvalidConfig(
                "compression loop made no attempts".to_string(),
            ));
        };

        warn!(
            size = best.bytes.len(),
            budget = config.max_size_bytes,
            attempts,
            ?stop_reason,
            "budget not met, returning best effort"
        );
        Ok(finish(
            best,
            attempts,
            source_dimensions,
            CompressionStatus::BudgetUnmet(stop_reason),
        ))
    }

    /// Render and encode at the given size, with the platform variant's
    /// single reduced-size retry on encode failure.
    fn render_attempt(
        &self,
        decoded: &DecodedImage,
        width: u32,
        height: u32,
        quality: f32,
        config: &CompressionConfig,
    ) -> Result<Candidate, CompressError> {
        match self.render_and_encode(decoded, width, height, quality, config) {
            Err(CompressError::Encode(err)) if self.platform.is_some() => {
                let (retry_w, retry_h) = scale_dimensions(width, height, ENCODE_RETRY_SCALE);
                let crosses_minimum = config.is_below_minimum(retry_w, retry_h)
                    && !config.is_below_minimum(width, height);
                if crosses_minimum {
                    return Err(CompressError::Encode(err));
                }
                warn!(
                    width,
                    height,
                    retry_width = retry_w,
                    retry_height = retry_h,
                    error = %err,
                    "encode failed, retrying at reduced size"
                );
                self.render_and_encode(decoded, retry_w, retry_h, quality, config)
            }
            other => other,
        }
    }

    fn render_and_encode(
        &self,
        decoded: &DecodedImage,
        width: u32,
        height: u32,
        quality: f32,
        config: &CompressionConfig,
    ) -> Result<Candidate, CompressError> {
        let surface = progressive_resize(decoded, width, height, config.filter)?;
        let bytes = self.encoder.encode(&surface, quality)?;
        Ok(Candidate {
            bytes,
            width,
            height,
            quality,
        })
    }
}

fn finish(
    candidate: Candidate,
    attempts: u32,
    source_dimensions: (u32, u32),
    status: CompressionStatus,
) -> CompressionResult {
    CompressionResult {
        size_bytes: candidate.bytes.len() as u64,
        bytes: candidate.bytes,
        mime_type: JPEG_MIME_TYPE.to_string(),
        attempts,
        dimensions: Some((candidate.width, candidate.height)),
        source_dimensions: Some(source_dimensions),
        quality: Some(candidate.quality),
        status,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use proptest::prelude::*;
    use std::io::Cursor;

    fn noisy_png(width: u32, height: u32, seed: u32) -> SourceImage {
        let mut state = seed.max(1);
        let pixels: Vec<u8> = (0..width * height * 3)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state & 0xFF) as u8
            })
            .collect();
        let img = RgbImage::from_raw(width, height, pixels).unwrap();
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        SourceImage::new(out.into_inner(), "image/png")
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_attempts_are_monotonic_and_bounded(
            width in 48u32..=160,
            height in 48u32..=160,
            budget in 400u64..=40_000,
            seed in 1u32..=10_000,
            mobile in any::<bool>(),
        ) {
            let source = noisy_png(width, height, seed);
            let base = if mobile { CompressionConfig::mobile() } else { CompressionConfig::general() };
            let config = base
                .with_max_size(budget)
                .with_max_dimensions(128, 128)
                .with_min_dimensions(32, 32);

            let mut history = Vec::new();
            let result = Compressor::new()
                .compress_with_progress(&source, &config, |a| history.push(*a))
                .unwrap();

            prop_assert!(result.attempts <= config.max_attempts);
            prop_assert_eq!(history.len() as u32, result.attempts);

            for pair in history.windows(2) {
                prop_assert!(pair[1].quality <= pair[0].quality);
                prop_assert!(pair[1].width <= pair[0].width);
                prop_assert!(pair[1].height <= pair[0].height);
            }
            for attempt in &history {
                prop_assert!(attempt.width <= 128 && attempt.height <= 128);
                prop_assert!(!config.is_below_minimum(attempt.width, attempt.height));
                prop_assert!(attempt.quality >= config.quality_floor);
            }

            match result.status {
                CompressionStatus::Passthrough => prop_assert!(source.byte_len() <= budget),
                CompressionStatus::WithinBudget => prop_assert!(result.size_bytes <= budget),
                CompressionStatus::BudgetUnmet(_) => prop_assert!(result.size_bytes > budget),
            }
        }

        #[test]
        fn prop_next_quality_stays_within_floor_and_start(
            quality in 0.35f32..=1.0,
            size_ratio in 0.0f64..1.0,
            floor in 0.1f32..=0.35,
        ) {
            let next = next_quality(quality, size_ratio, floor);
            prop_assert!(next >= floor);
            prop_assert!(next < quality || next == floor);
        }

        #[test]
        fn prop_dimension_scale_within_floor_and_one(size_ratio in 0.0f64..1.0) {
            for config in [CompressionConfig::general(), CompressionConfig::mobile()] {
                let scale = dimension_scale(size_ratio, &config);
                prop_assert!(scale >= config.dimension_floor);
                prop_assert!(scale < 1.0);
            }
        }
    }
}
