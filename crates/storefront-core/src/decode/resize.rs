//! Resizing and dimension arithmetic.
//!
//! All dimension helpers round to the nearest whole pixel and never return a
//! zero edge for non-zero input. All resize functions return a new
//! `DecodedImage` without modifying the input.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions in a single pass.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for a zero target dimension and
/// `DecodeError::CorruptedFile` if the pixel buffer does not match the
/// declared dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let view = image
        .as_rgb_view()
        .ok_or_else(|| DecodeError::CorruptedFile("Pixel buffer size mismatch".to_string()))?;

    let resized = image::imageops::resize(&view, width, height, filter.to_image_filter());
    Ok(DecodedImage::from_rgb_image(resized))
}

/// Resize with successive halvings when the reduction exceeds 2x.
///
/// A single large downscale skips most source pixels and aliases badly.
/// The image is halved with a bilinear filter while either edge is more than
/// twice its target and halving would not undershoot, then one final pass
/// with `filter` lands on the exact target size.
pub fn progressive_resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    let steps = halving_steps(image.width, image.height, width, height);
    if steps.is_empty() {
        return resize(image, width, height, filter);
    }

    let mut current = resize(image, steps[0].0, steps[0].1, FilterType::Bilinear)?;
    for &(w, h) in &steps[1..] {
        current = resize(&current, w, h, FilterType::Bilinear)?;
    }
    resize(&current, width, height, filter)
}

/// Intermediate sizes visited by [`progressive_resize`] before the final pass.
pub fn halving_steps(src_width: u32, src_height: u32, width: u32, height: u32) -> Vec<(u32, u32)> {
    let mut steps = Vec::new();
    let (mut w, mut h) = (src_width, src_height);

    while w / 2 >= width.max(1)
        && h / 2 >= height.max(1)
        && (w > width.saturating_mul(2) || h > height.saturating_mul(2))
    {
        w /= 2;
        h /= 2;
        steps.push((w, h));
    }
    steps
}

/// Fit `width x height` inside `max_width x max_height`, preserving aspect
/// ratio. Never upscales: the ratio is clamped to 1.
pub fn calculate_fit_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = (max_width as f64 / width as f64)
        .min(max_height as f64 / height as f64)
        .min(1.0);

    scale_dimensions(width, height, ratio)
}

/// Multiply both edges by `factor`, rounding to the nearest pixel.
pub fn scale_dimensions(width: u32, height: u32, factor: f64) -> (u32, u32) {
    let w = (width as f64 * factor).round() as u32;
    let h = (height as f64 * factor).round() as u32;
    (w.max(1), h.max(1))
}

/// Shrink dimensions so `width * height` stays within `max_pixels`,
/// preserving aspect ratio.
pub fn clamp_to_max_pixels(width: u32, height: u32, max_pixels: u64) -> (u32, u32) {
    let pixels = width as u64 * height as u64;
    if pixels <= max_pixels || width == 0 || height == 0 {
        return (width, height);
    }

    let factor = (max_pixels as f64 / pixels as f64).sqrt();
    let (mut w, mut h) = scale_dimensions(width, height, factor);

    // Rounding up on both edges can land a few pixels over the ceiling.
    while w as u64 * h as u64 > max_pixels && w > 1 && h > 1 {
        if w >= h {
            w -= 1;
        } else {
            h -= 1;
        }
    }
    (w, h)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_fit_respects_bounds(
            width in 1u32..=20_000,
            height in 1u32..=20_000,
            max_width in 1u32..=8192,
            max_height in 1u32..=8192,
        ) {
            let (w, h) = calculate_fit_dimensions(width, height, max_width, max_height);
            prop_assert!(w <= max_width);
            prop_assert!(h <= max_height);
            prop_assert!(w <= width && h <= height, "never upscales");
        }

        #[test]
        fn prop_clamp_respects_pixel_ceiling(
            width in 1u32..=20_000,
            height in 1u32..=20_000,
            max_pixels in 1_000_000u64..=50_000_000,
        ) {
            let (w, h) = clamp_to_max_pixels(width, height, max_pixels);
            prop_assert!(w as u64 * h as u64 <= max_pixels);
            prop_assert!(w <= width && h <= height);
        }

        #[test]
        fn prop_halving_steps_shrink_monotonically(
            width in 1u32..=10_000,
            height in 1u32..=10_000,
            target_w in 1u32..=2000,
            target_h in 1u32..=2000,
        ) {
            let mut prev = (width, height);
            for step in halving_steps(width, height, target_w, target_h) {
                prop_assert!(step.0 < prev.0 && step.1 < prev.1);
                prop_assert!(step.0 >= target_w && step.1 >= target_h);
                prev = step;
            }
        }
    }
}
