//! Error-diffusion dithering from grayscale to black-and-white.
//!
//! Each pixel's quantization error is pushed forward to six not-yet-visited
//! neighbors, each receiving `error * quant_weight`:
//!
//! ```text
//!        X   1   1
//!    1   1   1
//!        1
//! ```
//!
//! With `quant_weight = 1/8` this is Atkinson's scheme: three quarters of
//! the error propagates and the rest is dropped, which keeps highlights and
//! shadows crisp on thermal paper.

use tracing::debug;

use crate::grayscale::to_grayscale;
use crate::pixels::{Channels, PixelBuffer};
use crate::{MAX_SAMPLE, RasterError, Result};

/// Diffusion targets relative to the current pixel, in application order.
pub const DIFFUSION_NEIGHBORS: [(i64, i64); 6] = [
    (1, 0),  // east
    (2, 0),  // east-east
    (-1, 1), // southwest
    (0, 1),  // south
    (1, 1),  // southeast
    (0, 2),  // south-south
];

/// Dither an image to pure black (0) and white (255).
///
/// Color input is converted with [`to_grayscale`] first. A pixel becomes
/// white when its error-adjusted value reaches `threshold * 255`.
/// Neither `threshold` nor `quant_weight` is range-checked: values outside
/// `0.0..=1.0` are accepted and just shift the result.
pub fn dither(source: &PixelBuffer, threshold: f32, quant_weight: f32) -> Result<PixelBuffer> {
    let gray = to_grayscale(source);
    let (width, height) = gray.dimensions();
    if gray.is_empty() {
        return Err(RasterError::InvalidDimension {
            width,
            height,
            reason: "cannot dither an empty image",
        });
    }

    debug!(
        width,
        height,
        threshold,
        quant_weight,
        "Applying error-diffusion dithering"
    );

    let cutoff = threshold * f32::from(MAX_SAMPLE);
    let mut errors = vec![0.0f32; gray.pixel_count()];
    let mut output = gray.data().to_vec();

    for y in 0..height {
        for x in 0..width {
            let idx = y as usize * width as usize + x as usize;

            // Integer working value; the fractional part of the error is dropped.
            // Divergent errors saturate instead of overflowing.
            let old_value = (f32::from(output[idx]) + errors[idx]) as i64;
            let new_value = if (old_value as f32) < cutoff {
                0
            } else {
                MAX_SAMPLE
            };
            output[idx] = new_value;

            let quant_error = old_value.saturating_sub(i64::from(new_value));
            distribute_error(
                &mut errors,
                x,
                y,
                width,
                height,
                quant_error as f32 * quant_weight,
            );
        }
    }

    debug!("Error-diffusion dithering complete");
    Ok(PixelBuffer::from_parts(width, height, Channels::Gray, output))
}

/// Add `amount` to every in-bounds diffusion target of `(x, y)`.
fn distribute_error(errors: &mut [f32], x: u32, y: u32, width: u32, height: u32, amount: f32) {
    for (dx, dy) in DIFFUSION_NEIGHBORS {
        let nx = i64::from(x) + dx;
        let ny = i64::from(y) + dy;
        if nx < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
            continue;
        }
        errors[ny as usize * width as usize + nx as usize] += amount;
    }
}
