//! Color to single-channel luminance conversion.
//!
//! The weights below are fixed. Printed output is tuned against them, so
//! they must not be swapped for BT.601/BT.709 luma coefficients.

use std::borrow::Cow;

use tracing::debug;

use crate::pixels::{Channels, PixelBuffer};

const RED_WEIGHT: f64 = 0.21;
const GREEN_WEIGHT: f64 = 0.71;
const BLUE_WEIGHT: f64 = 0.07;

/// Luminance of one RGB pixel, truncated to 8 bits.
///
/// The weights sum to 0.99, so pure white maps to 252.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = RED_WEIGHT * f64::from(r) + GREEN_WEIGHT * f64::from(g) + BLUE_WEIGHT * f64::from(b);
    y as u8
}

/// Convert a buffer to single-channel grayscale.
///
/// Grayscale input is returned borrowed and untouched.
pub fn to_grayscale(source: &PixelBuffer) -> Cow<'_, PixelBuffer> {
    if source.channels() == Channels::Gray {
        return Cow::Borrowed(source);
    }

    let (width, height) = source.dimensions();
    debug!(width, height, "Converting image to grayscale");

    let data: Vec<u8> = source
        .data()
        .chunks_exact(3)
        .map(|px| luminance(px[0], px[1], px[2]))
        .collect();

    Cow::Owned(PixelBuffer::from_parts(width, height, Channels::Gray, data))
}
