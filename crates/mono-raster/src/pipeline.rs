//! End-to-end rasterization: resize, grayscale, dither.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::PAPER_WIDTH;
use crate::dither::dither;
use crate::geometry::{Anchor, FitMode};
use crate::grayscale::to_grayscale;
use crate::pixels::PixelBuffer;
use crate::resize::{Filter, Letterbox, ResizeOptions, scale_and_crop_with};
use crate::{RasterError, Result};

/// Default fraction of quantization error sent to each neighbor.
pub const DEFAULT_QUANT_WEIGHT: f32 = 0.125;

/// Default black/white cutoff as a fraction of full scale.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Configuration for [`rasterize`].
///
/// `threshold` and `quant_weight` are passed to the ditherer unchecked;
/// callers wanting stricter input should validate before building options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Output width in pixels (print head dots).
    pub width: u32,

    /// Output height in pixels.
    pub height: u32,

    /// Scale/crop behavior.
    pub resize: ResizeOptions,

    /// Cutoff in `0.0..=1.0` of full scale; darker pixels print black.
    pub threshold: f32,

    /// Weight applied to the error diffused into each of the six neighbors.
    pub quant_weight: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            width: PAPER_WIDTH,
            height: PAPER_WIDTH,
            resize: ResizeOptions::default(),
            threshold: DEFAULT_THRESHOLD,
            quant_weight: DEFAULT_QUANT_WEIGHT,
        }
    }
}

impl RasterOptions {
    /// Create options with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set output size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder: set fit mode.
    pub fn with_mode(mut self, mode: FitMode) -> Self {
        self.resize.mode = mode;
        self
    }

    /// Builder: set anchor.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.resize.anchor = anchor;
        self
    }

    /// Builder: set letterbox policy.
    pub fn with_letterbox(mut self, letterbox: Letterbox) -> Self {
        self.resize.letterbox = letterbox;
        self
    }

    /// Builder: set resampling filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.resize.filter = filter;
        self
    }

    /// Builder: set dither threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Builder: set per-neighbor error weight.
    pub fn with_quant_weight(mut self, quant_weight: f32) -> Self {
        self.quant_weight = quant_weight;
        self
    }
}

/// Produce a binary bitmap of exactly `opts.width × opts.height`.
pub fn rasterize(source: &PixelBuffer, opts: &RasterOptions) -> Result<PixelBuffer> {
    let (src_w, src_h) = source.dimensions();
    debug!(
        src_w,
        src_h,
        width = opts.width,
        height = opts.height,
        mode = %opts.resize.mode,
        "Rasterizing image"
    );

    let framed = scale_and_crop_with(source, opts.width, opts.height, &opts.resize)?;
    let gray = to_grayscale(&framed);
    dither(&gray, opts.threshold, opts.quant_weight)
}

/// Rasterize to a fixed width, deriving height from the source aspect ratio.
///
/// Suits receipt printers, where paper length is not a constraint.
/// `opts.width` and `opts.height` are ignored.
pub fn rasterize_to_width(
    source: &PixelBuffer,
    width: u32,
    opts: &RasterOptions,
) -> Result<PixelBuffer> {
    let (src_w, src_h) = source.dimensions();
    if source.is_empty() {
        return Err(RasterError::InvalidDimension {
            width: src_w,
            height: src_h,
            reason: "source image has zero area",
        });
    }

    let ratio = f64::from(width) / f64::from(src_w);
    let height = (f64::from(src_h) * ratio)
        .round()
        .clamp(1.0, f64::from(u32::MAX)) as u32;

    rasterize(
        source,
        &RasterOptions {
            width,
            height,
            ..*opts
        },
    )
}
