//! Monochrome rasterization for thermal printer output.
//!
//! Turns an arbitrary color image into a binary (0/255) single-channel
//! bitmap: scale and crop to the print area, collapse to grayscale, then
//! error-diffusion dither. Packing the result into printer command bytes is
//! left to the consumer.

pub mod dither;
pub mod geometry;
pub mod grayscale;
pub mod pipeline;
pub mod pixels;
pub mod resize;

// Re-exports for convenience
pub use dither::{DIFFUSION_NEIGHBORS, dither};
pub use geometry::{Anchor, FitMode, HAlign, ParseFitModeError, Rect, VAlign};
pub use grayscale::{luminance, to_grayscale};
pub use pipeline::{
    DEFAULT_QUANT_WEIGHT, DEFAULT_THRESHOLD, RasterOptions, rasterize, rasterize_to_width,
};
pub use pixels::{Channels, PixelBuffer};
pub use resize::{Filter, Letterbox, ResizeOptions, scale_and_crop_to, scale_and_crop_with};

/// Standard thermal printer paper width in pixels.
pub const PAPER_WIDTH: u32 = 384;

/// Largest value an 8-bit sample can hold.
pub const MAX_SAMPLE: u8 = u8::MAX;

/// Errors that can occur while rasterizing an image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    #[error("Invalid dimension {width}x{height}: {reason}")]
    InvalidDimension {
        width: u32,
        height: u32,
        reason: &'static str,
    },

    #[error("Pixel data length mismatch: expected {expected} bytes, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    #[error("Unsupported channel count: {0} (expected 1 or 3)")]
    UnsupportedChannels(u8),
}

/// Result type alias for rasterization operations.
pub type Result<T> = std::result::Result<T, RasterError>;
