//! Scale-and-crop to the exact print area.
//!
//! The source is resampled to the size chosen by [`Rect::scale_to`], then
//! each axis is either cropped (resampled length covers the target) or
//! padded according to the [`Letterbox`] policy.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, Luma, Pixel, Rgb};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{Anchor, FitMode, Rect};
use crate::pixels::PixelBuffer;
use crate::{RasterError, Result};

/// Resampling kernel, mirroring [`FilterType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    Nearest,
    Triangle,
    #[serde(alias = "catmull-rom")]
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<Filter> for FilterType {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => FilterType::Nearest,
            Filter::Triangle => FilterType::Triangle,
            Filter::CatmullRom => FilterType::CatmullRom,
            Filter::Gaussian => FilterType::Gaussian,
            Filter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// What to do with target area the scaled image does not reach.
///
/// Only `Fit` and `Center` can leave such area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Letterbox {
    /// Fill with this gray level on every channel.
    Pad(u8),
    /// Fail with [`RasterError::InvalidDimension`].
    Reject,
}

impl Default for Letterbox {
    fn default() -> Self {
        Letterbox::Pad(u8::MAX)
    }
}

/// Knobs for [`scale_and_crop_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeOptions {
    pub mode: FitMode,
    pub anchor: Anchor,
    pub letterbox: Letterbox,
    pub filter: Filter,
}

impl ResizeOptions {
    pub fn new(mode: FitMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Builder: set fit mode.
    pub fn with_mode(mut self, mode: FitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder: set anchor.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Builder: set letterbox policy.
    pub fn with_letterbox(mut self, letterbox: Letterbox) -> Self {
        self.letterbox = letterbox;
        self
    }

    /// Builder: set resampling filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }
}

/// Scale `source` under `mode` and crop to exactly `target_width × target_height`.
///
/// Uses centered anchoring, white letterboxing and Lanczos3 resampling.
pub fn scale_and_crop_to(
    source: &PixelBuffer,
    target_width: u32,
    target_height: u32,
    mode: FitMode,
) -> Result<PixelBuffer> {
    scale_and_crop_with(source, target_width, target_height, &ResizeOptions::new(mode))
}

/// Configurable form of [`scale_and_crop_to`].
///
/// The output keeps the source's channel layout.
pub fn scale_and_crop_with(
    source: &PixelBuffer,
    target_width: u32,
    target_height: u32,
    opts: &ResizeOptions,
) -> Result<PixelBuffer> {
    let (src_w, src_h) = source.dimensions();
    if source.is_empty() {
        return Err(RasterError::InvalidDimension {
            width: src_w,
            height: src_h,
            reason: "source image has zero area",
        });
    }
    if target_width == 0 || target_height == 0 {
        return Err(RasterError::InvalidDimension {
            width: target_width,
            height: target_height,
            reason: "target size must be non-zero",
        });
    }

    let target = Rect::from_size(target_width, target_height);
    let scaled = Rect::from_size(src_w, src_h).scale_to(&target, opts.mode, opts.anchor);
    let x = Span::new(scaled.x, scaled.width, target_width);
    let y = Span::new(scaled.y, scaled.height, target_height);

    let fill = match opts.letterbox {
        Letterbox::Pad(level) => level,
        Letterbox::Reject if x.is_short() || y.is_short() => {
            return Err(RasterError::InvalidDimension {
                width: x.size,
                height: y.size,
                reason: "scaled image does not cover the target",
            });
        }
        Letterbox::Reject => u8::MAX,
    };

    debug!(
        src_w,
        src_h,
        target_width,
        target_height,
        scaled_w = x.size,
        scaled_h = y.size,
        crop_x = x.crop,
        crop_y = y.crop,
        pad_x = x.pad,
        pad_y = y.pad,
        mode = %opts.mode,
        "Scaling and cropping image"
    );

    let framed: PixelBuffer = match source.to_dynamic()? {
        DynamicImage::ImageLuma8(img) => frame(&img, &x, &y, opts.filter, Luma([fill])).into(),
        DynamicImage::ImageRgb8(img) => frame(&img, &x, &y, opts.filter, Rgb([fill; 3])).into(),
        other => frame(&other.to_rgb8(), &x, &y, opts.filter, Rgb([fill; 3])).into(),
    };
    Ok(framed)
}

/// How one axis of the resampled image lands on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    /// Resampled length.
    size: u32,
    /// First resampled pixel kept when `size >= target`.
    crop: u32,
    /// Target offset of the content when `size < target`.
    pad: u32,
    target: u32,
}

impl Span {
    fn new(offset: f64, length: f64, target: u32) -> Self {
        // Rounded to nearest; a covering length is never short of the target
        // by more than float noise.
        let size = length.round().clamp(1.0, f64::from(u32::MAX)) as u32;
        if size >= target {
            let crop = (-offset).round().clamp(0.0, f64::from(size - target)) as u32;
            Self {
                size,
                crop,
                pad: 0,
                target,
            }
        } else {
            let pad = offset.round().clamp(0.0, f64::from(target - size)) as u32;
            Self {
                size,
                crop: 0,
                pad,
                target,
            }
        }
    }

    fn is_short(&self) -> bool {
        self.size < self.target
    }

    fn visible(&self) -> u32 {
        self.size.min(self.target)
    }
}

/// Resample, crop, and pad a concrete image buffer.
fn frame<P>(
    img: &ImageBuffer<P, Vec<u8>>,
    x: &Span,
    y: &Span,
    filter: Filter,
    fill: P,
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let resized = if img.dimensions() == (x.size, y.size) {
        debug!("Image already at scaled size, skipping resample");
        img.clone()
    } else {
        imageops::resize(img, x.size, y.size, filter.into())
    };

    let cropped = imageops::crop_imm(&resized, x.crop, y.crop, x.visible(), y.visible()).to_image();
    if !x.is_short() && !y.is_short() {
        return cropped;
    }

    let mut canvas = ImageBuffer::from_pixel(x.target, y.target, fill);
    imageops::replace(&mut canvas, &cropped, i64::from(x.pad), i64::from(y.pad));
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{HAlign, VAlign};
    use crate::pixels::Channels;

    fn solid(width: u32, height: u32, value: u8) -> PixelBuffer {
        PixelBuffer::filled(width, height, Channels::Gray, value).unwrap()
    }

    /// Left half black, right half white.
    fn split_image(width: u32, height: u32) -> PixelBuffer {
        let data = (0..height)
            .flat_map(|_| (0..width).map(move |x| if x < width / 2 { 0 } else { 255 }))
            .collect();
        PixelBuffer::gray(width, height, data).unwrap()
    }

    fn row(img: &PixelBuffer, y: u32) -> Vec<u8> {
        (0..img.width()).map(|x| img.pixel(x, y)[0]).collect()
    }

    #[test]
    fn test_output_matches_target_for_every_mode() {
        let src = solid(37, 91, 128);
        for mode in [FitMode::Fit, FitMode::Fill, FitMode::Center, FitMode::Stretch] {
            for (w, h) in [(1, 1), (50, 50), (384, 120), (12, 400)] {
                let out = scale_and_crop_to(&src, w, h, mode).unwrap();
                assert_eq!(out.dimensions(), (w, h), "mode {mode} target {w}x{h}");
            }
        }
    }

    #[test]
    fn test_fill_covers_target() {
        let src = solid(100, 50, 0);
        let out = scale_and_crop_to(&src, 50, 50, FitMode::Fill).unwrap();
        assert_eq!(out.dimensions(), (50, 50));
        assert!(out.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_fit_keeps_whole_source_and_pads() {
        let src = solid(100, 50, 0);
        let out = scale_and_crop_to(&src, 50, 50, FitMode::Fit).unwrap();
        assert_eq!(out.dimensions(), (50, 50));

        // 50x25 of content, the rest is white padding
        let black = out.data().iter().filter(|&&v| v == 0).count();
        assert_eq!(black, 50 * 25);
        assert!(row(&out, 0).iter().all(|&v| v == 255));
        assert!(row(&out, 25).iter().all(|&v| v == 0));
        assert!(row(&out, 49).iter().all(|&v| v == 255));
    }

    #[test]
    fn test_fit_anchor_top_puts_content_first() {
        let src = solid(100, 50, 0);
        let opts = ResizeOptions::new(FitMode::Fit)
            .with_anchor(Anchor::new(HAlign::Center, VAlign::Top));
        let out = scale_and_crop_with(&src, 50, 50, &opts).unwrap();
        assert!(row(&out, 0).iter().all(|&v| v == 0));
        assert!(row(&out, 24).iter().all(|&v| v == 0));
        assert!(row(&out, 25).iter().all(|&v| v == 255));
    }

    #[test]
    fn test_custom_pad_level() {
        let src = solid(100, 50, 0);
        let opts = ResizeOptions::new(FitMode::Fit).with_letterbox(Letterbox::Pad(7));
        let out = scale_and_crop_with(&src, 50, 50, &opts).unwrap();
        assert!(row(&out, 0).iter().all(|&v| v == 7));
    }

    #[test]
    fn test_reject_letterbox_errors_when_short() {
        let src = solid(100, 50, 0);
        let opts = ResizeOptions::new(FitMode::Fit).with_letterbox(Letterbox::Reject);
        let err = scale_and_crop_with(&src, 50, 50, &opts).unwrap_err();
        assert!(matches!(err, RasterError::InvalidDimension { .. }));

        let opts = opts.with_mode(FitMode::Fill);
        assert!(scale_and_crop_with(&src, 50, 50, &opts).is_ok());
    }

    #[test]
    fn test_fill_crop_follows_anchor() {
        let src = split_image(4, 2);
        let base = ResizeOptions::new(FitMode::Fill).with_filter(Filter::Nearest);

        let centered = scale_and_crop_with(&src, 2, 2, &base).unwrap();
        assert_eq!(row(&centered, 0), vec![0, 255]);

        let left = base.with_anchor(Anchor::new(HAlign::Left, VAlign::Center));
        let out = scale_and_crop_with(&src, 2, 2, &left).unwrap();
        assert_eq!(row(&out, 0), vec![0, 0]);

        let right = base.with_anchor(Anchor::new(HAlign::Right, VAlign::Center));
        let out = scale_and_crop_with(&src, 2, 2, &right).unwrap();
        assert_eq!(row(&out, 0), vec![255, 255]);
    }

    #[test]
    fn test_center_mode_pads_small_source() {
        let src = solid(2, 2, 0);
        let out = scale_and_crop_to(&src, 4, 4, FitMode::Center).unwrap();
        assert_eq!(row(&out, 0), vec![255, 255, 255, 255]);
        assert_eq!(row(&out, 1), vec![255, 0, 0, 255]);
        assert_eq!(row(&out, 2), vec![255, 0, 0, 255]);
        assert_eq!(row(&out, 3), vec![255, 255, 255, 255]);
    }

    #[test]
    fn test_center_mode_crops_large_source() {
        let src = split_image(8, 2);
        let out = scale_and_crop_to(&src, 2, 2, FitMode::Center).unwrap();
        assert_eq!(row(&out, 0), vec![0, 255]);
    }

    #[test]
    fn test_rgb_channels_are_preserved() {
        let src = PixelBuffer::filled(30, 20, Channels::Rgb, 90).unwrap();
        let out = scale_and_crop_to(&src, 10, 10, FitMode::Fill).unwrap();
        assert_eq!(out.channels(), Channels::Rgb);
        assert_eq!(out.data().len(), 10 * 10 * 3);
    }

    #[test]
    fn test_extreme_aspect_keeps_one_pixel() {
        let src = solid(1000, 1, 0);
        let out = scale_and_crop_to(&src, 10, 10, FitMode::Fit).unwrap();
        assert_eq!(out.dimensions(), (10, 10));
        assert_eq!(out.data().iter().filter(|&&v| v == 0).count(), 10);
    }

    #[test]
    fn test_zero_area_source_is_rejected() {
        let src = PixelBuffer::gray(0, 10, Vec::new()).unwrap();
        let err = scale_and_crop_to(&src, 10, 10, FitMode::Fill).unwrap_err();
        assert!(matches!(err, RasterError::InvalidDimension { width: 0, height: 10, .. }));
    }

    #[test]
    fn test_zero_target_is_rejected() {
        let src = solid(10, 10, 0);
        let err = scale_and_crop_to(&src, 0, 10, FitMode::Fit).unwrap_err();
        assert!(matches!(err, RasterError::InvalidDimension { width: 0, height: 10, .. }));
        assert!(scale_and_crop_to(&src, 10, 0, FitMode::Stretch).is_err());
    }

    #[test]
    fn test_source_is_not_mutated() {
        let src = split_image(6, 4);
        let before = src.clone();
        let _ = scale_and_crop_to(&src, 3, 3, FitMode::Fill).unwrap();
        assert_eq!(src, before);
    }

    #[test]
    fn test_span_clamps_crop_window() {
        let span = Span::new(-30.0, 100.0, 50);
        assert_eq!((span.size, span.crop, span.pad), (100, 30, 0));

        // Offset beyond the overflow is clamped
        let span = Span::new(-80.0, 100.0, 50);
        assert_eq!(span.crop, 50);

        let span = Span::new(12.5, 25.0, 50);
        assert_eq!((span.size, span.crop, span.pad), (25, 0, 13));
    }

    #[test]
    fn test_span_rounds_covering_length_to_nearest() {
        // Float noise just under the target still covers it
        let span = Span::new(0.0, 49.999_999_9, 50);
        assert_eq!(span.size, 50);
        assert!(!span.is_short());

        // Noise just over the target does not add a spare pixel
        let span = Span::new(-0.000_000_1, 50.000_000_1, 50);
        assert_eq!((span.size, span.crop), (50, 0));
    }
}
