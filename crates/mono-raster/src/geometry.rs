//! Framing geometry for scale-and-crop.
//!
//! [`Rect::scale_to`] decides how large the resampled image is and where it
//! sits relative to the print area. No pixels are touched here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a source rectangle is scaled relative to a target rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Uniform scale so the whole source fits inside the target.
    Fit,
    /// Uniform scale so the source covers the target; overflow is cropped.
    #[default]
    #[serde(alias = "crop")]
    Fill,
    /// No scaling; the source is placed on the target as-is.
    Center,
    /// Independent per-axis scale to exactly the target size.
    Stretch,
}

impl FitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FitMode::Fit => "fit",
            FitMode::Fill => "fill",
            FitMode::Center => "center",
            FitMode::Stretch => "stretch",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fit mode '{0}' (expected fit, fill, center or stretch)")]
pub struct ParseFitModeError(String);

impl FromStr for FitMode {
    type Err = ParseFitModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" => Ok(FitMode::Fit),
            "fill" | "crop" => Ok(FitMode::Fill),
            "center" => Ok(FitMode::Center),
            "stretch" => Ok(FitMode::Stretch),
            _ => Err(ParseFitModeError(s.to_string())),
        }
    }
}

/// Horizontal alignment within the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical alignment within the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Where the scaled source sits relative to the target.
///
/// For overflowing axes this picks which part survives the crop, for short
/// axes it picks where the content lands on the padded canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Anchor {
    pub horizontal: HAlign,
    pub vertical: VAlign,
}

impl Anchor {
    pub const CENTER: Anchor = Anchor {
        horizontal: HAlign::Center,
        vertical: VAlign::Center,
    };

    pub fn new(horizontal: HAlign, vertical: VAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    fn factors(self) -> (f64, f64) {
        let h = match self.horizontal {
            HAlign::Left => 0.0,
            HAlign::Center => 0.5,
            HAlign::Right => 1.0,
        };
        let v = match self.vertical {
            VAlign::Top => 0.0,
            VAlign::Center => 0.5,
            VAlign::Bottom => 1.0,
        };
        (h, v)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin with the given pixel size.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, f64::from(width), f64::from(height))
    }

    /// Scale this rectangle into `target` under `mode`, then align it.
    ///
    /// Callers must ensure both rectangles have non-zero area; a zero-sized
    /// source yields infinite scale factors.
    pub fn scale_to(&self, target: &Rect, mode: FitMode, anchor: Anchor) -> Rect {
        let sx = target.width / self.width;
        let sy = target.height / self.height;

        let (width, height) = match mode {
            FitMode::Fit => {
                let s = sx.min(sy);
                (self.width * s, self.height * s)
            }
            FitMode::Fill => {
                let s = sx.max(sy);
                (self.width * s, self.height * s)
            }
            FitMode::Center => (self.width, self.height),
            FitMode::Stretch => (target.width, target.height),
        };

        let (fh, fv) = anchor.factors();
        Rect {
            x: target.x + (target.width - width) * fh,
            y: target.y + (target.height - height) * fv,
            width,
            height,
        }
    }
}
