//! Owned 8-bit pixel buffers.
//!
//! [`PixelBuffer`] is the value passed between pipeline stages. It converts
//! to and from the `image` crate's buffer types so callers can decode with
//! whatever loader they already use.

use image::{DynamicImage, GrayImage, RgbImage};

use crate::{RasterError, Result};

/// Number of 8-bit channels per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    /// Single luminance channel (grayscale or binary).
    Gray,
    /// Red, green, blue.
    Rgb,
}

impl Channels {
    /// Samples per pixel.
    pub fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
        }
    }

    /// Map a raw channel count to a supported layout.
    pub fn from_count(count: u8) -> Result<Self> {
        match count {
            1 => Ok(Channels::Gray),
            3 => Ok(Channels::Rgb),
            other => Err(RasterError::UnsupportedChannels(other)),
        }
    }
}

/// Rectangular row-major grid of 8-bit samples.
///
/// `data.len() == width * height * channels` always holds. Zero-area
/// buffers are valid values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw sample data, checking its length against the geometry.
    pub fn new(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height, channels)?;
        if data.len() != expected {
            return Err(RasterError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Single-channel buffer from raw samples.
    pub fn gray(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, Channels::Gray, data)
    }

    /// Three-channel buffer from interleaved RGB samples.
    pub fn rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, Channels::Rgb, data)
    }

    /// Assemble a buffer whose length the caller already guarantees.
    pub(crate) fn from_parts(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * channels.count()
        );
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Buffer with every sample set to `value`.
    pub fn filled(width: u32, height: u32, channels: Channels, value: u8) -> Result<Self> {
        let len = byte_len(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![value; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Raw samples in row-major, channel-interleaved order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Number of pixels (not samples).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when the buffer has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Samples of the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} buffer",
            self.width,
            self.height
        );
        let n = self.channels.count();
        let start = (y as usize * self.width as usize + x as usize) * n;
        &self.data[start..start + n]
    }

    /// Convert into the `image` crate's dynamic representation.
    pub fn into_dynamic(self) -> Result<DynamicImage> {
        let (width, height) = self.dimensions();
        let actual = self.data.len();
        let image = match self.channels {
            Channels::Gray => {
                GrayImage::from_raw(width, height, self.data).map(DynamicImage::ImageLuma8)
            }
            Channels::Rgb => {
                RgbImage::from_raw(width, height, self.data).map(DynamicImage::ImageRgb8)
            }
        };
        image.ok_or(RasterError::BufferLength {
            expected: byte_len(width, height, self.channels)?,
            actual,
        })
    }

    /// Borrowing form of [`PixelBuffer::into_dynamic`].
    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        self.clone().into_dynamic()
    }
}

impl From<GrayImage> for PixelBuffer {
    fn from(img: GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: Channels::Gray,
            data: img.into_raw(),
        }
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: Channels::Rgb,
            data: img.into_raw(),
        }
    }
}

impl From<&DynamicImage> for PixelBuffer {
    /// Luma images stay single-channel; everything else becomes RGB.
    /// Alpha is discarded and deeper samples are reduced to 8 bits.
    fn from(img: &DynamicImage) -> Self {
        if img.color().has_color() {
            img.to_rgb8().into()
        } else {
            img.to_luma8().into()
        }
    }
}

impl From<DynamicImage> for PixelBuffer {
    fn from(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(gray) => gray.into(),
            DynamicImage::ImageRgb8(rgb) => rgb.into(),
            other => Self::from(&other),
        }
    }
}

fn byte_len(width: u32, height: u32, channels: Channels) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels.count()))
        .ok_or(RasterError::InvalidDimension {
            width,
            height,
            reason: "pixel buffer size overflows usize",
        })
}
