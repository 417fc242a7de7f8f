// src/raster/bitmap.rs

//! 8-bit grayscale rasters and their packed 1-bpp form.

use crate::utils::error::{BmxError, Result};
use image::GrayImage;

/// Gray values below this are treated as black.
pub const BLACK_THRESHOLD: u8 = 128;

/// Bytes per packed row: `ceil(width / 8)`.
#[inline]
pub fn row_stride(width: u32) -> usize {
    (width as usize).div_ceil(8)
}

/// A single-channel raster with one byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Wraps `pixels`, which must hold exactly `width * height` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(BmxError::InvalidArg(format!(
                "{}x{} bitmap needs {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Caller guarantees `pixels.len() == width * height`.
    pub(crate) fn from_raw_parts(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A bitmap where every pixel has the value `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Gray value at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// The two-level image a 1-bpp container stores for this bitmap.
    pub fn thresholded(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: self
                .pixels
                .iter()
                .map(|&p| if p < BLACK_THRESHOLD { 0 } else { 255 })
                .collect(),
        }
    }
}

impl From<GrayImage> for Bitmap {
    fn from(img: GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }
}

impl TryFrom<Bitmap> for GrayImage {
    type Error = BmxError;

    fn try_from(bitmap: Bitmap) -> Result<Self> {
        let (w, h) = (bitmap.width, bitmap.height);
        GrayImage::from_raw(w, h, bitmap.pixels).ok_or_else(|| {
            BmxError::InvalidArg(format!("pixel buffer does not fit a {}x{} image", w, h))
        })
    }
}

/// Row-major 1-bpp pixels, LSB-first inside each byte, rows byte-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBits {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl PackedBits {
    #[inline]
    pub fn stride(&self) -> usize {
        row_stride(self.width)
    }

    /// Expands back to one byte per pixel.
    pub fn unpack(&self) -> Result<Bitmap> {
        super::bitpack::unpack(&self.bytes, self.width, self.height)
    }
}
