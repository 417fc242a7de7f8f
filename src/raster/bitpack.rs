// src/raster/bitpack.rs

//! Conversion between 8-bit gray rasters and packed 1-bpp rows.
//!
//! A set bit is a black pixel. Bit `x % 8` of the row byte `x / 8` holds
//! pixel `x`, and every row starts on a fresh byte.

use super::bitmap::{row_stride, Bitmap, PackedBits, BLACK_THRESHOLD};
use crate::utils::error::{BmxError, Result};
use bitvec::prelude::*;

const BLACK: u8 = 0;
const WHITE: u8 = 255;

/// Thresholds `bitmap` at mid-gray and packs it eight pixels per byte.
pub fn pack(bitmap: &Bitmap) -> PackedBits {
    let width = bitmap.width() as usize;
    let stride = row_stride(bitmap.width());
    let mut bytes = vec![0u8; stride * bitmap.height() as usize];

    if width > 0 {
        for (src, dst) in bitmap
            .pixels()
            .chunks_exact(width)
            .zip(bytes.chunks_exact_mut(stride))
        {
            let row = dst.view_bits_mut::<Lsb0>();
            for (x, &p) in src.iter().enumerate() {
                if p < BLACK_THRESHOLD {
                    row.set(x, true);
                }
            }
        }
    }

    PackedBits {
        width: bitmap.width(),
        height: bitmap.height(),
        bytes,
    }
}

/// Expands packed rows into a `width x height` bitmap.
///
/// Pixels whose byte lies past the end of `bits` come out white, so a short
/// or truncated buffer still yields a full-size image. Dimensions whose
/// pixel buffer cannot be allocated are rejected with
/// [`BmxError::DimensionsTooLarge`].
pub fn unpack(bits: &[u8], width: u32, height: u32) -> Result<Bitmap> {
    let too_large = || BmxError::DimensionsTooLarge { width, height };
    let count = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(too_large)?;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(count).map_err(|_| too_large())?;

    let stride_bits = row_stride(width) * 8;
    let view = bits.view_bits::<Lsb0>();

    for y in 0..height as usize {
        let row_start = y * stride_bits;
        for x in 0..width as usize {
            let pixel = match view.get(row_start + x) {
                Some(bit) if *bit => BLACK,
                _ => WHITE,
            };
            pixels.push(pixel);
        }
    }

    Ok(Bitmap::from_raw_parts(width, height, pixels))
}
