// src/container/bmx.rs

//! The versioned BMX container: a 9- or 12-byte header followed by packed
//! 1-bpp rows, LZSS-compressed when that makes the file smaller.

use super::header::{ContainerHeader, COMPRESSED_HEADER_SIZE};
use crate::encode::lzss::{self, LzssConfig};
use crate::raster::bitmap::Bitmap;
use crate::raster::bitpack;
use crate::utils::error::{BmxError, Result};
use log::debug;

/// Packs, compresses and frames `bitmap`.
///
/// The compressed header is used only when the compressed payload is
/// strictly smaller than the packed rows and its length fits the `u16` size
/// field; otherwise the rows are stored verbatim.
pub fn encode(bitmap: &Bitmap) -> Result<Vec<u8>> {
    let bits = bitpack::pack(bitmap);
    let compressed = lzss::compress(&bits.bytes, LzssConfig::BMX)?;

    let fits = u16::try_from(compressed.len()).ok();
    let (header, payload) = match fits {
        Some(size) if compressed.len() < bits.bytes.len() => (
            ContainerHeader::Compressed {
                width: bits.width,
                height: bits.height,
                compressed_size: size,
            },
            compressed,
        ),
        _ => (
            ContainerHeader::Uncompressed {
                width: bits.width,
                height: bits.height,
            },
            bits.bytes,
        ),
    };

    debug!(
        "BMX encode {}x{}: {} payload bytes, compressed={}",
        header.width(),
        header.height(),
        payload.len(),
        header.is_compressed()
    );

    let mut out = header.to_bytes();
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Parses a BMX file and expands it to a bitmap.
pub fn decode(data: &[u8]) -> Result<(Bitmap, ContainerHeader)> {
    let header = ContainerHeader::parse(data)?;

    let bits = match header {
        ContainerHeader::Uncompressed { .. } => {
            debug!("BMX file is uncompressed");
            data[header.size()..].to_vec()
        }
        ContainerHeader::Compressed {
            compressed_size, ..
        } => {
            debug!("BMX file is compressed ({} bytes)", compressed_size);
            let end = COMPRESSED_HEADER_SIZE + compressed_size as usize;
            if end > data.len() {
                return Err(BmxError::PayloadOverflow {
                    declared: compressed_size as usize,
                    available: data.len() - COMPRESSED_HEADER_SIZE,
                });
            }
            lzss::decompress(&data[COMPRESSED_HEADER_SIZE..end], LzssConfig::BMX)?
        }
    };

    let bitmap = bitpack::unpack(&bits, header.width(), header.height())?;
    Ok((bitmap, header))
}
