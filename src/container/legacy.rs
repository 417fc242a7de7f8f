// src/container/legacy.rs

//! The older BM framing: one flag byte, then either raw packed rows or a
//! length-prefixed LZSS payload. BM files carry no dimensions.
//!
//! Compressed layout:
//!
//! ```text
//! offset 0     flag = 0x01
//! offset 1..3  payload length, big-endian u16
//! offset 3     reserved
//! offset 4..   payload
//! ```

use crate::encode::lzss::{self, LzssConfig};
use crate::raster::bitmap::Bitmap;
use crate::raster::bitpack;
use crate::utils::error::{BmxError, Result};
use byteorder::{BigEndian, ByteOrder};
use log::debug;

pub const FLAG_RAW: u8 = 0x00;
pub const FLAG_COMPRESSED: u8 = 0x01;
/// Offset of the compressed payload; byte 3 is skipped.
pub const PAYLOAD_OFFSET: usize = 4;
/// Smallest well-formed compressed file.
const MIN_COMPRESSED_LEN: usize = 5;

/// Returns the packed rows stored in a BM file.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let (&flag, rest) = data.split_first().ok_or(BmxError::EmptyInput)?;

    match flag {
        FLAG_RAW => {
            debug!("Uncompressed BM data ({} bytes)", rest.len());
            Ok(rest.to_vec())
        }
        FLAG_COMPRESSED => {
            if data.len() < MIN_COMPRESSED_LEN {
                return Err(BmxError::TruncatedHeader {
                    needed: MIN_COMPRESSED_LEN,
                    actual: data.len(),
                });
            }
            let declared = BigEndian::read_u16(&data[1..3]) as usize;
            let available = data.len() - PAYLOAD_OFFSET;
            if declared > available {
                return Err(BmxError::PayloadOverflow {
                    declared,
                    available,
                });
            }
            debug!("Compressed BM data ({} bytes)", declared);
            lzss::decompress(
                &data[PAYLOAD_OFFSET..PAYLOAD_OFFSET + declared],
                LzssConfig::BMX,
            )
        }
        other => Err(BmxError::UnknownFormatFlag(other)),
    }
}

/// Decodes a BM file using dimensions supplied by the caller.
pub fn decode_bitmap(data: &[u8], width: u32, height: u32) -> Result<Bitmap> {
    let bits = decode(data)?;
    bitpack::unpack(&bits, width, height)
}

/// Frames packed rows as a BM file, compressing when it saves space.
pub fn encode(bits: &[u8]) -> Result<Vec<u8>> {
    let compressed = lzss::compress(bits, LzssConfig::BMX)?;

    match u16::try_from(compressed.len()) {
        Ok(len) if compressed.len() < bits.len() => {
            let mut out = vec![FLAG_COMPRESSED, 0, 0, 0];
            BigEndian::write_u16(&mut out[1..3], len);
            out.extend_from_slice(&compressed);
            Ok(out)
        }
        _ => {
            let mut out = Vec::with_capacity(bits.len() + 1);
            out.push(FLAG_RAW);
            out.extend_from_slice(bits);
            Ok(out)
        }
    }
}

/// Packs and frames `bitmap` as a BM file.
pub fn encode_bitmap(bitmap: &Bitmap) -> Result<Vec<u8>> {
    encode(&bitpack::pack(bitmap).bytes)
}
