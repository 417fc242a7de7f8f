// src/container/header.rs

//! Fixed-layout BMX headers.
//!
//! Both variants start with `width: u32, height: u32, is_compressed: u8` in
//! native byte order, so the discriminant sits at offset 8 in either case.
//! The compressed variant adds a reserved byte and a `u16` payload size.

use crate::utils::error::{BmxError, Result};
use bytemuck::{Pod, Zeroable};

/// Offset of the `is_compressed` byte shared by both layouts.
pub const DISCRIMINANT_OFFSET: usize = 8;
pub const UNCOMPRESSED_HEADER_SIZE: usize = std::mem::size_of::<RawUncompressedHeader>();
pub const COMPRESSED_HEADER_SIZE: usize = std::mem::size_of::<RawCompressedHeader>();

#[repr(C, packed)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct RawUncompressedHeader {
    width: u32,
    height: u32,
    is_compressed: u8,
}

#[repr(C, packed)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct RawCompressedHeader {
    width: u32,
    height: u32,
    is_compressed: u8,
    reserved: u8,
    compressed_size: u16,
}

/// Decoded BMX header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerHeader {
    Uncompressed {
        width: u32,
        height: u32,
    },
    Compressed {
        width: u32,
        height: u32,
        compressed_size: u16,
    },
}

impl ContainerHeader {
    #[inline]
    pub fn width(&self) -> u32 {
        match *self {
            Self::Uncompressed { width, .. } | Self::Compressed { width, .. } => width,
        }
    }

    #[inline]
    pub fn height(&self) -> u32 {
        match *self {
            Self::Uncompressed { height, .. } | Self::Compressed { height, .. } => height,
        }
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Compressed { .. })
    }

    /// Bytes this header occupies on disk.
    #[inline]
    pub fn size(&self) -> usize {
        match self {
            Self::Uncompressed { .. } => UNCOMPRESSED_HEADER_SIZE,
            Self::Compressed { .. } => COMPRESSED_HEADER_SIZE,
        }
    }

    /// Serializes the header; the reserved byte is always zero.
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            Self::Uncompressed { width, height } => {
                let raw = RawUncompressedHeader {
                    width,
                    height,
                    is_compressed: 0,
                };
                bytemuck::bytes_of(&raw).to_vec()
            }
            Self::Compressed {
                width,
                height,
                compressed_size,
            } => {
                let raw = RawCompressedHeader {
                    width,
                    height,
                    is_compressed: 1,
                    reserved: 0,
                    compressed_size,
                };
                bytemuck::bytes_of(&raw).to_vec()
            }
        }
    }

    /// Reads the discriminant, then the matching fixed-size header.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < UNCOMPRESSED_HEADER_SIZE {
            return Err(BmxError::TruncatedHeader {
                needed: UNCOMPRESSED_HEADER_SIZE,
                actual: data.len(),
            });
        }

        match data[DISCRIMINANT_OFFSET] {
            0 => {
                let raw: RawUncompressedHeader =
                    bytemuck::pod_read_unaligned(&data[..UNCOMPRESSED_HEADER_SIZE]);
                Ok(Self::Uncompressed {
                    width: raw.width,
                    height: raw.height,
                })
            }
            1 => {
                if data.len() < COMPRESSED_HEADER_SIZE {
                    return Err(BmxError::TruncatedHeader {
                        needed: COMPRESSED_HEADER_SIZE,
                        actual: data.len(),
                    });
                }
                let raw: RawCompressedHeader =
                    bytemuck::pod_read_unaligned(&data[..COMPRESSED_HEADER_SIZE]);
                Ok(Self::Compressed {
                    width: raw.width,
                    height: raw.height,
                    compressed_size: raw.compressed_size,
                })
            }
            flag => Err(BmxError::UnknownFormatFlag(flag)),
        }
    }
}
