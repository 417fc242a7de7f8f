// src/container/mod.rs

//! 1-bpp bitmap containers.
//!
//! Two on-disk generations exist: the versioned BMX format with its own
//! dimensions, and the legacy BM framing whose dimensions come from
//! elsewhere (a [`meta::FrameSequenceMeta`] record or the caller).
//! [`BitmapContainer`] puts both behind one encode/decode entry point.

pub mod bmx;
pub mod header;
pub mod legacy;
pub mod meta;

pub use header::ContainerHeader;
pub use meta::FrameSequenceMeta;

use crate::raster::bitmap::Bitmap;
use crate::utils::error::Result;
use std::path::Path;

/// On-disk generation of a bitmap file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// `.bm`: flag byte + optional length-prefixed payload.
    Legacy,
    /// `.bmx`: 9/12-byte header with dimensions.
    Versioned,
}

impl ContainerFormat {
    /// Picks the format from the file extension. BM files have no magic to
    /// sniff, so anything that is not `.bm` is treated as BMX.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bm") => Self::Legacy,
            _ => Self::Versioned,
        }
    }
}

/// A bitmap codec for one container generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapContainer {
    /// Legacy BM with dimensions supplied out of band.
    Legacy { width: u32, height: u32 },
    Versioned,
}

impl BitmapContainer {
    /// Chooses the container for `path`; `dims` is only used for BM files.
    pub fn for_path(path: &Path, dims: (u32, u32)) -> Self {
        match ContainerFormat::from_path(path) {
            ContainerFormat::Legacy => Self::Legacy {
                width: dims.0,
                height: dims.1,
            },
            ContainerFormat::Versioned => Self::Versioned,
        }
    }

    #[inline]
    pub fn format(&self) -> ContainerFormat {
        match self {
            Self::Legacy { .. } => ContainerFormat::Legacy,
            Self::Versioned => ContainerFormat::Versioned,
        }
    }

    pub fn decode(&self, data: &[u8]) -> Result<Bitmap> {
        match *self {
            Self::Legacy { width, height } => legacy::decode_bitmap(data, width, height),
            Self::Versioned => bmx::decode(data).map(|(bitmap, _)| bitmap),
        }
    }

    /// Legacy encoding drops the dimensions; the caller must keep them.
    pub fn encode(&self, bitmap: &Bitmap) -> Result<Vec<u8>> {
        match self {
            Self::Legacy { .. } => legacy::encode_bitmap(bitmap),
            Self::Versioned => bmx::encode(bitmap),
        }
    }
}
