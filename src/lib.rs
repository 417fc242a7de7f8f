//! # BMX Codec Library
//!
//! Reading and writing 1-bit-per-pixel bitmaps in the BMX and legacy BM
//! container formats, with a bounded-memory streaming LZSS codec.
//!
//! This library is organized into several modules:
//! - `utils`: Error handling and whole-file I/O
//! - `raster`: Gray bitmaps, 1-bpp bit packing and the image-file collaborator
//! - `encode`: The streaming LZSS encoder/decoder (sink/poll/finish)
//! - `container`: BMX headers, the legacy BM framing and frame-sequence metadata
//! - `convert`: File-level conversions and frame sequences

// Re-export commonly used types at the crate root
pub use utils::error::{BmxError, Result};

pub mod utils {
    pub mod error;
    pub mod fs;
}

pub mod raster {
    pub mod bitmap;
    pub mod bitpack;
    pub mod codec;

    pub use bitmap::{row_stride, Bitmap, PackedBits};
    pub use bitpack::{pack, unpack};
    pub use codec::{ImageCodec, ImageCrateCodec};
}

pub mod encode {
    pub mod lzss;
}

pub mod container;
pub mod convert;

// Public API exports
pub use container::{BitmapContainer, ContainerFormat, ContainerHeader, FrameSequenceMeta};
pub use convert::{bmx_to_png, load_bm, load_bmx, png_to_bmx, read_bm_meta, write_bmx, FrameSequence};
pub use encode::lzss::{compress, decompress, LzssConfig, LzssDecoder, LzssEncoder, StreamCodec};
pub use raster::{Bitmap, ImageCodec, ImageCrateCodec, PackedBits};

// Constants
pub const BMX_VERSION: &str = env!("CARGO_PKG_VERSION");
