// src/container/meta.rs

//! The `meta` record that describes a numbered sequence of BM frames.

use crate::utils::error::{BmxError, Result};
use bytemuck::{Pod, Zeroable};

/// File name of the metadata record inside a frame directory.
pub const META_FILE_NAME: &str = "meta";
pub const META_SIZE: usize = std::mem::size_of::<FrameSequenceMeta>();

/// Four native-endian `u32` fields, 16 bytes on disk.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct FrameSequenceMeta {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub frame_count: u32,
}

impl FrameSequenceMeta {
    /// Reads the record from the start of `data`; trailing bytes are ignored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < META_SIZE {
            return Err(BmxError::TruncatedHeader {
                needed: META_SIZE,
                actual: data.len(),
            });
        }
        Ok(bytemuck::pod_read_unaligned(&data[..META_SIZE]))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::bytes_of(self).to_vec()
    }

    /// Name of frame `index` within the sequence directory.
    pub fn frame_file_name(index: u32) -> String {
        format!("frame_{:02}.bm", index)
    }
}
