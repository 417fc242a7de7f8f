// src/encode/lzss/config.rs

//! Window and lookahead parameters shared by the LZSS encoder and decoder.

use crate::utils::error::{BmxError, Result};

/// Bit widths that size the sliding window and the longest back-reference.
///
/// The decoder must be built with the same values as the encoder; they are
/// not stored in the compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzssConfig {
    /// log2 of the window size in bytes.
    pub window_bits: u8,
    /// log2 of the longest match in bytes.
    pub lookahead_bits: u8,
}

impl LzssConfig {
    /// 256-byte window, 16-byte matches. Used by both BMX and BM files.
    pub const BMX: LzssConfig = LzssConfig {
        window_bits: 8,
        lookahead_bits: 4,
    };

    pub const MIN_WINDOW_BITS: u8 = 4;
    pub const MAX_WINDOW_BITS: u8 = 15;
    pub const MIN_LOOKAHEAD_BITS: u8 = 3;

    /// Builds a validated configuration.
    pub fn new(window_bits: u8, lookahead_bits: u8) -> Result<Self> {
        if !(Self::MIN_WINDOW_BITS..=Self::MAX_WINDOW_BITS).contains(&window_bits) {
            return Err(BmxError::InvalidArg(format!(
                "window_bits must be in {}..={}, got {}",
                Self::MIN_WINDOW_BITS,
                Self::MAX_WINDOW_BITS,
                window_bits
            )));
        }
        if lookahead_bits < Self::MIN_LOOKAHEAD_BITS || lookahead_bits >= window_bits {
            return Err(BmxError::InvalidArg(format!(
                "lookahead_bits must be in {}..{}, got {}",
                Self::MIN_LOOKAHEAD_BITS,
                window_bits,
                lookahead_bits
            )));
        }
        Ok(Self {
            window_bits,
            lookahead_bits,
        })
    }

    #[inline]
    pub fn window_size(&self) -> usize {
        1 << self.window_bits
    }

    #[inline]
    pub fn max_match(&self) -> usize {
        1 << self.lookahead_bits
    }

    /// Shortest match worth a back-reference: anything shorter costs more
    /// bits than the literals it replaces.
    #[inline]
    pub fn min_match(&self) -> usize {
        let backref_bits = 1 + self.window_bits as usize + self.lookahead_bits as usize;
        backref_bits / 8 + 1
    }
}

impl Default for LzssConfig {
    fn default() -> Self {
        Self::BMX
    }
}
