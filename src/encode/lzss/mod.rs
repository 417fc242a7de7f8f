// src/encode/lzss/mod.rs

//! Heatshrink-style LZSS compression with bounded memory.
//!
//! Both halves of the codec follow the same three-call protocol:
//! - `sink` feeds input; it returns how much was taken, or
//!   `BmxError::SinkRejected` when the caller must `poll` first.
//! - `poll` drains produced bytes into a caller buffer.
//! - `finish` marks end of input; call it alternately with `poll` until it
//!   reports `FinishStatus::Done`.
//!
//! [`compress`] and [`decompress`] run that loop over whole buffers.

pub mod config;
pub mod decoder;
pub mod encoder;

pub use config::LzssConfig;
pub use decoder::LzssDecoder;
pub use encoder::LzssEncoder;

use crate::utils::error::{BmxError, Result};
use log::debug;

/// Largest slice handed to `sink` in one call.
pub const SINK_CHUNK: usize = 256;
/// Size of the scratch buffer used when polling.
pub const POLL_CHUNK: usize = 256;
/// Input buffer capacity of decoders built by [`decompress`].
pub const DECODER_INPUT_BUFFER: usize = 256;

/// Phase of a streaming codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Nothing buffered.
    Idle,
    /// Accepting more input.
    Sinking,
    /// Input buffer full; only `poll` makes progress.
    Draining,
    /// End of input announced; remaining data is being flushed.
    Finishing,
    /// Everything has been emitted.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// Nothing more to emit until more input is sunk.
    Empty,
    /// The output buffer filled up; poll again.
    More,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishStatus {
    Done,
    /// Poll, then call `finish` again.
    More,
}

/// The sink/poll/finish protocol shared by [`LzssEncoder`] and [`LzssDecoder`].
pub trait StreamCodec {
    fn sink(&mut self, input: &[u8]) -> Result<usize>;
    fn poll(&mut self, out: &mut [u8]) -> Result<(usize, PollStatus)>;
    fn finish(&mut self) -> Result<FinishStatus>;
}

/// Polls `codec` until it reports `Empty`, appending everything to `output`.
fn drain<C: StreamCodec>(codec: &mut C, scratch: &mut [u8], output: &mut Vec<u8>) -> Result<()> {
    loop {
        let (n, status) = codec.poll(scratch)?;
        output.extend_from_slice(&scratch[..n]);
        if status == PollStatus::Empty {
            return Ok(());
        }
    }
}

/// Pushes all of `input` through `codec` and returns its complete output.
pub fn run<C: StreamCodec>(codec: &mut C, input: &[u8], sink_chunk: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len());
    let mut scratch = [0u8; POLL_CHUNK];

    let mut offset = 0;
    while offset < input.len() {
        let end = (offset + sink_chunk).min(input.len());
        match codec.sink(&input[offset..end]) {
            Ok(n) => offset += n,
            Err(BmxError::SinkRejected) => {}
            Err(e) => return Err(e),
        }
        drain(codec, &mut scratch, &mut output)?;
    }

    loop {
        let status = codec.finish()?;
        drain(codec, &mut scratch, &mut output)?;
        if status == FinishStatus::Done {
            break;
        }
    }
    Ok(output)
}

/// Compresses `input` in one call.
pub fn compress(input: &[u8], config: LzssConfig) -> Result<Vec<u8>> {
    let mut encoder = LzssEncoder::new(config);
    let output = run(&mut encoder, input, SINK_CHUNK)?;
    debug!("lzss: compressed {} -> {} bytes", input.len(), output.len());
    Ok(output)
}

/// Decompresses `input` in one call.
pub fn decompress(input: &[u8], config: LzssConfig) -> Result<Vec<u8>> {
    let mut decoder = LzssDecoder::new(config, DECODER_INPUT_BUFFER);
    let output = run(&mut decoder, input, input.len().max(1))?;
    debug!("lzss: decompressed {} -> {} bytes", input.len(), output.len());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(data: &[u8]) {
        let packed = compress(data, LzssConfig::BMX).unwrap();
        let unpacked = decompress(&packed, LzssConfig::BMX).unwrap();
        assert_eq!(unpacked, data);
    }

    #[test]
    fn test_round_trip_edges() {
        round_trip(&[]);
        round_trip(&[42]);
        round_trip(&[1, 2]);
        round_trip(&[9; 16]);
        round_trip(&[9; 17]);
    }

    #[test]
    fn test_round_trip_text() {
        let text = b"According to all known laws of aviation, there is no way a bee \
                     should be able to fly. Its wings are too small to get its fat \
                     little body off the ground. The bee, of course, flies anyway \
                     because bees don't care what humans think is impossible.";
        let data: Vec<u8> = text.iter().cycle().take(5000).copied().collect();
        let packed = compress(&data, LzssConfig::BMX).unwrap();
        assert!(packed.len() < data.len() / 2);
        assert_eq!(decompress(&packed, LzssConfig::BMX).unwrap(), data);
    }

    #[test]
    fn test_round_trip_other_config() {
        let cfg = LzssConfig::new(10, 5).unwrap();
        let data: Vec<u8> = (0..4000u32).map(|i| ((i * 7) % 251) as u8 ^ (i / 300) as u8).collect();
        let packed = compress(&data, cfg).unwrap();
        assert_eq!(decompress(&packed, cfg).unwrap(), data);
    }

    #[test]
    fn test_tiny_chunks() {
        let data: Vec<u8> = (0..2000u32).map(|i| (i % 13) as u8).collect();
        let mut encoder = LzssEncoder::new(LzssConfig::BMX);
        let packed = run(&mut encoder, &data, 3).unwrap();
        assert_eq!(packed, compress(&data, LzssConfig::BMX).unwrap());

        let mut decoder = LzssDecoder::new(LzssConfig::BMX, 5);
        let unpacked = run(&mut decoder, &packed, 2).unwrap();
        assert_eq!(unpacked, data);
    }
}
