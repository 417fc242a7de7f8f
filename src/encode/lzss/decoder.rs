// src/encode/lzss/decoder.rs

//! Streaming LZSS decoder, the mirror of [`super::LzssEncoder`].

use super::config::LzssConfig;
use super::{FinishStatus, PollStatus, StreamCodec};
use crate::utils::error::{BmxError, Result};

/// Position inside the token grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenState {
    TagBit,
    Literal,
    BackrefDistance,
    BackrefLength { distance: usize },
    CopyBackref { distance: usize, remaining: usize },
}

/// Streaming LZSS decompressor with a fixed-size input buffer and a
/// one-window output history.
pub struct LzssDecoder {
    config: LzssConfig,
    input: Vec<u8>,
    input_len: usize,
    input_index: usize,
    current_byte: u8,
    /// Unread bits left in `current_byte`.
    bits_left: u8,
    window: Vec<u8>,
    /// Total bytes emitted so far.
    emitted: u64,
    state: TokenState,
}

impl LzssDecoder {
    /// `input_capacity` is clamped to at least two bytes so a full buffer
    /// always holds one complete code.
    pub fn new(config: LzssConfig, input_capacity: usize) -> Self {
        Self {
            config,
            input: vec![0; input_capacity.max(2)],
            input_len: 0,
            input_index: 0,
            current_byte: 0,
            bits_left: 0,
            window: vec![0; config.window_size()],
            emitted: 0,
            state: TokenState::TagBit,
        }
    }

    #[inline]
    pub fn config(&self) -> LzssConfig {
        self.config
    }

    /// Total bytes produced so far.
    #[inline]
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn available_bits(&self) -> usize {
        self.bits_left as usize + 8 * (self.input_len - self.input_index)
    }

    /// Bits the next step of the grammar has to read, or `None` while a
    /// back-reference copy is still pending.
    fn bits_needed(&self) -> Option<usize> {
        match self.state {
            TokenState::TagBit => Some(1),
            TokenState::Literal => Some(8),
            TokenState::BackrefDistance => Some(self.config.window_bits as usize),
            TokenState::BackrefLength { .. } => Some(self.config.lookahead_bits as usize),
            TokenState::CopyBackref { .. } => None,
        }
    }

    /// Reads `count` bits MSB-first, or nothing if fewer are buffered.
    fn read_bits(&mut self, count: u8) -> Option<u16> {
        if self.available_bits() < count as usize {
            return None;
        }
        let mut value = 0u16;
        for _ in 0..count {
            if self.bits_left == 0 {
                self.current_byte = self.input[self.input_index];
                self.input_index += 1;
                self.bits_left = 8;
            }
            self.bits_left -= 1;
            value = (value << 1) | ((self.current_byte >> self.bits_left) & 1) as u16;
        }
        Some(value)
    }

    fn emit(&mut self, byte: u8, out: &mut [u8], written: &mut usize) {
        let mask = self.window.len() - 1;
        self.window[self.emitted as usize & mask] = byte;
        self.emitted += 1;
        out[*written] = byte;
        *written += 1;
    }

    /// Moves unread input to the front of the buffer.
    fn compact(&mut self) {
        if self.input_index > 0 {
            self.input.copy_within(self.input_index..self.input_len, 0);
            self.input_len -= self.input_index;
            self.input_index = 0;
        }
    }
}

impl StreamCodec for LzssDecoder {
    fn sink(&mut self, input: &[u8]) -> Result<usize> {
        self.compact();
        let room = self.input.len() - self.input_len;
        if room == 0 {
            return Err(BmxError::SinkRejected);
        }
        let n = room.min(input.len());
        self.input[self.input_len..self.input_len + n].copy_from_slice(&input[..n]);
        self.input_len += n;
        Ok(n)
    }

    fn poll(&mut self, out: &mut [u8]) -> Result<(usize, PollStatus)> {
        if out.is_empty() {
            return Err(BmxError::InvalidArg(
                "poll needs a non-empty output buffer".to_string(),
            ));
        }

        let mut written = 0;
        loop {
            if written == out.len() {
                return Ok((written, PollStatus::More));
            }

            match self.state {
                TokenState::TagBit => match self.read_bits(1) {
                    None => return Ok((written, PollStatus::Empty)),
                    Some(1) => self.state = TokenState::Literal,
                    Some(_) => self.state = TokenState::BackrefDistance,
                },
                TokenState::Literal => match self.read_bits(8) {
                    None => return Ok((written, PollStatus::Empty)),
                    Some(byte) => {
                        self.emit(byte as u8, out, &mut written);
                        self.state = TokenState::TagBit;
                    }
                },
                TokenState::BackrefDistance => match self.read_bits(self.config.window_bits) {
                    None => return Ok((written, PollStatus::Empty)),
                    Some(v) => {
                        self.state = TokenState::BackrefLength {
                            distance: v as usize + 1,
                        }
                    }
                },
                TokenState::BackrefLength { distance } => {
                    match self.read_bits(self.config.lookahead_bits) {
                        None => return Ok((written, PollStatus::Empty)),
                        Some(v) => {
                            if distance as u64 > self.emitted {
                                return Err(BmxError::DecodeProtocol(format!(
                                    "back-reference distance {} exceeds {} bytes emitted",
                                    distance, self.emitted
                                )));
                            }
                            self.state = TokenState::CopyBackref {
                                distance,
                                remaining: v as usize + 1,
                            };
                        }
                    }
                }
                TokenState::CopyBackref {
                    distance,
                    mut remaining,
                } => {
                    let mask = self.window.len() - 1;
                    while remaining > 0 && written < out.len() {
                        let byte = self.window[(self.emitted as usize).wrapping_sub(distance) & mask];
                        self.emit(byte, out, &mut written);
                        remaining -= 1;
                    }
                    self.state = if remaining == 0 {
                        TokenState::TagBit
                    } else {
                        TokenState::CopyBackref {
                            distance,
                            remaining,
                        }
                    };
                }
            }
        }
    }

    fn finish(&mut self) -> Result<FinishStatus> {
        match self.bits_needed() {
            Some(needed) if self.available_bits() < needed => Ok(FinishStatus::Done),
            _ => Ok(FinishStatus::More),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::run;
    use super::*;

    fn decode(data: &[u8]) -> Result<Vec<u8>> {
        let mut dec = LzssDecoder::new(LzssConfig::BMX, 256);
        run(&mut dec, data, data.len().max(1))
    }

    #[test]
    fn test_literal_with_padding() {
        assert_eq!(decode(&[0b1101_0101, 0b1000_0000]).unwrap(), vec![0xAB]);
    }

    #[test]
    fn test_overlapping_backref() {
        let out = decode(&[0b1000_0000, 0b0000_0000, 0b0011_1100]).unwrap();
        assert_eq!(out, vec![0u8; 17]);
    }

    #[test]
    fn test_backref_before_start_is_rejected() {
        // tag 0, distance 1, length 1 with nothing emitted yet
        let err = decode(&[0b0000_0000, 0b0000_0000]).unwrap_err();
        assert!(matches!(err, BmxError::DecodeProtocol(_)));
    }

    #[test]
    fn test_sink_rejects_when_full() {
        let mut dec = LzssDecoder::new(LzssConfig::BMX, 4);
        assert_eq!(dec.sink(&[0xFF; 10]).unwrap(), 4);
        assert!(matches!(dec.sink(&[0xFF]), Err(BmxError::SinkRejected)));

        let mut out = [0u8; 8];
        let (n, _) = dec.poll(&mut out).unwrap();
        assert!(n > 0);
        assert!(dec.sink(&[0xFF]).unwrap() > 0);
    }

    #[test]
    fn test_poll_resumes_long_copy() {
        let mut dec = LzssDecoder::new(LzssConfig::BMX, 16);
        dec.sink(&[0b1000_0000, 0b0000_0000, 0b0011_1100]).unwrap();
        let mut out = [0u8; 5];
        let mut total = 0;
        loop {
            let (n, status) = dec.poll(&mut out).unwrap();
            total += n;
            if status == PollStatus::Empty {
                break;
            }
        }
        assert_eq!(total, 17);
        assert_eq!(dec.emitted(), 17);
        assert_eq!(dec.finish().unwrap(), FinishStatus::Done);
    }

    #[test]
    fn test_zero_capacity_poll() {
        let mut dec = LzssDecoder::new(LzssConfig::BMX, 8);
        assert!(matches!(dec.poll(&mut []), Err(BmxError::InvalidArg(_))));
    }
}
