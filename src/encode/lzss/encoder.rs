// src/encode/lzss/encoder.rs

//! Bounded-memory LZSS encoder driven through sink/poll/finish.
//!
//! Memory use is fixed at construction: a buffer of two windows (history
//! followed by pending input) and a staging queue that never holds more
//! than one token's worth of finished bytes.

use super::config::LzssConfig;
use super::{FinishStatus, PollStatus, StreamCodec, StreamState};
use crate::utils::error::{BmxError, Result};
use log::trace;
use std::collections::VecDeque;

const LITERAL_TAG: u16 = 1;
const BACKREF_TAG: u16 = 0;

/// Packs variable-width codes MSB-first into whole bytes.
#[derive(Debug, Default)]
struct BitWriter {
    acc: u8,
    count: u8,
    ready: VecDeque<u8>,
}

impl BitWriter {
    fn push(&mut self, value: u16, bits: u8) {
        for i in (0..bits).rev() {
            let bit = ((value >> i) & 1) as u8;
            self.acc = (self.acc << 1) | bit;
            self.count += 1;
            if self.count == 8 {
                self.ready.push_back(self.acc);
                self.acc = 0;
                self.count = 0;
            }
        }
    }

    /// Pads the partial byte with zero bits.
    fn flush_partial(&mut self) {
        if self.count > 0 {
            self.ready.push_back(self.acc << (8 - self.count));
            self.acc = 0;
            self.count = 0;
        }
    }

    fn drain_into(&mut self, out: &mut [u8], written: &mut usize) {
        while *written < out.len() {
            match self.ready.pop_front() {
                Some(b) => {
                    out[*written] = b;
                    *written += 1;
                }
                None => break,
            }
        }
    }
}

/// Streaming LZSS compressor.
pub struct LzssEncoder {
    config: LzssConfig,
    /// `[history | input]`, each half one window long.
    buffer: Vec<u8>,
    /// Valid history bytes immediately before the input half.
    history_len: usize,
    /// Bytes sunk into the input half.
    input_len: usize,
    /// Next input position to encode.
    scan: usize,
    state: StreamState,
    bits: BitWriter,
}

impl LzssEncoder {
    pub fn new(config: LzssConfig) -> Self {
        Self {
            config,
            buffer: vec![0; 2 * config.window_size()],
            history_len: 0,
            input_len: 0,
            scan: 0,
            state: StreamState::Idle,
            bits: BitWriter::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> LzssConfig {
        self.config
    }

    #[inline]
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Last input position the current state allows encoding from.
    fn scan_limit(&self) -> usize {
        match self.state {
            StreamState::Finishing => self.input_len,
            // Hold back one full lookahead so matches are never cut short
            // by the end of a block.
            _ => self.input_len.saturating_sub(self.config.max_match()),
        }
    }

    /// Finds the longest earlier occurrence of the bytes at `scan`.
    /// Returns `(distance, length)`; length 0 means no match.
    fn find_longest_match(&self) -> (usize, usize) {
        let window = self.config.window_size();
        let pos = window + self.scan;
        let max_len = self.config.max_match().min(self.input_len - self.scan);
        let max_dist = window.min(self.history_len + self.scan);

        let mut best = (0, 0);
        for dist in 1..=max_dist {
            let start = pos - dist;
            let len = (0..max_len)
                .take_while(|&k| self.buffer[start + k] == self.buffer[pos + k])
                .count();
            if len > best.1 {
                best = (dist, len);
                if len == max_len {
                    break;
                }
            }
        }
        best
    }

    /// Encodes one token at `scan` into the bit writer.
    fn emit_token(&mut self) {
        let (dist, len) = self.find_longest_match();
        if len >= self.config.min_match() {
            trace!("lzss backref dist={} len={}", dist, len);
            self.bits.push(BACKREF_TAG, 1);
            self.bits.push((dist - 1) as u16, self.config.window_bits);
            self.bits.push((len - 1) as u16, self.config.lookahead_bits);
            self.scan += len;
        } else {
            let byte = self.buffer[self.config.window_size() + self.scan];
            self.bits.push(LITERAL_TAG, 1);
            self.bits.push(byte as u16, 8);
            self.scan += 1;
        }
    }

    /// Slides encoded input into the history half and moves the unencoded
    /// tail to the front of the input half.
    fn shift_window(&mut self) {
        let window = self.config.window_size();
        self.buffer.copy_within(self.scan..window + self.input_len, 0);
        self.history_len = window.min(self.history_len + self.scan);
        self.input_len -= self.scan;
        self.scan = 0;
        self.state = if self.input_len == 0 {
            StreamState::Idle
        } else {
            StreamState::Sinking
        };
    }
}

impl StreamCodec for LzssEncoder {
    fn sink(&mut self, input: &[u8]) -> Result<usize> {
        match self.state {
            StreamState::Idle | StreamState::Sinking => {}
            StreamState::Draining => return Err(BmxError::SinkRejected),
            StreamState::Finishing | StreamState::Done => {
                return Err(BmxError::InvalidOperation(
                    "cannot sink into an encoder after finish".to_string(),
                ));
            }
        }

        let window = self.config.window_size();
        let n = (window - self.input_len).min(input.len());
        let start = window + self.input_len;
        self.buffer[start..start + n].copy_from_slice(&input[..n]);
        self.input_len += n;

        if self.input_len == window {
            self.state = StreamState::Draining;
        } else if self.input_len > 0 {
            self.state = StreamState::Sinking;
        }
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
            self.bits.drain_into(out, &mut written);
            if written == out.len() {
                return Ok((written, PollStatus::More));
            }

            match self.state {
                StreamState::Draining => {
                    if self.scan < self.scan_limit() {
                        self.emit_token();
                    } else {
                        self.shift_window();
                    }
                }
                StreamState::Finishing => {
                    if self.scan < self.input_len {
                        self.emit_token();
                    } else {
                        self.bits.flush_partial();
                        self.state = StreamState::Done;
                    }
                }
                StreamState::Idle | StreamState::Sinking | StreamState::Done => {
                    return Ok((written, PollStatus::Empty));
                }
            }
        }
    }

    fn finish(&mut self) -> Result<FinishStatus> {
        match self.state {
            StreamState::Idle | StreamState::Sinking | StreamState::Draining => {
                self.state = StreamState::Finishing;
                Ok(FinishStatus::More)
            }
            StreamState::Finishing => Ok(FinishStatus::More),
            StreamState::Done if self.bits.ready.is_empty() => Ok(FinishStatus::Done),
            StreamState::Done => Ok(FinishStatus::More),
        }
    }
}
