//! telemetry/counters.rs
//! Mutable counters used while encoding/decoding.
//!
//! Converted into an immutable `TelemetrySnapshot` on request.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::stream::framing::ChunkType;

/// Deterministic counters collected during stream processing
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub frames_identifier: u64,
    pub frames_compressed: u64,
    pub frames_uncompressed: u64,
    /// Padding and skippable frames discarded by the decoder.
    pub frames_skipped: u64,
    /// Original (uncompressed) bytes.
    pub bytes_raw: u64,
    /// Framed bytes on the wire, headers included.
    pub bytes_wire: u64,
    /// Headers, checksums and discarded frames.
    pub bytes_overhead: u64,
}

impl TelemetryCounters {
    /// Record one stream identifier frame.
    pub fn add_identifier(&mut self, frame_len: usize) {
        self.frames_identifier += 1;
        self.bytes_wire += frame_len as u64;
        self.bytes_overhead += frame_len as u64;
    }

    /// Record one data frame.
    ///
    /// - `raw_len`: original block length
    /// - `frame_len`: total wire length of the frame
    /// - `block_len`: bytes of block data carried (compressed or raw)
    pub fn add_data(&mut self, chunk_type: ChunkType, raw_len: usize, frame_len: usize, block_len: usize) {
        match chunk_type {
            ChunkType::Compressed => self.frames_compressed += 1,
            _ => self.frames_uncompressed += 1,
        }
        self.bytes_raw += raw_len as u64;
        self.bytes_wire += frame_len as u64;
        self.bytes_overhead += (frame_len - block_len) as u64;
    }

    /// Record a padding or skippable frame that was discarded.
    pub fn add_skipped(&mut self, frame_len: usize) {
        self.frames_skipped += 1;
        self.bytes_wire += frame_len as u64;
        self.bytes_overhead += frame_len as u64;
    }

    pub fn frames_data(&self) -> u64 {
        self.frames_compressed + self.frames_uncompressed
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.frames_identifier += other.frames_identifier;
        self.frames_compressed += other.frames_compressed;
        self.frames_uncompressed += other.frames_uncompressed;
        self.frames_skipped += other.frames_skipped;

        self.bytes_raw += other.bytes_raw;
        self.bytes_wire += other.bytes_wire;
        self.bytes_overhead += other.bytes_overhead;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
