//! Frame encoder: raw bytes in, framed Snappy stream out.
//!
//! Per delivery:
//! ```text
//! chunk ──split(64 KiB)──► blocks ──map_ordered(compress)──► frames (input order)
//! ```
//! The stream identifier is emitted once, ahead of the first frame.

use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::compression::{default_codec, BlockCodec, CompressionError, SharedCodec};
use crate::constants::{MAX_BLOCK_SIZE, STREAM_IDENTIFIER};
use crate::stream::framing::{encode_data_frame, ChunkType};
use crate::stream::parallelism::{map_ordered, ParallelismProfile};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;
use crate::utils::masked_checksum;

#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub codec: SharedCodec,
    pub profile: ParallelismProfile,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            codec: default_codec(),
            profile: ParallelismProfile::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    /// Stream identifier not yet emitted.
    Fresh,
    Streaming,
    Closed,
    Failed,
}

/// Pick the frame representation for one block.
///
/// Compression has to save more than 12.5% of the block, otherwise the raw
/// block is shipped as an uncompressed-data frame.
#[inline]
pub fn select_chunk_type(raw_len: usize, compressed_len: usize) -> ChunkType {
    if compressed_len >= raw_len - raw_len / 8 {
        ChunkType::Uncompressed
    } else {
        ChunkType::Compressed
    }
}

/// One block after compression and format selection.
struct EncodedBlock {
    chunk_type: ChunkType,
    checksum_mask: u32,
    /// `None` when the raw block is sent as is.
    compressed: Option<Vec<u8>>,
}

fn encode_block(codec: &dyn BlockCodec, block: &[u8]) -> Result<EncodedBlock, CompressionError> {
    let compressed = codec.compress_chunk(block)?;
    let chunk_type = select_chunk_type(block.len(), compressed.len());

    Ok(EncodedBlock {
        chunk_type,
        // Always over the original block, never the compressed bytes.
        checksum_mask: masked_checksum(block),
        compressed: match chunk_type {
            ChunkType::Compressed => Some(compressed),
            _ => None,
        },
    })
}

pub struct FrameEncoder {
    config: EncoderConfig,
    state: EncoderState,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self::with_config(EncoderConfig::default())
    }

    pub fn with_config(config: EncoderConfig) -> Self {
        Self {
            config,
            state: EncoderState::Fresh,
            counters: TelemetryCounters::default(),
            timer: TelemetryTimer::new(),
        }
    }

    pub fn state(&self) -> EncoderState {
        self.state
    }

    /// Encode one delivery of input bytes.
    ///
    /// Returns the frames for every block of `chunk`, preceded by the stream
    /// identifier on the first call. On error nothing from this delivery is
    /// returned and the encoder is closed for good.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<u8>, StreamError> {
        self.ensure_open()?;

        let blocks: Vec<&[u8]> = chunk.chunks(MAX_BLOCK_SIZE).collect();

        let start = Instant::now();
        let codec = self.config.codec.as_ref();
        let encoded = map_ordered(&blocks, &self.config.profile, |block| encode_block(codec, block));
        self.timer.add_stage_time(Stage::Compress, start.elapsed());

        let encoded = match encoded {
            Ok(encoded) => encoded,
            Err(e) => return Err(self.poison(StreamError::Compression(e))),
        };

        let start = Instant::now();
        let mut out = Vec::with_capacity(chunk.len() + blocks.len() * 8 + STREAM_IDENTIFIER.len());
        self.take_identifier(&mut out);

        for (block, enc) in blocks.iter().copied().zip(&encoded) {
            let payload = enc.compressed.as_deref().unwrap_or(block);
            let before = out.len();
            if let Err(e) = encode_data_frame(enc.chunk_type, enc.checksum_mask, payload, &mut out) {
                return Err(self.poison(e.into()));
            }
            trace!(
                chunk_type = %enc.chunk_type,
                raw_len = block.len(),
                payload_len = payload.len(),
                "encoded frame"
            );
            self.counters.add_data(enc.chunk_type, block.len(), out.len() - before, payload.len());
        }
        self.timer.add_stage_time(Stage::Split, start.elapsed());

        debug!(input = chunk.len(), frames = blocks.len(), output = out.len(), "encoded delivery");
        Ok(out)
    }

    /// Signal end of input.
    ///
    /// Returns the stream identifier if no delivery produced it yet (so an
    /// empty stream still encodes to a valid one). No trailer is written.
    pub fn finish(&mut self) -> Result<Vec<u8>, StreamError> {
        self.ensure_open()?;

        let mut out = Vec::new();
        self.take_identifier(&mut out);
        self.state = EncoderState::Closed;
        self.timer.finish();

        debug!(
            frames = self.counters.frames_data(),
            bytes_raw = self.counters.bytes_raw,
            bytes_wire = self.counters.bytes_wire,
            "encoder finished"
        );
        Ok(out)
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }

    fn take_identifier(&mut self, out: &mut Vec<u8>) {
        if self.state == EncoderState::Fresh {
            out.extend_from_slice(&STREAM_IDENTIFIER);
            self.counters.add_identifier(STREAM_IDENTIFIER.len());
            self.state = EncoderState::Streaming;
        }
    }

    fn ensure_open(&self) -> Result<(), StreamError> {
        match self.state {
            EncoderState::Closed | EncoderState::Failed => Err(StreamError::Closed),
            _ => Ok(()),
        }
    }

    fn poison(&mut self, e: StreamError) -> StreamError {
        warn!(error = %e, "frame encoder failed");
        self.state = EncoderState::Failed;
        self.timer.finish();
        e
    }
}
