//! Frame decoder: framed Snappy stream in, original bytes out.
//!
//! Input chunks need not line up with frame boundaries. Whatever is left after
//! the last complete frame stays in `residual` until the next delivery.
//!
//! ```text
//! NotStarted ─► AwaitingIdentifier ─► Streaming ─► Closed
//!                    │                    │
//!                    └──────► Failed ◄────┘
//! ```

use std::time::Instant;

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace, warn};

use crate::compression::{default_codec, BlockCodec, SharedCodec};
use crate::constants::{chunk_ids, CHECKSUM_LEN, MAX_BLOCK_SIZE, STREAM_IDENTIFIER};
use crate::stream::framing::{next_frame, ChunkType, FrameError, FrameHeader};
use crate::stream::parallelism::{map_ordered, ParallelismProfile};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;
use crate::utils::{concat_blocks, masked_checksum};

#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Recompute and compare the masked CRC-32C of every decoded block.
    pub verify_checksums: bool,
    pub codec: SharedCodec,
    pub profile: ParallelismProfile,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            verify_checksums: false,
            codec: default_codec(),
            profile: ParallelismProfile::default(),
        }
    }
}

impl DecoderConfig {
    pub fn verified() -> Self {
        Self {
            verify_checksums: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// No input seen yet.
    NotStarted,
    /// Input seen, identifier frame not complete yet.
    AwaitingIdentifier,
    Streaming,
    Closed,
    Failed,
}

/// One data frame lifted out of the input buffer, ready for a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFrame {
    pub chunk_type: ChunkType,
    pub checksum_mask: u32,
    /// Block bytes as they sit on the wire (compressed or raw).
    pub block: Bytes,
}

/// Turn one data frame back into its original block.
pub fn decode_data_frame(
    codec: &dyn BlockCodec,
    frame: &DataFrame,
    verify_checksums: bool,
) -> Result<Bytes, StreamError> {
    let decoded = match frame.chunk_type {
        ChunkType::Compressed => codec
            .decompress_chunk(&frame.block)
            .map(Bytes::from)
            .map_err(StreamError::Decompression)?,
        _ => frame.block.clone(),
    };

    if decoded.len() > MAX_BLOCK_SIZE {
        return Err(FrameError::BlockTooLarge {
            len: decoded.len(),
            max: MAX_BLOCK_SIZE,
        }
        .into());
    }

    if verify_checksums {
        let actual = masked_checksum(&decoded);
        if actual != frame.checksum_mask {
            return Err(StreamError::ChecksumMismatch {
                expected: frame.checksum_mask,
                actual,
            });
        }
    }

    Ok(decoded)
}

pub struct FrameDecoder {
    config: DecoderConfig,
    state: DecoderState,
    identifier_found: bool,
    residual: BytesMut,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new(false)
    }
}

impl FrameDecoder {
    pub fn new(verify_checksums: bool) -> Self {
        Self::with_config(DecoderConfig {
            verify_checksums,
            ..DecoderConfig::default()
        })
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            state: DecoderState::NotStarted,
            identifier_found: false,
            residual: BytesMut::new(),
            counters: TelemetryCounters::default(),
            timer: TelemetryTimer::new(),
        }
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn identifier_found(&self) -> bool {
        self.identifier_found
    }

    pub fn verify_checksums(&self) -> bool {
        self.config.verify_checksums
    }

    /// Bytes buffered while waiting for the rest of a frame.
    pub fn residual_len(&self) -> usize {
        self.residual.len()
    }

    /// Decode one delivery of framed bytes.
    ///
    /// Returns the original bytes of every data frame completed by this
    /// delivery, in stream order. On error nothing from this delivery is
    /// returned and the decoder is closed for good.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<u8>, StreamError> {
        self.ensure_open()?;
        if chunk.is_empty() {
            return Ok(Vec::new());
        }

        self.residual.extend_from_slice(chunk);
        let data = self.residual.split().freeze();

        match self.process(data) {
            Ok(out) => Ok(out),
            Err(e) => Err(self.poison(e)),
        }
    }

    /// Signal end of input. Buffered bytes that never formed a frame mean the
    /// stream was cut short.
    pub fn finish(&mut self) -> Result<(), StreamError> {
        self.ensure_open()?;

        if !self.residual.is_empty() {
            let residual = self.residual.len();
            return Err(self.poison(StreamError::TruncatedStream { residual }));
        }

        self.state = DecoderState::Closed;
        self.timer.finish();
        debug!(
            frames = self.counters.frames_data(),
            bytes_raw = self.counters.bytes_raw,
            "decoder finished"
        );
        Ok(())
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }

    fn process(&mut self, data: Bytes) -> Result<Vec<u8>, StreamError> {
        if self.state == DecoderState::NotStarted {
            self.state = DecoderState::AwaitingIdentifier;
        }
        if !self.identifier_found && data[0] != chunk_ids::STREAM_IDENTIFIER {
            return Err(StreamError::MissingStreamIdentifier);
        }

        let start = Instant::now();
        let (frames, consumed) = self.extract_frames(&data)?;
        self.residual.extend_from_slice(&data[consumed..]);
        self.timer.add_stage_time(Stage::Parse, start.elapsed());

        if frames.is_empty() {
            trace!(residual = self.residual.len(), "no complete data frame yet");
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let codec = self.config.codec.as_ref();
        let verify = self.config.verify_checksums;
        let blocks = map_ordered(&frames, &self.config.profile, |frame| {
            decode_data_frame(codec, frame, verify)
        })?;
        self.timer.add_stage_time(Stage::Decompress, start.elapsed());

        for (frame, block) in frames.iter().zip(&blocks) {
            let frame_len = FrameHeader::LEN + CHECKSUM_LEN + frame.block.len();
            self.counters.add_data(frame.chunk_type, block.len(), frame_len, frame.block.len());
        }

        let out = concat_blocks(&blocks);
        debug!(
            frames = frames.len(),
            output = out.len(),
            residual = self.residual.len(),
            "decoded delivery"
        );
        Ok(out)
    }

    /// Walk every complete frame in `data`.
    ///
    /// Returns the data frames found and the number of bytes consumed.
    fn extract_frames(&mut self, data: &Bytes) -> Result<(Vec<DataFrame>, usize), StreamError> {
        let mut frames = Vec::new();
        let mut cursor = 0;

        while let Some(frame) = next_frame(&data[cursor..]) {
            let frame_len = frame.wire_len();

            match frame.header.chunk_type {
                ChunkType::StreamIdentifier => {
                    if data[cursor..cursor + frame_len] != STREAM_IDENTIFIER {
                        return Err(StreamError::InvalidStreamIdentifier);
                    }
                    self.identifier_found = true;
                    self.state = DecoderState::Streaming;
                    self.counters.add_identifier(frame_len);
                }
                chunk_type @ (ChunkType::Compressed | ChunkType::Uncompressed) => {
                    let (checksum_mask, block) = frame.data_parts()?;
                    let start = cursor + FrameHeader::LEN + CHECKSUM_LEN;
                    frames.push(DataFrame {
                        chunk_type,
                        checksum_mask,
                        block: data.slice(start..start + block.len()),
                    });
                }
                ChunkType::Unskippable(code) => {
                    return Err(StreamError::UnskippableFrame(code));
                }
                ChunkType::Padding | ChunkType::Skippable(_) => {
                    trace!(chunk_type = %frame.header.chunk_type, frame_len = frame_len, "skipped frame");
                    self.counters.add_skipped(frame_len);
                }
            }

            cursor += frame_len;
        }

        // An identifier header is checked as soon as it is complete, not once
        // its (possibly huge) payload has arrived.
        let rest = &data[cursor..];
        if rest.len() >= FrameHeader::LEN
            && rest[0] == chunk_ids::STREAM_IDENTIFIER
            && rest[..FrameHeader::LEN] != STREAM_IDENTIFIER[..FrameHeader::LEN]
        {
            return Err(StreamError::InvalidStreamIdentifier);
        }

        Ok((frames, cursor))
    }

    fn ensure_open(&self) -> Result<(), StreamError> {
        match self.state {
            DecoderState::Closed | DecoderState::Failed => Err(StreamError::Closed),
            _ => Ok(()),
        }
    }

    fn poison(&mut self, e: StreamError) -> StreamError {
        warn!(error = %e, "frame decoder failed");
        self.state = DecoderState::Failed;
        self.residual.clear();
        self.timer.finish();
        e
    }
}
