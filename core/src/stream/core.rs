//! Whole-stream entry points built on the encoder/decoder state machines.

use std::io::{Read, Write};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    compression::default_codec,
    constants::DEFAULT_READ_CHUNK_SIZE,
    stream::{
        decoder::{DecoderConfig, FrameDecoder},
        encoder::{EncoderConfig, FrameEncoder},
        io::{open_input, open_output, read_exact_or_eof, FrameWriter, InputSource, OutputSink},
        parallelism::ParallelismProfile,
    },
    telemetry::TelemetrySnapshot,
    types::StreamError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Verify the masked CRC of every block when decompressing.
    pub verify_checksums: bool,
    /// Size of each delivery pulled from the input.
    pub read_chunk_size: usize,
    pub profile: ParallelismProfile,
    /// Copy a `Memory` sink's contents into the returned snapshot.
    pub with_buf: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            verify_checksums: true,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            profile: ParallelismProfile::default(),
            with_buf: false,
        }
    }
}

impl ApiConfig {
    pub fn with_buf_enabled() -> Self {
        Self {
            with_buf: true,
            ..Self::default()
        }
    }

    fn chunk_size(&self) -> usize {
        self.read_chunk_size.max(1)
    }
}

fn attach_buffer(
    snapshot: &mut TelemetrySnapshot,
    maybe_buf: Option<Arc<Mutex<Vec<u8>>>>,
    config: &ApiConfig,
) {
    if !config.with_buf {
        return;
    }
    if let Some(buf) = maybe_buf {
        let data = buf.lock().unwrap_or_else(|p| p.into_inner()).clone();
        snapshot.attach_output(data);
    }
}

/// Compress everything `input` yields into a framed stream on `output`.
pub fn compress_stream(
    input: InputSource,
    output: OutputSink,
    config: &ApiConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    let mut reader = open_input(input)?;
    let (writer, maybe_buf) = open_output(output)?;

    let mut frames = FrameWriter::with_config(
        writer,
        EncoderConfig {
            codec: default_codec(),
            profile: config.profile.clone(),
        },
    );

    loop {
        let chunk = read_exact_or_eof(&mut reader, config.chunk_size())?;
        if chunk.is_empty() {
            break;
        }
        frames.write_frames(&chunk)?;
    }
    frames.finish()?;

    let mut snapshot = frames.telemetry();
    info!(
        bytes_raw = snapshot.counters.bytes_raw,
        bytes_wire = snapshot.counters.bytes_wire,
        ratio = snapshot.compression_ratio,
        "stream compressed"
    );
    attach_buffer(&mut snapshot, maybe_buf, config);
    Ok(snapshot)
}

/// Decompress a framed stream from `input` onto `output`.
pub fn decompress_stream(
    input: InputSource,
    output: OutputSink,
    config: &ApiConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    let mut reader = open_input(input)?;
    let (mut writer, maybe_buf) = open_output(output)?;

    let mut decoder = FrameDecoder::with_config(DecoderConfig {
        verify_checksums: config.verify_checksums,
        codec: default_codec(),
        profile: config.profile.clone(),
    });

    pump(&mut reader, &mut writer, &mut decoder, config.chunk_size())?;
    decoder.finish()?;
    writer.flush()?;

    let mut snapshot = decoder.telemetry();
    info!(
        bytes_raw = snapshot.counters.bytes_raw,
        frames = snapshot.counters.frames_data(),
        "stream decompressed"
    );
    attach_buffer(&mut snapshot, maybe_buf, config);
    Ok(snapshot)
}

fn pump(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    decoder: &mut FrameDecoder,
    chunk_size: usize,
) -> Result<(), StreamError> {
    loop {
        let chunk = read_exact_or_eof(reader, chunk_size)?;
        if chunk.is_empty() {
            return Ok(());
        }
        let out = decoder.feed(&chunk)?;
        writer.write_all(&out)?;
    }
}

/// Frame `data` as one complete stream.
pub fn encode_all(data: &[u8]) -> Result<Vec<u8>, StreamError> {
    let mut encoder = FrameEncoder::new();
    let mut out = encoder.feed(data)?;
    out.extend(encoder.finish()?);
    Ok(out)
}

/// Decode one complete framed stream.
pub fn decode_all(data: &[u8], verify_checksums: bool) -> Result<Vec<u8>, StreamError> {
    let mut decoder = FrameDecoder::new(verify_checksums);
    let out = decoder.feed(data)?;
    decoder.finish()?;
    Ok(out)
}
