use std::io;

use thiserror::Error;

use crate::{compression::CompressionError, stream::framing::FrameError};

/// Unified stream error covering framing, checksum, codec and I/O failures.
/// - Every variant except `Io` is terminal for the encoder/decoder that raised it.
/// - `From<T>` impls enable `?` across the codec layers.
#[derive(Debug, Error)]
pub enum StreamError {
    /// First byte of the stream is not the stream identifier type.
    #[error("missing snappy stream identifier")]
    MissingStreamIdentifier,

    /// Identifier frame present but its bytes do not match the fixed magic.
    #[error("invalid stream identifier")]
    InvalidStreamIdentifier,

    /// Frame type in the reserved unskippable range.
    #[error("encountered unskippable frame: 0x{0:02x}")]
    UnskippableFrame(u8),

    /// Recomputed mask disagrees with the stored one.
    #[error("frame failed checksum: expected 0x{expected:08x}, got 0x{actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Input ended with an incomplete frame still buffered.
    #[error("failed to decompress stream: {residual} trailing bytes do not form a frame")]
    TruncatedStream { residual: usize },

    /// Block compressor failure, propagated verbatim.
    #[error("compression error: {0}")]
    Compression(#[source] CompressionError),

    /// Block decompressor failure, propagated verbatim.
    #[error("decompression error: {0}")]
    Decompression(#[source] CompressionError),

    /// Frame-level error (validation or parse).
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Transport error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoder/decoder already failed or finished.
    #[error("codec is closed")]
    Closed,
}

impl StreamError {
    /// True for errors caused by malformed or corrupted input.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            StreamError::MissingStreamIdentifier
                | StreamError::InvalidStreamIdentifier
                | StreamError::UnskippableFrame(_)
                | StreamError::ChecksumMismatch { .. }
                | StreamError::TruncatedStream { .. }
                | StreamError::Decompression(_)
                | StreamError::Frame(_)
        )
    }
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Io(inner) => inner,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
