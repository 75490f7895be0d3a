//! compression/types.rs
//! Codec trait and compression error type.
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: String, msg: String },

    #[error("block too large: {have} > {max}")]
    BlockTooLarge { have: usize, max: usize },
}

/// Stateless block compressor/decompressor.
///
/// Implementations are shared across worker threads within one delivery, so
/// they take `&self` and must be `Send + Sync`.
pub trait BlockCodec: Send + Sync + fmt::Debug {
    /// Short codec name used in error messages and logs.
    fn name(&self) -> &'static str;

    /// Compress a single block.
    fn compress_chunk(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError>;

    /// Decompress a single block produced by `compress_chunk`.
    fn decompress_chunk(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError>;
}

/// Shared handle to a codec, cheap to clone into configs.
pub type SharedCodec = Arc<dyn BlockCodec>;

/// The codec used when no other is configured.
pub fn default_codec() -> SharedCodec {
    Arc::new(crate::compression::SnappyCodec::new())
}
