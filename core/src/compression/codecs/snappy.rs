//! codecs/snappy.rs
//! Snappy raw block codec (no framing, no checksums; those live in `stream`).
use snap::raw::{decompress_len, Decoder, Encoder};

use crate::compression::types::{BlockCodec, CompressionError};
use crate::constants::MAX_BLOCK_SIZE;

/// Snappy block codec backed by the `snap` crate's raw format.
///
/// `snap` encoders and decoders carry scratch tables, so a fresh one is built
/// per call instead of sharing one behind a lock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SnappyCodec;

impl SnappyCodec {
    pub fn new() -> Self {
        Self
    }
}

impl BlockCodec for SnappyCodec {
    fn name(&self) -> &'static str {
        "snappy"
    }

    fn compress_chunk(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        if input.len() > MAX_BLOCK_SIZE {
            return Err(CompressionError::BlockTooLarge {
                have: input.len(),
                max: MAX_BLOCK_SIZE,
            });
        }
        Encoder::new()
            .compress_vec(input)
            .map_err(|e| CompressionError::CodecProcessFailed {
                codec: self.name().into(),
                msg: e.to_string(),
            })
    }

    fn decompress_chunk(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        // Refuse before allocating for whatever length the preamble claims.
        let len = decompress_len(input).map_err(|e| CompressionError::CodecProcessFailed {
            codec: self.name().into(),
            msg: e.to_string(),
        })?;
        if len > MAX_BLOCK_SIZE {
            return Err(CompressionError::BlockTooLarge {
                have: len,
                max: MAX_BLOCK_SIZE,
            });
        }
        Decoder::new()
            .decompress_vec(input)
            .map_err(|e| CompressionError::CodecProcessFailed {
                codec: self.name().into(),
                msg: e.to_string(),
            })
    }
}
