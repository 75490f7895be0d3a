//! codecs/passthrough.rs
//! Pass-through codec.
//!
//! Never shrinks a block, so the encoder always falls back to
//! uncompressed-data frames when it is configured.
use crate::compression::types::{BlockCodec, CompressionError};

#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughCodec;

impl PassthroughCodec {
    pub fn new() -> Self {
        Self
    }
}

impl BlockCodec for PassthroughCodec {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn compress_chunk(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        Ok(input.to_vec())
    }

    fn decompress_chunk(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        Ok(input.to_vec())
    }
}
