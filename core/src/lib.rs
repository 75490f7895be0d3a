//! snapframe-core
//!
//! Streaming encoder/decoder for the Snappy framing format.
//! Pure Rust, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

pub mod compression;
pub mod telemetry;

// Stream layers
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{BlockCodec, CompressionError, SnappyCodec};
    pub use crate::stream::{
        compress_stream, decode_all, decompress_stream, encode_all, ApiConfig, FrameDecoder,
        FrameEncoder, FrameReader, FrameWriter, InputSource, OutputSink,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::StreamError;
    pub use crate::utils::masked_checksum;
}
