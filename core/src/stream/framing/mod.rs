//! Wire framing.
//!
//! Responsibilities:
//! - Define chunk types and frame headers
//! - Encode frames into the canonical byte layout
//! - Recognise complete frames in a byte buffer
//!
//! Non-responsibilities:
//! - Compression
//! - Checksums
//! - IO
//! - Parallelism

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    ChunkType,
    FrameError,
    FrameHeader,
    FrameView,
};
pub use encode::{
    encode_data_frame,
    encode_frame,
    encode_frame_header,
};
pub use decode::{
    next_frame,
    parse_frame_header,
};
