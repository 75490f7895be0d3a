//! stream — Snappy framing format, streaming encode/decode.
//!
//! `framing` owns the wire grammar, `encoder`/`decoder` the per-delivery state
//! machines, `io` and `core` the transport-facing API.

pub mod framing;
pub mod parallelism;
pub mod encoder;
pub mod decoder;
pub mod io;
pub mod core;

pub use encoder::{EncoderConfig, EncoderState, FrameEncoder};
pub use decoder::{DecoderConfig, DecoderState, FrameDecoder};
pub use parallelism::{map_ordered, ParallelismProfile};

pub use io::{
    FrameReader,
    FrameWriter,
    InputSource,
    OutputSink,
};

pub use self::core::{
    compress_stream,
    decompress_stream,
    decode_all,
    encode_all,
    ApiConfig,
};
