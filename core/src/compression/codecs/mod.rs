//! compression/codecs/mod.rs
//! Concrete `BlockCodec` implementations.

pub mod passthrough;
pub mod snappy;

pub use passthrough::*;
pub use snappy::*;
