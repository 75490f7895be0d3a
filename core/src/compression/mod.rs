//! compression/mod.rs
//! Block compression seam for the frame codec.
//!
//! The frame codec never compresses anything itself. It hands one block at a
//! time to a `BlockCodec` and wraps whatever comes back into a frame.
//! - Each block is compressed independently (no cross-block state), so blocks
//!   can be handed to workers in any order.
//! - `SnappyCodec` is the default and the only codec the wire format names.

pub mod types;
pub mod codecs;

pub use types::*;
pub use codecs::{PassthroughCodec, SnappyCodec};
