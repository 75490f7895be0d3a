//! telemetry/mod.rs
//! Counters, stage timers, and immutable snapshots for the frame codec.
//!
//! Counters are plain fields owned by one encoder/decoder (single writer), so
//! nothing here needs atomics or locks. Snapshots are taken on demand.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
