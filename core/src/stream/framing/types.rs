use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use crate::constants::{chunk_ids, CHECKSUM_LEN, FRAME_HEADER_LEN};

/// Frame type, classified from the one-byte type code.
///
/// Every `u8` maps to exactly one variant, so decoding a type code never fails;
/// what the decoder does with `Unskippable` is its own policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkType {
    StreamIdentifier,
    Compressed,
    Uncompressed,
    Padding,
    Skippable(u8),
    Unskippable(u8),
}

impl ChunkType {
    #[inline(always)]
    pub const fn from_u8(v: u8) -> Self {
        match v {
            chunk_ids::STREAM_IDENTIFIER => ChunkType::StreamIdentifier,
            chunk_ids::COMPRESSED_DATA => ChunkType::Compressed,
            chunk_ids::UNCOMPRESSED_DATA => ChunkType::Uncompressed,
            chunk_ids::PADDING => ChunkType::Padding,
            chunk_ids::UNSKIPPABLE_FIRST..=chunk_ids::UNSKIPPABLE_LAST => ChunkType::Unskippable(v),
            chunk_ids::SKIPPABLE_FIRST..=chunk_ids::SKIPPABLE_LAST => ChunkType::Skippable(v),
        }
    }

    /// Canonical wire encoding (1 byte).
    #[inline(always)]
    pub const fn to_u8(self) -> u8 {
        match self {
            ChunkType::StreamIdentifier => chunk_ids::STREAM_IDENTIFIER,
            ChunkType::Compressed => chunk_ids::COMPRESSED_DATA,
            ChunkType::Uncompressed => chunk_ids::UNCOMPRESSED_DATA,
            ChunkType::Padding => chunk_ids::PADDING,
            ChunkType::Skippable(v) | ChunkType::Unskippable(v) => v,
        }
    }

    /// Compressed or uncompressed data frame.
    #[inline]
    pub const fn is_data(self) -> bool {
        matches!(self, ChunkType::Compressed | ChunkType::Uncompressed)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkType::StreamIdentifier => f.write_str("stream-identifier"),
            ChunkType::Compressed => f.write_str("compressed"),
            ChunkType::Uncompressed => f.write_str("uncompressed"),
            ChunkType::Padding => f.write_str("padding"),
            ChunkType::Skippable(v) => write!(f, "skippable(0x{:02x})", v),
            ChunkType::Unskippable(v) => write!(f, "unskippable(0x{:02x})", v),
        }
    }
}

/// Canonical frame header (fixed size)
///
/// `payload_len` is a u24 on the wire, little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub chunk_type: ChunkType,
    /// Bytes following the header: checksum + block for data frames.
    pub payload_len: u32,
}

impl FrameHeader {
    pub const LEN: usize = FRAME_HEADER_LEN;

    pub fn new(chunk_type: ChunkType, payload_len: u32) -> Self {
        Self { chunk_type, payload_len }
    }

    /// Header plus payload.
    #[inline]
    pub fn frame_len(&self) -> usize {
        Self::LEN + self.payload_len as usize
    }
}

/// Borrowed view of one complete frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub header: FrameHeader,
    /// Exactly `header.payload_len` bytes.
    pub payload: &'a [u8],
}

impl<'a> FrameView<'a> {
    /// Total wire length of this frame.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.header.frame_len()
    }

    /// Split a data frame payload into `(checksum_mask, block)`.
    pub fn data_parts(&self) -> Result<(u32, &'a [u8]), FrameError> {
        if self.payload.len() < CHECKSUM_LEN {
            return Err(FrameError::PayloadTooShort {
                chunk_type: self.header.chunk_type.to_u8(),
                len: self.payload.len(),
            });
        }
        let (mask, block) = self.payload.split_at(CHECKSUM_LEN);
        Ok((LittleEndian::read_u32(mask), block))
    }
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("truncated frame header")]
    Truncated,

    #[error("frame type 0x{chunk_type:02x} payload too short for checksum: {len} bytes")]
    PayloadTooShort { chunk_type: u8, len: usize },

    #[error("frame payload too large: {len} > {max}")]
    PayloadTooLarge { len: usize, max: usize },

    /// Data frame carrying (or decoding to) more than one block.
    #[error("frame block too large: {len} > {max}")]
    BlockTooLarge { len: usize, max: usize },
}
