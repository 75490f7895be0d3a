//! utils.rs
//! Checksum helpers shared by the encoder and decoder.
//!
//! Both directions must use bit-identical arithmetic here, otherwise
//! verification on the decode side breaks.

use crate::constants::CHECKSUM_MASK_DELTA;

/// Raw CRC-32C (Castagnoli) of `data`.
#[inline]
pub fn compute_checksum(data: &[u8]) -> u32 {
    crc32c::crc32c(data)
}

/// Rotate right by 15 and add the fixed delta, wrapping at 32 bits.
#[inline]
pub const fn mask_checksum(crc: u32) -> u32 {
    ((crc >> 15) | (crc << 17)).wrapping_add(CHECKSUM_MASK_DELTA)
}

/// Masked CRC-32C as stored in data frames.
#[inline]
pub fn masked_checksum(data: &[u8]) -> u32 {
    mask_checksum(compute_checksum(data))
}

/// Flatten decoded blocks into a single contiguous buffer.
pub fn concat_blocks(blocks: &[impl AsRef<[u8]>]) -> Vec<u8> {
    let total = blocks.iter().map(|b| b.as_ref().len()).sum();
    let mut out = Vec::with_capacity(total);
    for block in blocks {
        out.extend_from_slice(block.as_ref());
    }
    out
}
