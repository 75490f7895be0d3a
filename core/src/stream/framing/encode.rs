use byteorder::{ByteOrder, LittleEndian};

use crate::constants::{CHECKSUM_LEN, MAX_FRAME_PAYLOAD_LEN};
use crate::stream::framing::types::{ChunkType, FrameError, FrameHeader};

/// Encode a frame header into its 4-byte wire form.
///
/// Layout:
///
/// ```text
/// [ chunk_type  (1) ]
/// [ payload_len (3, LE) ]
/// ```
#[inline]
pub fn encode_frame_header(header: &FrameHeader) -> [u8; FrameHeader::LEN] {
    let mut buf = [0u8; FrameHeader::LEN];
    buf[0] = header.chunk_type.to_u8();
    LittleEndian::write_u24(&mut buf[1..4], header.payload_len);
    buf
}

/// Append an arbitrary frame (header + payload) to `out`.
pub fn encode_frame(chunk_type: ChunkType, payload: &[u8], out: &mut Vec<u8>) -> Result<(), FrameError> {
    if payload.len() > MAX_FRAME_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge {
            len: payload.len(),
            max: MAX_FRAME_PAYLOAD_LEN,
        });
    }

    let header = FrameHeader::new(chunk_type, payload.len() as u32);
    out.reserve(header.frame_len());
    out.extend_from_slice(&encode_frame_header(&header));
    out.extend_from_slice(payload);
    Ok(())
}

/// Append a data frame to `out`.
///
/// Layout:
///
/// ```text
/// [ chunk_type    (1) ]
/// [ payload_len   (3, LE) ]  = 4 + block.len()
/// [ checksum_mask (4, LE) ]
/// [ block         (N) ]
/// ```
pub fn encode_data_frame(
    chunk_type: ChunkType,
    checksum_mask: u32,
    block: &[u8],
    out: &mut Vec<u8>,
) -> Result<(), FrameError> {
    let payload_len = CHECKSUM_LEN + block.len();
    if payload_len > MAX_FRAME_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge {
            len: payload_len,
            max: MAX_FRAME_PAYLOAD_LEN,
        });
    }

    let header = FrameHeader::new(chunk_type, payload_len as u32);
    let mut mask = [0u8; CHECKSUM_LEN];
    LittleEndian::write_u32(&mut mask, checksum_mask);

    out.reserve(header.frame_len());
    out.extend_from_slice(&encode_frame_header(&header));
    out.extend_from_slice(&mask);
    out.extend_from_slice(block);
    Ok(())
}
