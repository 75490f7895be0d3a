use byteorder::{ByteOrder, LittleEndian};

use crate::stream::framing::types::{ChunkType, FrameError, FrameHeader, FrameView};

#[inline]
pub fn parse_frame_header(wire: &[u8]) -> Result<FrameHeader, FrameError> {
    if wire.len() < FrameHeader::LEN {
        return Err(FrameError::Truncated);
    }

    Ok(FrameHeader {
        chunk_type: ChunkType::from_u8(wire[0]),
        payload_len: LittleEndian::read_u24(&wire[1..4]),
    })
}

/// Return the leading frame of `wire` if it is complete.
///
/// `None` means more bytes are needed: either the header itself is cut, or
/// fewer than `4 + payload_len` bytes are present.
#[inline]
pub fn next_frame(wire: &[u8]) -> Option<FrameView<'_>> {
    let header = parse_frame_header(wire).ok()?;
    let end = header.frame_len();
    if wire.len() < end {
        return None;
    }

    Some(FrameView {
        header,
        payload: &wire[FrameHeader::LEN..end],
    })
}
