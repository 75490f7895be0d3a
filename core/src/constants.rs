/// Stream identifier frame, always first on the wire.
/// `[ type 0xFF ][ len 6 (u24 LE) ][ "sNaPpY" ]`
pub const STREAM_IDENTIFIER: [u8; 10] = [
    0xff, 0x06, 0x00, 0x00, b's', b'N', b'a', b'P', b'p', b'Y',
];

/// Payload carried by the stream identifier frame.
pub const STREAM_MAGIC: [u8; 6] = *b"sNaPpY";

/// Maximum original bytes carried by one data frame.
pub const MAX_BLOCK_SIZE: usize = 64 * 1024; // 65536

/// Frame header: type (1) + payload length (3).
pub const FRAME_HEADER_LEN: usize = 4;

/// Masked checksum prefix of every data frame payload.
pub const CHECKSUM_LEN: usize = 4;

/// Largest payload length a u24 can express.
pub const MAX_FRAME_PAYLOAD_LEN: usize = 0x00ff_ffff;

/// Offset added after rotating the CRC-32C.
pub const CHECKSUM_MASK_DELTA: u32 = 0xa282_ead8;

/// Default chunk size for pulling from a reader (64 KiB).
pub const DEFAULT_READ_CHUNK_SIZE: usize = 64 * 1024;

/// Chunk type codes (mirrored in frame headers).
pub mod chunk_ids {
    pub const COMPRESSED_DATA: u8   = 0x00;
    pub const UNCOMPRESSED_DATA: u8 = 0x01;
    pub const PADDING: u8           = 0xfe;
    pub const STREAM_IDENTIFIER: u8 = 0xff;

    /// Reserved unskippable range: a decoder must understand these or fail.
    pub const UNSKIPPABLE_FIRST: u8 = 0x02;
    pub const UNSKIPPABLE_LAST: u8  = 0x7f;

    /// Reserved skippable range: discarded by the decoder.
    pub const SKIPPABLE_FIRST: u8   = 0x80;
    pub const SKIPPABLE_LAST: u8    = 0xfd;
}
