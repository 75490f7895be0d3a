// Wire grammar: headers, chunk type classification and frame recognition.

// * `encode_frame_header` / `parse_frame_header`
// * `ChunkType::from_u8` / `to_u8`
// * `next_frame` on partial buffers
// * `FrameView::data_parts`

#[cfg(test)]
mod tests {
    use snapframe_core::constants::{chunk_ids, STREAM_IDENTIFIER, STREAM_MAGIC};
    use snapframe_core::stream::framing::{
        encode_data_frame, encode_frame, encode_frame_header, next_frame, parse_frame_header,
        ChunkType, FrameError, FrameHeader,
    };

// # ✅ 1. Header layout

    #[test]
    fn header_is_type_then_u24_le() {
        let header = FrameHeader::new(ChunkType::Uncompressed, 0x0a_0b0c);
        let wire = encode_frame_header(&header);
        assert_eq!(wire, [0x01, 0x0c, 0x0b, 0x0a]);
        assert_eq!(parse_frame_header(&wire).unwrap(), header);
    }

    #[test]
    fn identifier_constant_parses_as_identifier() {
        let header = parse_frame_header(&STREAM_IDENTIFIER).unwrap();
        assert_eq!(header.chunk_type, ChunkType::StreamIdentifier);
        assert_eq!(header.payload_len, 6);
        assert_eq!(&STREAM_IDENTIFIER[4..], &STREAM_MAGIC);
    }

    #[test]
    fn truncated_header_is_rejected() {
        let buf = [0u8; FrameHeader::LEN - 1];
        assert!(matches!(parse_frame_header(&buf), Err(FrameError::Truncated)));
    }

// # ✅ 2. Chunk type classification

    #[test]
    fn every_type_code_classifies_and_roundtrips() {
        for code in 0..=u8::MAX {
            let ty = ChunkType::from_u8(code);
            assert_eq!(ty.to_u8(), code);

            let expected = match code {
                0x00 => ChunkType::Compressed,
                0x01 => ChunkType::Uncompressed,
                0xfe => ChunkType::Padding,
                0xff => ChunkType::StreamIdentifier,
                0x02..=0x7f => ChunkType::Unskippable(code),
                _ => ChunkType::Skippable(code),
            };
            assert_eq!(ty, expected, "code 0x{:02x}", code);
        }
    }

    #[test]
    fn only_data_types_are_data() {
        assert!(ChunkType::Compressed.is_data());
        assert!(ChunkType::Uncompressed.is_data());
        assert!(!ChunkType::Padding.is_data());
        assert!(!ChunkType::from_u8(chunk_ids::SKIPPABLE_FIRST).is_data());
    }

// # ✅ 3. Frame recognition

    #[test]
    fn next_frame_waits_for_full_payload() {
        let mut wire = Vec::new();
        encode_frame(ChunkType::Padding, &[0u8; 10], &mut wire).unwrap();
        assert_eq!(wire.len(), 14);

        for cut in 0..wire.len() {
            assert!(next_frame(&wire[..cut]).is_none(), "cut at {}", cut);
        }

        let frame = next_frame(&wire).unwrap();
        assert_eq!(frame.header.chunk_type, ChunkType::Padding);
        assert_eq!(frame.payload.len(), 10);
        assert_eq!(frame.wire_len(), 14);
    }

    #[test]
    fn next_frame_ignores_trailing_bytes() {
        let mut wire = Vec::new();
        encode_frame(ChunkType::Skippable(0x80), b"abc", &mut wire).unwrap();
        wire.extend_from_slice(&[0xff, 0x06]);

        let frame = next_frame(&wire).unwrap();
        assert_eq!(frame.payload, b"abc");
        assert_eq!(frame.wire_len(), 7);
    }

    #[test]
    fn zero_length_frame_is_complete_at_four_bytes() {
        let wire = [0xfe, 0x00, 0x00, 0x00];
        let frame = next_frame(&wire).unwrap();
        assert!(frame.payload.is_empty());
    }

// # ✅ 4. Data frame payloads

    #[test]
    fn data_frame_layout() {
        let mut wire = Vec::new();
        encode_data_frame(ChunkType::Uncompressed, 0x1122_3344, b"xyz", &mut wire).unwrap();
        assert_eq!(wire, [0x01, 0x07, 0x00, 0x00, 0x44, 0x33, 0x22, 0x11, b'x', b'y', b'z']);

        let frame = next_frame(&wire).unwrap();
        let (mask, block) = frame.data_parts().unwrap();
        assert_eq!(mask, 0x1122_3344);
        assert_eq!(block, b"xyz");
    }

    #[test]
    fn data_payload_shorter_than_checksum_is_rejected() {
        let wire = [0x00, 0x02, 0x00, 0x00, 0xaa, 0xbb];
        let frame = next_frame(&wire).unwrap();
        assert!(matches!(
            frame.data_parts(),
            Err(FrameError::PayloadTooShort { chunk_type: 0x00, len: 2 })
        ));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = vec![0u8; 0x0100_0000];
        let mut wire = Vec::new();
        assert!(matches!(
            encode_frame(ChunkType::Padding, &payload, &mut wire),
            Err(FrameError::PayloadTooLarge { .. })
        ));
        assert!(wire.is_empty());
    }
}
