use oxi85::codec::{LINE_WIDTH, TRAILER, decoder, encoder};
use proptest::prelude::*;

fn payload_lines(encoded: &[u8]) -> Vec<&[u8]> {
    let body = encoded.strip_suffix(TRAILER).expect("missing trailer");
    body.split(|&b| b == b'\n').collect()
}

proptest! {
    #[test]
    fn prop_encode_decode_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let encoded = encoder::encode_all(&data);
        let decoded = decoder::decode_all(&encoded).unwrap();
        prop_assert_eq!(decoded, data);
    }

    #[test]
    fn prop_lines_never_exceed_width(data in proptest::collection::vec(any::<u8>(), 100..2048)) {
        let encoded = encoder::encode_all(&data);
        for line in payload_lines(&encoded) {
            prop_assert!(line.len() <= LINE_WIDTH, "line of {} chars", line.len());
        }
    }

    #[test]
    fn prop_output_is_printable(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let encoded = encoder::encode_all(&data);
        prop_assert!(encoded.starts_with(b"<~"));
        prop_assert!(encoded.ends_with(b"~>"));
        let body = &encoded[2..encoded.len() - 2];
        prop_assert!(body.iter().all(|&b| b == b'\n' || (b'!'..=b'u').contains(&b) || b == b'z'));
    }

    #[test]
    fn prop_partial_group_length(
        words in proptest::collection::vec(1u32..=u32::MAX, 0..16),
        tail in proptest::collection::vec(any::<u8>(), 1..4)
    ) {
        // Nonzero full words never use the shorthand, so the size is exact.
        let mut data: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
        data.extend_from_slice(&tail);
        let encoded = encoder::encode_all(&data);
        let chars = encoded.iter().filter(|&&b| b != b'\n').count() - 4;
        prop_assert_eq!(chars, words.len() * 5 + tail.len() + 1);
    }

    #[test]
    fn prop_reformatted_whitespace_is_ignored(
        data in proptest::collection::vec(any::<u8>(), 0..512),
        step in 1usize..9
    ) {
        let encoded = encoder::encode_all(&data);
        let body = &encoded[2..encoded.len() - 2];
        let mut spaced = b"<~".to_vec();
        for (i, &b) in body.iter().filter(|&&b| b != b'\n').enumerate() {
            if i % step == 0 {
                spaced.extend_from_slice(b" \t\r\n");
            }
            spaced.push(b);
        }
        spaced.extend_from_slice(b"~>");
        prop_assert_eq!(decoder::decode_all(&spaced).unwrap(), data);
    }

    #[test]
    fn prop_decoder_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut framed = b"<~".to_vec();
        framed.extend_from_slice(&data);
        let _ = decoder::decode_all(&framed);
    }
}
