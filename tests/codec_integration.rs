use std::io::{self, Read};

use oxi85::codec::decoder::{self, Ascii85Decoder, DecodeError, StreamEnd};
use oxi85::codec::encoder::{self, Ascii85Encoder};
use oxi85::codec::{LINE_WIDTH, TRAILER};

#[test]
fn empty_input_encodes_to_delimiters() {
    assert_eq!(encoder::encode_all(b""), b"<~~>");
}

#[test]
fn four_zero_bytes_use_shorthand() {
    assert_eq!(encoder::encode_all(&[0, 0, 0, 0]), b"<~z~>");
    assert_eq!(decoder::decode_all(b"<~z~>").unwrap(), [0, 0, 0, 0]);
}

#[test]
fn man_reference_vector_both_ways() {
    assert_eq!(encoder::encode_all(&[0x4D, 0x61, 0x6E, 0x20]), b"<~9jqo^~>");
    assert_eq!(
        decoder::decode_all(b"<~9jqo^~>").unwrap(),
        [0x4D, 0x61, 0x6E, 0x20]
    );
}

#[test]
fn single_ff_byte_roundtrip() {
    let encoded = encoder::encode_all(&[0xFF]);
    assert_eq!(encoded.len(), 2 + 2 + 2);
    assert_eq!(decoder::decode_all(&encoded).unwrap(), [0xFF]);
}

#[test]
fn partial_groups_decode_to_k_minus_one_bytes() {
    let encoded = encoder::encode_all(b"Man ");
    let digits = &encoded[2..7];
    for k in 2..5 {
        let mut framed = b"<~".to_vec();
        framed.extend_from_slice(&digits[..k]);
        framed.extend_from_slice(b"~>");
        assert_eq!(decoder::decode_all(&framed).unwrap().len(), k - 1, "k = {k}");
    }
}

#[test]
fn long_input_lines_are_bounded() {
    let data: Vec<u8> = (0..1000u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
    let encoded = encoder::encode_all(&data);
    let body = encoded.strip_suffix(TRAILER).unwrap();
    let lines: Vec<&[u8]> = body.split(|&b| b == b'\n').collect();
    assert!(lines.len() > 1);
    assert!(lines.iter().all(|l| l.len() <= LINE_WIDTH));
    // Every line but the last is filled to the width.
    assert!(lines[..lines.len() - 1].iter().all(|l| l.len() == LINE_WIDTH));
    assert_eq!(decoder::decode_all(&encoded).unwrap(), data);
}

#[test]
fn malformed_digit_aborts_after_decoded_bytes() {
    let mut out = Vec::new();
    let err = decoder::decode_to(&b"<~9jqo^9jqo^{~>"[..], &mut out).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedDigit { byte: b'{', .. }));
    assert_eq!(out, b"Man Man ");
}

#[test]
fn shorthand_mid_group_aborts() {
    let err = decoder::decode_all(b"<~9jz~>").unwrap_err();
    assert!(matches!(err, DecodeError::UnexpectedShorthand { offset: 4 }));
}

#[test]
fn error_messages_name_the_problem() {
    let err = decoder::decode_all(b"<~{~>").unwrap_err();
    assert_eq!(err.to_string(), "malformed digit 0x7b at offset 2");
    let err = decoder::decode_all(b"<~9z").unwrap_err();
    assert_eq!(err.to_string(), "'z' inside a partial group at offset 3");
}

/// Reader that hands out one byte per call.
struct Trickle<'a>(&'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.split_first() {
            Some((&b, rest)) if !buf.is_empty() => {
                buf[0] = b;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[test]
fn streaming_sources_match_in_memory() {
    let data: Vec<u8> = (0..=255u8).chain([0; 12]).chain(*b"tail").collect();
    let expected = encoder::encode_all(&data);

    let mut encoded = Vec::new();
    let stats = encoder::encode_to(Trickle(&data), &mut encoded).unwrap();
    assert_eq!(encoded, expected);
    assert_eq!(stats.zero_groups, 3);

    let mut decoded = Vec::new();
    let mut dec = Ascii85Decoder::new(Trickle(&encoded));
    let stats = dec.decode_to(&mut decoded).unwrap();
    assert_eq!(decoded, data);
    assert_eq!(stats.end, StreamEnd::Trailer);
    assert_eq!(stats.input_bytes, encoded.len() as u64);
}

#[test]
fn encoder_progress_counters() {
    let mut out = Vec::new();
    let mut enc = Ascii85Encoder::new(&mut out);
    enc.write_data(b"Man").unwrap();
    assert_eq!(enc.bytes_in(), 3);
    // Only the header is written while the group is incomplete.
    assert_eq!(enc.bytes_out(), 2);
    enc.write_data(b" ").unwrap();
    assert_eq!(enc.bytes_out(), 7);
    let (_, stats) = enc.finish().unwrap();
    assert_eq!(stats.output_bytes, 9);
    assert_eq!(out, b"<~9jqo^~>");
}

#[test]
fn missing_trailer_is_benign() {
    let mut out = Vec::new();
    let stats = decoder::decode_to(&b"<~9jqo^9`"[..], &mut out).unwrap();
    assert_eq!(out, b"Man M");
    assert_eq!(stats.end, StreamEnd::EndOfInput);
}
