// File-level I/O helpers for Ascii85 encoding/decoding.
//
// Provides `encode_file()` and `decode_file()` convenience functions that
// wrap the streaming codec with buffered readers and writers.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use crate::codec::decoder::{Ascii85Decoder, DecodeError, DecodeStats};
use crate::codec::encoder::{self, EncodeError, EncodeStats};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Encoding error.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    /// Decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

pub(crate) const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// encode_file
// ---------------------------------------------------------------------------

/// Encode `input_path` as Ascii85 text, writing it to `output_path`.
pub fn encode_file(input_path: &Path, output_path: &Path) -> Result<EncodeStats, IoError> {
    let reader = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);

    let stats = encoder::encode_to(reader, &mut writer)?;
    writer.flush()?;
    Ok(stats)
}

// ---------------------------------------------------------------------------
// decode_file
// ---------------------------------------------------------------------------

/// Decode the first Ascii85 payload in `input_path`, writing bytes to `output_path`.
///
/// If the payload is malformed, the bytes decoded before the error are still
/// flushed to `output_path` before the error is returned.
pub fn decode_file(input_path: &Path, output_path: &Path) -> Result<DecodeStats, IoError> {
    let reader = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);

    let mut decoder = Ascii85Decoder::new(reader);
    let result = decoder.decode_to(&mut writer);
    writer.flush()?;
    Ok(result?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decoder::StreamEnd;
    use tempfile::tempdir;

    #[test]
    fn encode_decode_file_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.bin");
        let encoded = dir.path().join("encoded.a85");
        let output = dir.path().join("output.bin");

        let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        std::fs::write(&input, &data).unwrap();

        let enc_stats = encode_file(&input, &encoded).unwrap();
        assert_eq!(enc_stats.input_bytes, data.len() as u64);
        assert_eq!(
            enc_stats.output_bytes,
            std::fs::metadata(&encoded).unwrap().len()
        );
        assert!(enc_stats.lines > 1);

        let dec_stats = decode_file(&encoded, &output).unwrap();
        assert_eq!(dec_stats.output_bytes, data.len() as u64);
        assert_eq!(dec_stats.end, StreamEnd::Trailer);
        assert_eq!(std::fs::read(&output).unwrap(), data);
    }

    #[test]
    fn empty_file_encodes_to_bare_delimiters() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.bin");
        let encoded = dir.path().join("empty.a85");
        std::fs::write(&input, b"").unwrap();

        encode_file(&input, &encoded).unwrap();
        assert_eq!(std::fs::read(&encoded).unwrap(), b"<~~>");
    }

    #[test]
    fn malformed_input_keeps_partial_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.a85");
        let output = dir.path().join("bad.bin");
        std::fs::write(&input, b"<~9jqo^9j{o^~>").unwrap();

        let err = decode_file(&input, &output).unwrap_err();
        assert!(matches!(
            err,
            IoError::Decode(DecodeError::MalformedDigit { byte: b'{', .. })
        ));
        assert_eq!(std::fs::read(&output).unwrap(), b"Man ");
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = tempdir().unwrap();
        let err = encode_file(&dir.path().join("nope"), &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
    }
}
