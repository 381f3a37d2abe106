// Streaming Ascii85 decoder.
//
// State progression: seek the first `<~`, decode digits until `~>` or end of
// input, flush any trailing partial group, done. Bytes before the header are
// ignored, as is everything after the trailer.
//
// Malformed input aborts the pass. Output decoded before the offending byte
// has already been handed to the sink; the partial group being assembled
// at that point is dropped.

use std::io::{self, Read, Write};

use log::{debug, trace};

use super::group::{char_to_digit, decode_partial, fold_digits};
use super::lookahead::Lookahead;
use super::{GROUP_BYTES, GROUP_DIGITS, ZERO_SHORTHAND, is_whitespace};

/// Decoded bytes are buffered up to this size before each sink write.
const FLUSH_THRESHOLD: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Decoder error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A payload byte outside `!`..=`u` (other than whitespace, `z`, or the trailer).
    #[error("malformed digit {byte:#04x} at offset {offset}")]
    MalformedDigit { byte: u8, offset: u64 },
    /// `z` while a digit group was partially assembled.
    #[error("'z' inside a partial group at offset {offset}")]
    UnexpectedShorthand { offset: u64 },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// State and stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    SeekingHeader,
    InPayload,
    Done,
    /// The pass hit an error; every later call reports it again.
    Failed,
}

/// How a decode pass ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamEnd {
    /// The input held no `<~` header.
    #[default]
    NoHeader,
    /// The payload was closed by `~>`.
    Trailer,
    /// Input ran out inside the payload.
    EndOfInput,
    /// Decoding stopped at an error.
    Aborted,
}

/// Error recorded by a failed pass, replayed on later calls.
#[derive(Debug, Clone, Copy)]
enum Failure {
    MalformedDigit { byte: u8, offset: u64 },
    UnexpectedShorthand { offset: u64 },
    Io(io::ErrorKind),
}

impl From<&DecodeError> for Failure {
    fn from(e: &DecodeError) -> Self {
        match *e {
            DecodeError::MalformedDigit { byte, offset } => Self::MalformedDigit { byte, offset },
            DecodeError::UnexpectedShorthand { offset } => Self::UnexpectedShorthand { offset },
            DecodeError::Io(ref e) => Self::Io(e.kind()),
        }
    }
}

impl Failure {
    fn to_error(self) -> DecodeError {
        match self {
            Self::MalformedDigit { byte, offset } => DecodeError::MalformedDigit { byte, offset },
            Self::UnexpectedShorthand { offset } => DecodeError::UnexpectedShorthand { offset },
            Self::Io(kind) => {
                DecodeError::Io(io::Error::new(kind, "decoder failed on an earlier call"))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Input bytes consumed, including anything before the header.
    pub input_bytes: u64,
    /// Decoded bytes written to the sink.
    pub output_bytes: u64,
    /// Five-digit groups decoded.
    pub groups: u64,
    /// `z` groups decoded.
    pub zero_groups: u64,
    pub end: StreamEnd,
}

// ---------------------------------------------------------------------------
// Ascii85Decoder
// ---------------------------------------------------------------------------

/// Streaming Ascii85 decoder over any `impl Read` source.
pub struct Ascii85Decoder<R: Read> {
    input: Lookahead<R>,
    state: DecodeState,
    digits: [u8; GROUP_DIGITS],
    ndigits: usize,
    /// Decoded bytes not yet written to the sink.
    out: Vec<u8>,
    stats: DecodeStats,
    failure: Option<Failure>,
}

impl<R: Read> Ascii85Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            input: Lookahead::new(reader),
            state: DecodeState::SeekingHeader,
            digits: [0; GROUP_DIGITS],
            ndigits: 0,
            out: Vec::new(),
            stats: DecodeStats::default(),
            failure: None,
        }
    }

    /// Run the pass to completion, writing decoded bytes to `writer`.
    ///
    /// On error everything decoded before the failure point is written first.
    /// Calling this again after success returns the same stats; calling it
    /// again after a failure returns the same error.
    pub fn decode_to<W: Write>(&mut self, writer: &mut W) -> Result<DecodeStats, DecodeError> {
        if let Some(failure) = self.failure {
            return Err(failure.to_error());
        }
        let result = self.run(writer);
        let drained = self.drain(writer);
        let result = result.and_then(|()| drained.map_err(DecodeError::from));
        if let Err(e) = &result {
            self.fail(e);
        }
        result?;
        Ok(self.stats())
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Input bytes consumed so far.
    pub fn bytes_read(&self) -> u64 {
        self.input.offset()
    }

    pub fn stats(&self) -> DecodeStats {
        DecodeStats {
            input_bytes: self.input.offset(),
            ..self.stats
        }
    }

    pub fn into_inner(self) -> R {
        self.input.into_inner()
    }

    fn run<W: Write>(&mut self, writer: &mut W) -> Result<(), DecodeError> {
        loop {
            match self.state {
                DecodeState::SeekingHeader => {
                    if self.seek_header()? {
                        debug!("found header ending at offset {}", self.input.offset());
                        self.state = DecodeState::InPayload;
                    } else {
                        debug!("no header found in {} input bytes", self.input.offset());
                        self.stats.end = StreamEnd::NoHeader;
                        self.state = DecodeState::Done;
                    }
                }
                DecodeState::InPayload => {
                    self.decode_payload(writer)?;
                    self.state = DecodeState::Done;
                }
                DecodeState::Done | DecodeState::Failed => return Ok(()),
            }
        }
    }

    fn fail(&mut self, e: &DecodeError) {
        debug!("decode aborted: {e}");
        self.failure = Some(Failure::from(e));
        self.state = DecodeState::Failed;
        self.stats.end = StreamEnd::Aborted;
    }

    /// Discard input up to and including the first `<~`.
    fn seek_header(&mut self) -> Result<bool, DecodeError> {
        while let Some(b) = self.input.next_byte()? {
            if b != b'<' {
                continue;
            }
            match self.input.next_if_eq(b'~')? {
                Some(true) => return Ok(true),
                Some(false) => continue,
                None => return Ok(false),
            }
        }
        Ok(false)
    }

    fn decode_payload<W: Write>(&mut self, writer: &mut W) -> Result<(), DecodeError> {
        loop {
            let Some(c) = self.input.next_byte()? else {
                debug!("payload not terminated by trailer");
                self.stats.end = StreamEnd::EndOfInput;
                break;
            };
            let offset = self.input.offset() - 1;

            match c {
                b'~' => match self.input.next_if_eq(b'>')? {
                    Some(true) => {
                        debug!("found trailer at offset {offset}");
                        self.stats.end = StreamEnd::Trailer;
                        break;
                    }
                    None => {
                        debug!("input ends with a lone '~'");
                        self.stats.end = StreamEnd::EndOfInput;
                        break;
                    }
                    Some(false) => return Err(DecodeError::MalformedDigit { byte: c, offset }),
                },
                c if is_whitespace(c) => continue,
                ZERO_SHORTHAND => {
                    if self.ndigits != 0 {
                        return Err(DecodeError::UnexpectedShorthand { offset });
                    }
                    self.out.extend_from_slice(&[0; GROUP_BYTES]);
                    self.stats.zero_groups += 1;
                }
                c => {
                    let digit =
                        char_to_digit(c).ok_or(DecodeError::MalformedDigit { byte: c, offset })?;
                    self.digits[self.ndigits] = digit;
                    self.ndigits += 1;
                    if self.ndigits == GROUP_DIGITS {
                        let word = fold_digits(&self.digits);
                        trace!("group {:?} -> {word:#010x}", self.digits);
                        self.out.extend_from_slice(&word.to_be_bytes());
                        self.stats.groups += 1;
                        self.ndigits = 0;
                    }
                }
            }

            if self.out.len() >= FLUSH_THRESHOLD {
                self.drain(writer)?;
            }
        }

        self.flush_partial();
        Ok(())
    }

    fn flush_partial(&mut self) {
        if self.ndigits == 0 {
            return;
        }
        let (bytes, len) = decode_partial(&self.digits[..self.ndigits]);
        debug!(
            "flushing partial group of {} digits into {len} bytes",
            self.ndigits
        );
        self.out.extend_from_slice(&bytes[..len]);
        self.ndigits = 0;
    }

    fn drain<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if !self.out.is_empty() {
            writer.write_all(&self.out)?;
            self.stats.output_bytes += self.out.len() as u64;
            self.out.clear();
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Decode the first Ascii85 payload found in `reader`, writing bytes to `writer`.
///
/// The writer is not flushed.
pub fn decode_to<R: Read, W: Write>(reader: R, mut writer: W) -> Result<DecodeStats, DecodeError> {
    Ascii85Decoder::new(reader).decode_to(&mut writer)
}

/// Decode the first Ascii85 payload found in an in-memory buffer.
pub fn decode_all(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(data.len() / GROUP_DIGITS * GROUP_BYTES + GROUP_BYTES);
    decode_to(data, &mut out)?;
    Ok(out)
}
