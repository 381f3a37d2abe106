// Streaming Ascii85 encoder.
//
// Ascii85Encoder accepts input in arbitrary chunks:
//   - Groups may straddle `write_data()` calls; at most 3 bytes are held back
//   - Each call encodes into a reusable scratch buffer, then does one write
//   - The header is emitted before the first group, the trailer by `finish()`
//   - A newline is inserted before any character that would start at column 75

use std::io::{self, ErrorKind, Read, Write};

use log::{debug, trace};

use super::group::{encoded_len, pack_word, word_to_chars};
use super::{GROUP_BYTES, HEADER, LINE_WIDTH, TRAILER, ZERO_SHORTHAND};

const READ_BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Counters reported when an encode pass finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    /// Raw bytes consumed.
    pub input_bytes: u64,
    /// Encoded bytes produced, delimiters and newlines included.
    pub output_bytes: u64,
    /// Groups encoded, the final partial group included.
    pub groups: u64,
    /// Full all-zero groups written as `z`.
    pub zero_groups: u64,
    /// Output lines.
    pub lines: u64,
}

// ---------------------------------------------------------------------------
// Encoding state (no I/O)
// ---------------------------------------------------------------------------

/// Group and line state of one encode pass, writing into a caller buffer.
#[derive(Debug, Default)]
struct EncodeState {
    pending: [u8; GROUP_BYTES],
    pending_len: usize,
    column: usize,
    started: bool,
    stats: EncodeStats,
}

impl EncodeState {
    fn begin(&mut self, out: &mut Vec<u8>) {
        if !self.started {
            self.started = true;
            out.extend_from_slice(HEADER);
            self.column = HEADER.len();
            self.stats.lines = 1;
        }
    }

    fn push(&mut self, mut data: &[u8], out: &mut Vec<u8>) {
        self.begin(out);
        self.stats.input_bytes += data.len() as u64;

        // Complete a group left over from the previous call.
        if self.pending_len > 0 {
            let take = (GROUP_BYTES - self.pending_len).min(data.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&data[..take]);
            self.pending_len += take;
            data = &data[take..];
            if self.pending_len < GROUP_BYTES {
                return;
            }
            let group = self.pending;
            self.emit_group(&group, out);
            self.pending_len = 0;
        }

        let chunks = data.chunks_exact(GROUP_BYTES);
        let rest = chunks.remainder();
        for chunk in chunks {
            self.emit_group(chunk, out);
        }
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
    }

    fn finish(&mut self, out: &mut Vec<u8>) {
        self.begin(out);
        if self.pending_len > 0 {
            debug!("encoding trailing partial group of {} bytes", self.pending_len);
            let group = self.pending;
            self.emit_group(&group[..self.pending_len], out);
            self.pending_len = 0;
        }
        out.extend_from_slice(TRAILER);
    }

    fn emit_group(&mut self, group: &[u8], out: &mut Vec<u8>) {
        let word = pack_word(group);
        self.stats.groups += 1;

        if group.len() == GROUP_BYTES && word == 0 {
            self.stats.zero_groups += 1;
            self.put(ZERO_SHORTHAND, out);
            return;
        }

        let chars = word_to_chars(word);
        trace!("group {word:#010x} -> {:?}", &chars[..encoded_len(group.len())]);
        for &c in &chars[..encoded_len(group.len())] {
            self.put(c, out);
        }
    }

    #[inline]
    fn put(&mut self, c: u8, out: &mut Vec<u8>) {
        if self.column >= LINE_WIDTH {
            out.push(b'\n');
            self.column = 0;
            self.stats.lines += 1;
        }
        out.push(c);
        self.column += 1;
    }
}

// ---------------------------------------------------------------------------
// Ascii85Encoder
// ---------------------------------------------------------------------------

/// Streaming Ascii85 encoder over any `impl Write` sink.
///
/// # Example
/// ```
/// use oxi85::codec::Ascii85Encoder;
/// let mut out = Vec::new();
/// let mut enc = Ascii85Encoder::new(&mut out);
/// enc.write_data(b"Man ").unwrap();
/// enc.finish().unwrap();
/// assert_eq!(out, b"<~9jqo^~>");
/// ```
pub struct Ascii85Encoder<W: Write> {
    writer: W,
    state: EncodeState,
    /// Reusable output buffer (cleared after every write).
    scratch: Vec<u8>,
    bytes_out: u64,
    /// Set once a sink write fails. The sink may hold a partial chunk, so
    /// nothing more is written.
    poisoned: Option<ErrorKind>,
}

impl<W: Write> Ascii85Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            state: EncodeState::default(),
            scratch: Vec::new(),
            bytes_out: 0,
            poisoned: None,
        }
    }

    /// Feed raw bytes to the encoder.
    ///
    /// After a sink error every later call fails without writing.
    pub fn write_data(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        self.check_poisoned()?;
        self.scratch.clear();
        self.scratch.reserve(data.len() / GROUP_BYTES * 5 + data.len() / LINE_WIDTH + 8);
        self.state.push(data, &mut self.scratch);
        self.drain()
    }

    /// Encode any held-back partial group, write the trailer and return the sink.
    pub fn finish(mut self) -> Result<(W, EncodeStats), EncodeError> {
        self.check_poisoned()?;
        self.scratch.clear();
        self.state.finish(&mut self.scratch);
        self.drain()?;

        let mut stats = self.state.stats;
        stats.output_bytes = self.bytes_out;
        debug!(
            "encoded {} bytes into {} bytes ({} groups, {} zero groups, {} lines)",
            stats.input_bytes, stats.output_bytes, stats.groups, stats.zero_groups, stats.lines
        );
        Ok((self.writer, stats))
    }

    /// Raw bytes accepted so far.
    pub fn bytes_in(&self) -> u64 {
        self.state.stats.input_bytes
    }

    /// Encoded bytes written to the sink so far.
    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }

    fn check_poisoned(&self) -> Result<(), EncodeError> {
        match self.poisoned {
            Some(kind) => Err(EncodeError::Io(io::Error::new(
                kind,
                "encoder sink failed on an earlier write",
            ))),
            None => Ok(()),
        }
    }

    fn drain(&mut self) -> Result<(), EncodeError> {
        if !self.scratch.is_empty() {
            if let Err(e) = self.writer.write_all(&self.scratch) {
                debug!("sink write failed, encoder poisoned: {e}");
                self.poisoned = Some(e.kind());
                self.scratch.clear();
                return Err(e.into());
            }
            self.bytes_out += self.scratch.len() as u64;
            self.scratch.clear();
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Encode everything `reader` yields, writing framed Ascii85 to `writer`.
///
/// The writer is not flushed.
pub fn encode_to<R: Read, W: Write>(mut reader: R, writer: W) -> Result<EncodeStats, EncodeError> {
    let mut encoder = Ascii85Encoder::new(writer);
    let mut buf = vec![0u8; READ_BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        encoder.write_data(&buf[..n])?;
    }
    let (_, stats) = encoder.finish()?;
    Ok(stats)
}

/// Encode an in-memory buffer.
pub fn encode_all(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / GROUP_BYTES * 5 + data.len() / LINE_WIDTH + 10);
    let mut state = EncodeState::default();
    state.push(data, &mut out);
    state.finish(&mut out);
    out
}
