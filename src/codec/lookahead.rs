// One-byte lookahead over a `Read` source.
//
// The decoder needs to match two-byte delimiters (`<~`, `~>`) and hand the
// second byte back when it does not match. `Lookahead` keeps a single
// put-back slot in front of a chunked read buffer, so delimiter matching
// never relies on the underlying stream supporting pushback.

use std::io::{self, ErrorKind, Read};

const CHUNK_SIZE: usize = 8 * 1024;

/// Byte cursor with a single put-back slot.
pub struct Lookahead<R: Read> {
    inner: R,
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
    pushed: Option<u8>,
    consumed: u64,
    eof: bool,
}

impl<R: Read> Lookahead<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; CHUNK_SIZE].into_boxed_slice(),
            pos: 0,
            len: 0,
            pushed: None,
            consumed: 0,
            eof: false,
        }
    }

    /// Read the next byte, or `None` once the source is exhausted.
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pushed.take() {
            self.consumed += 1;
            return Ok(Some(b));
        }
        if self.pos == self.len && !self.fill()? {
            return Ok(None);
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        self.consumed += 1;
        Ok(Some(b))
    }

    /// Return the byte just read to the front of the stream.
    ///
    /// Only valid right after `next_byte` yielded `byte`; the slot holds one
    /// byte. The offset never drops below zero.
    pub(crate) fn put_back(&mut self, byte: u8) {
        debug_assert!(self.pushed.is_none(), "put-back slot already occupied");
        self.pushed = Some(byte);
        self.consumed = self.consumed.saturating_sub(1);
    }

    /// Consume the next byte if it equals `expected`.
    ///
    /// On mismatch the byte stays in the stream. Returns `Ok(None)` at end of
    /// input, otherwise whether the byte matched.
    pub fn next_if_eq(&mut self, expected: u8) -> io::Result<Option<bool>> {
        match self.next_byte()? {
            None => Ok(None),
            Some(b) if b == expected => Ok(Some(true)),
            Some(b) => {
                self.put_back(b);
                Ok(Some(false))
            }
        }
    }

    /// Number of bytes handed out so far (put-back bytes are not counted).
    pub fn offset(&self) -> u64 {
        self.consumed
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> io::Result<bool> {
        if self.eof {
            return Ok(false);
        }
        loop {
            match self.inner.read(&mut self.buf) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.pos = 0;
                    self.len = n;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
