//! Input plumbing between the caller's source and the XML tokenizer.
//!
//! - [`Transcoder`] turns a byte stream in any `encoding_rs` encoding into UTF-8
//! - [`Tracked`] counts lines and columns over the bytes the tokenizer consumes
//!
//! ```text
//! Read ──▶ Transcoder ──▶ BufReader ──▶ Tracked ──▶ NsReader
//!  (bytes, label)      (UTF-8)                (location)
//! ```

use std::fmt;
use std::io::{self, BufRead, Read};

use encoding_rs::{CoderResult, Decoder, Encoding};

/// Size of the raw input chunk decoded per refill.
const CHUNK_SIZE: usize = 8192;

/// Line/column position in the source, both 1-based.
///
/// `Location::UNKNOWN` (0:0) is reported when no input is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: u64,
    pub column: u64,
}

impl Location {
    pub const UNKNOWN: Location = Location { line: 0, column: 0 };

    /// Position of the first character of the input.
    pub const fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Move past `bytes` of UTF-8 text. Columns count characters, not bytes.
    pub fn advance(&mut self, bytes: &[u8]) {
        match memchr::memrchr(b'\n', bytes) {
            Some(last) => {
                self.line += memchr::memchr_iter(b'\n', bytes).count() as u64;
                self.column = 1 + char_count(&bytes[last + 1..]);
            }
            None => self.column += char_count(bytes),
        }
    }

    pub fn is_known(&self) -> bool {
        self.line != 0
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "line {}, column {}", self.line, self.column)
        } else {
            f.write_str("unknown position")
        }
    }
}

/// Count UTF-8 scalar values (every byte that is not a continuation byte).
#[inline]
fn char_count(bytes: &[u8]) -> u64 {
    bytes.iter().filter(|&&b| (b & 0xC0) != 0x80).count() as u64
}

/// `BufRead` wrapper tracking the location of the next unconsumed byte.
pub struct Tracked<R> {
    inner: R,
    location: Location,
    /// Last byte consumed
    last: Option<u8>,
}

impl<R: BufRead> Tracked<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            location: Location::start(),
            last: None,
        }
    }

    /// Location just past everything consumed so far.
    #[inline]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Location at the end of a text run, before the `<` the tokenizer
    /// consumed to detect its end.
    pub fn text_end(&self) -> Location {
        match self.last {
            Some(b'<') => Location {
                column: self.location.column - 1,
                ..self.location
            },
            _ => self.location,
        }
    }

    fn advance(&mut self, bytes: &[u8]) {
        if let Some(&last) = bytes.last() {
            self.location.advance(bytes);
            self.last = Some(last);
        }
    }
}

impl<R: BufRead> Read for Tracked<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.advance(&buf[..read]);
        Ok(read)
    }
}

impl<R: BufRead> BufRead for Tracked<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        // The bytes being consumed are still at the front of the inner buffer.
        if let Ok(buf) = self.inner.fill_buf() {
            let consumed = &buf[..amt.min(buf.len())];
            self.location.advance(consumed);
            if let Some(&last) = consumed.last() {
                self.last = Some(last);
            }
        }
        self.inner.consume(amt);
    }
}

/// Look up an encoding by WHATWG label (`"utf-8"`, `"latin1"`, `"UTF-16LE"`, ...).
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// `Read` adapter decoding `encoding` into UTF-8.
///
/// Malformed input is an `InvalidData` error instead of U+FFFD substitution,
/// so encoding mistakes surface as parse failures.
pub struct Transcoder<R> {
    inner: R,
    decoder: Decoder,
    raw: Box<[u8]>,
    raw_pos: usize,
    raw_len: usize,
    decoded: Box<[u8]>,
    decoded_pos: usize,
    decoded_len: usize,
    eof: bool,
    done: bool,
}

impl<R: Read> Transcoder<R> {
    pub fn new(inner: R, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            decoder: encoding.new_decoder(),
            raw: vec![0; CHUNK_SIZE].into_boxed_slice(),
            raw_pos: 0,
            raw_len: 0,
            // Worst case expansion is 3 UTF-8 bytes per input byte
            decoded: vec![0; CHUNK_SIZE * 3].into_boxed_slice(),
            decoded_pos: 0,
            decoded_len: 0,
            eof: false,
            done: false,
        }
    }

    /// Decode the next chunk of input into the output buffer.
    fn refill(&mut self) -> io::Result<()> {
        if self.raw_pos == self.raw_len && !self.eof {
            let read = self.inner.read(&mut self.raw)?;
            self.raw_pos = 0;
            self.raw_len = read;
            self.eof = read == 0;
        }

        let (result, read, written, had_errors) = self.decoder.decode_to_utf8(
            &self.raw[self.raw_pos..self.raw_len],
            &mut self.decoded,
            self.eof,
        );
        if had_errors {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("input is not valid {}", self.decoder.encoding().name()),
            ));
        }
        self.raw_pos += read;
        self.decoded_pos = 0;
        self.decoded_len = written;
        if self.eof && matches!(result, CoderResult::InputEmpty) {
            self.done = true;
        }
        Ok(())
    }
}

impl<R: Read> Read for Transcoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.decoded_pos == self.decoded_len {
            if self.done {
                return Ok(0);
            }
            self.refill()?;
        }
        let n = buf.len().min(self.decoded_len - self.decoded_pos);
        buf[..n].copy_from_slice(&self.decoded[self.decoded_pos..self.decoded_pos + n]);
        self.decoded_pos += n;
        Ok(n)
    }
}
