use std::{borrow::Cow, fmt::Display};

use tracing::trace;

use crate::serial::{error::ReadError, ByteStream};

/// The maximum line length used when nothing else is configured.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024;

/// The largest line length a [`LineReader`] will allocate a buffer for (1 MiB).
pub const MAX_LINE_LENGTH: usize = 1 << 20;

/// Bytes which end a line. These are never stored.
fn is_terminator(byte: u8) -> bool {
    matches!(byte, b'\n' | b'\r' | b'\0')
}

/// Whitespace or control bytes, the same set as C's `isspace` and `iscntrl` in the "C" locale.
/// Vertical tab and form feed are control bytes, so they need no separate case.
fn is_leading_noise(byte: u8) -> bool {
    byte == b' ' || byte.is_ascii_control()
}

/// Read one terminated line from `stream` into `buffer`.
///
/// Leading whitespace and control bytes are discarded until the first content byte arrives.
/// Reading stops at `\n`, `\r` or `\0` (not stored), or when `max_length` content bytes are stored.
/// A null sentinel is then written right after the content.
///
/// The buffer must hold at least `max_length + 1` bytes so the sentinel never overwrites content.
///
/// Returns the number of content bytes written.
/// On error no line is delivered, but bytes stored before the failing read are left in place.
pub fn read_line<S: ByteStream + ?Sized>(
    stream: &mut S,
    buffer: &mut [u8],
    max_length: usize,
) -> Result<usize, ReadError> {
    frame(stream, buffer, max_length, true)
}

fn frame<S: ByteStream + ?Sized>(
    stream: &mut S,
    buffer: &mut [u8],
    max_length: usize,
    strip_leading_noise: bool,
) -> Result<usize, ReadError> {
    if max_length == 0 || buffer.len() <= max_length {
        return Err(ReadError::BadBuffer {
            max_length,
            capacity: buffer.len(),
        });
    }

    let mut cursor = 0;

    while cursor < max_length {
        let byte = stream.read_byte()?;

        if cursor == 0 && strip_leading_noise && is_leading_noise(byte) {
            trace!(byte, "Discarding leading byte");
            continue;
        }

        if is_terminator(byte) {
            break;
        }

        buffer[cursor] = byte;
        cursor += 1;
    }

    // When the loop ran out of room no terminator was consumed,
    // the sentinel then lands in the reserved slot at `max_length`.
    buffer[cursor] = b'\0';

    Ok(cursor)
}

/// A reusable line reader owning its buffer.
///
/// Not meant to be shared between threads without external synchronization,
/// since a line is only valid until the next read.
#[derive(Debug, Clone)]
pub struct LineReader {
    max_length: usize,
    strip_leading_noise: bool,

    /// Holds `max_length` content bytes plus the sentinel.
    buffer: Vec<u8>,
}

impl LineReader {
    /// Create a new reader for lines of at most `max_length` bytes.
    ///
    /// The owned buffer is never larger than [`MAX_LINE_LENGTH`] plus the sentinel,
    /// so [`LineReader::read_line`] reports [`ReadError::BadBuffer`] for longer limits.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            strip_leading_noise: true,
            buffer: vec![0; max_length.min(MAX_LINE_LENGTH) + 1],
        }
    }

    /// Keep whitespace and control bytes at the start of a line instead of discarding them.
    ///
    /// A terminator as the very first byte then yields an empty line.
    #[must_use]
    pub fn keep_leading_noise(mut self) -> Self {
        self.strip_leading_noise = false;
        self
    }

    /// The maximum number of content bytes in a line.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Read a line into a caller supplied buffer, see [`read_line`].
    pub fn read_into<S: ByteStream + ?Sized>(
        &self,
        stream: &mut S,
        buffer: &mut [u8],
    ) -> Result<usize, ReadError> {
        frame(stream, buffer, self.max_length, self.strip_leading_noise)
    }

    /// Read a line into the reader's own buffer.
    /// The line borrows the reader until it is dropped.
    pub fn read_line<S: ByteStream + ?Sized>(
        &mut self,
        stream: &mut S,
    ) -> Result<Line<'_>, ReadError> {
        let length = frame(
            stream,
            &mut self.buffer,
            self.max_length,
            self.strip_leading_noise,
        )?;

        Ok(Line {
            bytes: &self.buffer[..length],
        })
    }
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

/// A line as read by a [`LineReader`], excluding terminator and sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    bytes: &'a [u8],
}

impl<'a> Line<'a> {
    /// The content bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Number of content bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the line has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The line as text, bad utf8 is replaced.
    pub fn to_string_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes)
    }
}

impl Display for Line<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}
