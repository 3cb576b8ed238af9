//! A mock, useful to test line reading without the actual serial ports.

use std::collections::VecDeque;

use tracing::trace;

use crate::serial::{error::StreamError, ByteStream};

/// An in-memory [`ByteStream`].
///
/// Reads pop queued bytes.
/// Once the queue is empty reads report [`StreamError::EndOfStream`],
/// or an I/O error if one was requested via [`MockStream::fail_after_queued`].
#[derive(Debug, Default)]
pub struct MockStream {
    inbox: VecDeque<u8>,
    written: Vec<u8>,
    open: bool,
    failure: Option<std::io::ErrorKind>,
}

impl MockStream {
    /// A mock stream which will yield the given bytes.
    pub fn new<B: AsRef<[u8]>>(bytes: B) -> Self {
        Self {
            inbox: bytes.as_ref().iter().copied().collect(),
            open: true,
            ..Default::default()
        }
    }

    /// Queue more bytes to be read.
    pub fn put(&mut self, bytes: &[u8]) {
        self.inbox.extend(bytes);
    }

    /// After the queued bytes are read, fail with an I/O error of this kind instead of ending.
    pub fn fail_after_queued(&mut self, kind: std::io::ErrorKind) {
        self.failure = Some(kind);
    }

    /// Close the stream. Further operations report [`StreamError::NotInitialized`].
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> Vec<u8> {
        self.inbox.iter().copied().collect()
    }

    /// True if all queued bytes have been read.
    pub fn is_drained(&self) -> bool {
        self.inbox.is_empty()
    }

    /// Everything written to the stream so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl ByteStream for MockStream {
    fn read_byte(&mut self) -> Result<u8, StreamError> {
        if !self.open {
            return Err(StreamError::NotInitialized);
        }

        match (self.inbox.pop_front(), self.failure) {
            (Some(byte), _) => Ok(byte),
            (None, Some(kind)) => Err(std::io::Error::from(kind).into()),
            (None, None) => {
                trace!("Mock stream drained");
                Err(StreamError::EndOfStream)
            }
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, StreamError> {
        if !self.open {
            return Err(StreamError::NotInitialized);
        }

        self.written.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn yields_queued_then_ends() {
        let mut mock = MockStream::new(b"a");
        mock.put(b"b");

        assert_eq!(mock.read_byte().unwrap(), b'a');
        assert_eq!(mock.read_byte().unwrap(), b'b');
        assert!(matches!(mock.read_byte(), Err(StreamError::EndOfStream)));
    }

    #[test]
    fn records_writes() {
        let mut mock = MockStream::new(b"");

        assert_eq!(mock.write_bytes(b"hello").unwrap(), 5);
        assert_eq!(mock.write_bytes(b"!").unwrap(), 1);
        assert_eq!(mock.written(), b"hello!");
    }

    #[test]
    fn closed_mock_is_not_initialized() {
        let mut mock = MockStream::new(b"a");
        mock.close();

        assert!(matches!(mock.read_byte(), Err(StreamError::NotInitialized)));
        assert!(matches!(
            mock.write_bytes(b"x"),
            Err(StreamError::NotInitialized)
        ));
    }

    #[test]
    fn default_mock_is_closed() {
        let mut mock = MockStream::default();

        assert!(matches!(mock.read_byte(), Err(StreamError::NotInitialized)));
    }
}
