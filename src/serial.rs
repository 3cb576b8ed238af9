/// Serial port related errors.
pub mod error;

/// The serial port device handle.
pub mod serial_port;

/// Reading terminated lines from a byte stream.
pub mod lines;

use error::StreamError;

/// A blocking, byte oriented stream.
///
/// Implementors are expected to already be configured (raw mode, blocking,
/// reads return at least one byte).
/// Nothing here configures the underlying device.
pub trait ByteStream {
    /// Read exactly one byte, blocking until it's available or an error occurs.
    fn read_byte(&mut self) -> Result<u8, StreamError>;

    /// Write the given bytes, returning how many were written.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, StreamError>;
}

/// Read a single byte from anything implementing [`std::io::Read`].
///
/// A read of zero bytes is reported as [`StreamError::EndOfStream`].
pub(crate) fn read_one<R: std::io::Read + ?Sized>(reader: &mut R) -> Result<u8, StreamError> {
    let mut byte = [0u8; 1];

    match reader.read(&mut byte)? {
        1 => Ok(byte[0]),
        _ => Err(StreamError::EndOfStream),
    }
}
