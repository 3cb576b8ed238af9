use thiserror::Error;

/// Errors a [`crate::serial::ByteStream`] may report for a single operation.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The handle was never opened, or has been closed.
    #[error("The serial connection is not initialized")]
    NotInitialized,

    /// A read returned zero bytes.
    #[error("The stream ended (read returned 0 bytes)")]
    EndOfStream,

    /// The device reported an error.
    #[error("I/O error on the serial connection: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors when reading a single line.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The stream handle is absent or closed.
    #[error("Connection not initialized")]
    NotInitialized,

    /// A byte read did not yield exactly one byte.
    /// No partial line is delivered.
    #[error("Failed to read a character: {0}")]
    StreamFailure(#[source] StreamError),

    /// The buffer can't hold `max_length` content bytes plus the null sentinel,
    /// or `max_length` is zero.
    #[error("A buffer of {capacity} byte(s) can't hold a line of up to {max_length} byte(s) plus its sentinel")]
    BadBuffer {
        /// The requested maximum line length.
        max_length: usize,

        /// The capacity of the supplied buffer.
        capacity: usize,
    },
}

impl From<StreamError> for ReadError {
    fn from(error: StreamError) -> Self {
        match error {
            StreamError::NotInitialized => Self::NotInitialized,
            other => Self::StreamFailure(other),
        }
    }
}

impl ReadError {
    /// True if the read failed because the stream ran dry.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::StreamFailure(StreamError::EndOfStream))
    }
}
