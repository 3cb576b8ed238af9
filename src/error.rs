use thiserror::Error;

use crate::serial::error::{ReadError, StreamError};

/// Errors that may occur in this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The serial device could not be opened or configured.
    #[error("Unable to open UART `{path}`. Ensure it is not in use by another application. Problem: {source}")]
    Open {
        /// The device path.
        path: String,

        /// What the serial port library reported.
        source: serialport::Error,
    },

    /// The available serial ports could not be listed.
    #[error("Could not list serial ports: {0}")]
    ListPorts(#[source] serialport::Error),

    /// The configuration is not valid.
    #[error("Bad configuration: {0}")]
    BadConfig(String),

    /// A line could not be read, and the error is not one the driver retries.
    #[error("Could not read a line: {0}")]
    Read(#[from] ReadError),

    /// Writing to the device failed.
    #[error("Could not write to the device: {0}")]
    Write(#[source] StreamError),

    /// Reads kept failing.
    #[error("Giving up after {count} consecutive failed read(s). Last problem: {last}")]
    TooManyFailures {
        /// How many reads failed in a row.
        count: usize,

        /// The last failure.
        last: ReadError,
    },

    /// Writing output failed, or a configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
