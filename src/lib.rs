#![deny(missing_docs)]

//! This crate reads newline terminated messages from a serial (UART) device.
//!
//! The device is opened in raw mode (8N1, no flow control, blocking reads),
//! and then read one byte at a time.
//! Whitespace and control bytes before the first content byte of a line are discarded.
//! A line ends at `\n`, `\r` or `\0`, or when the maximum line length is reached.
//!
//! Captured byte streams can be replayed through the same line reader via a mock stream.

/// The command line interface.
pub mod cli;

/// Relates to config files.
pub mod config;

/// The loop which reads and prints lines.
pub mod driver;

/// Possible errors in this library.
pub mod error;

/// Logging/tracing setup.
pub mod logging;

/// Mocked serial port, backed by memory.
pub mod mock;

/// Serial port driver and line reading.
pub mod serial;
