use std::io::Write;

use tracing::{debug, info, warn};

use crate::{
    config::{Config, DriverConfig, ReaderConfig},
    error::Error,
    serial::{error::ReadError, lines::LineReader, ByteStream},
};

/// What happened during a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Lines received and printed.
    pub lines: usize,

    /// Reads which failed and were retried.
    pub failures: usize,
}

/// Reads lines from a stream and prints them.
#[derive(Debug)]
pub struct Driver {
    reader: LineReader,
    config: DriverConfig,
}

impl Driver {
    /// A driver using the given reader settings and run settings.
    pub fn new(reader: &ReaderConfig, config: DriverConfig) -> Self {
        let mut line_reader = LineReader::new(reader.max_line_length);
        if !reader.strip_leading_noise {
            line_reader = line_reader.keep_leading_noise();
        }

        debug!(
            max_length = line_reader.max_length(),
            strip_leading_noise = reader.strip_leading_noise,
            "Line reader ready"
        );

        Self {
            reader: line_reader,
            config,
        }
    }

    /// A driver set up from a full configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.reader, config.driver.clone())
    }

    /// Read lines from `stream`, writing each one to `out` as `Message Received: <line>`.
    ///
    /// Failed reads are retried and do not count towards the number of lines.
    /// A stream which is not initialized ends the run with an error.
    pub fn run<S, W>(&mut self, stream: &mut S, out: &mut W) -> Result<Summary, Error>
    where
        S: ByteStream + ?Sized,
        W: Write + ?Sized,
    {
        if let Some(greeting) = &self.config.send {
            let written = stream
                .write_bytes(greeting.as_bytes())
                .map_err(Error::Write)?;
            debug!(written, "Sent greeting");
        }

        let mut summary = Summary::default();
        let mut consecutive_failures = 0;

        while self
            .config
            .messages
            .map_or(true, |limit| summary.lines < limit)
        {
            match self.reader.read_line(stream) {
                Ok(line) => {
                    consecutive_failures = 0;
                    summary.lines += 1;
                    debug!(length = line.len(), count = summary.lines, "Line received");

                    writeln!(out, "Message Received: {line}")?;
                    out.flush()?;
                }
                Err(e @ (ReadError::NotInitialized | ReadError::BadBuffer { .. })) => {
                    return Err(e.into());
                }
                Err(e) if e.is_end_of_stream() && self.config.stop_at_end_of_stream => {
                    info!("End of stream");
                    break;
                }
                Err(e) => {
                    summary.failures += 1;
                    consecutive_failures += 1;
                    warn!(%e, consecutive_failures, "Failed to read a line");

                    if let Some(max) = self.config.max_consecutive_failures {
                        if consecutive_failures >= max {
                            return Err(Error::TooManyFailures {
                                count: consecutive_failures,
                                last: e,
                            });
                        }
                    }
                }
            }
        }

        Ok(summary)
    }
}
