use std::{io::Write, time::Duration};

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, SerialPortInfo, StopBits};
use tracing::{debug, trace, warn};

use crate::{
    config::DeviceConfig,
    error::Error,
    serial::{error::StreamError, read_one, ByteStream},
};

/// The baud rate used if none is set.
pub const DEFAULT_BAUD: u32 = 9600;

/// How long a single wait lasts when reads should block indefinitely.
/// Timing out just means waiting again.
const BLOCKING_WAIT: Duration = Duration::from_secs(60);

/// Builder for a [`SerialDevice`].
#[derive(Debug, Default)]
pub struct SerialPortBuilder {
    baud: Option<u32>,
    path: String,
    timeout: Option<Duration>,

    /// Length of one wait when blocking indefinitely, [`BLOCKING_WAIT`] if not set.
    wait_slice: Option<Duration>,
}

impl SerialPortBuilder {
    /// Start a new builder.
    /// The tty should likely be along the lines of `/dev/ttyTHS1` on unix, and `COMx` on Windows.
    pub fn new(tty: &str) -> Self {
        Self {
            path: tty.to_string(),
            ..Default::default()
        }
    }

    /// Set the serial port builder's baud.
    /// Will use [`DEFAULT_BAUD`] if not set.
    #[must_use]
    pub fn set_baud(mut self, baud: u32) -> Self {
        self.baud = Some(baud);
        self
    }

    /// Bound how long a read may wait for a byte.
    /// If not set, reads block until a byte arrives.
    #[must_use]
    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Open the port in raw mode: 8 data bits, no parity, one stop bit, no flow control.
    /// Both directions are flushed before the device is handed out.
    pub fn open(self) -> Result<SerialDevice, Error> {
        let baud = self.baud.unwrap_or(DEFAULT_BAUD);
        debug!(%self.path, baud, "Opening port");

        let open_error = |source| Error::Open {
            path: self.path.clone(),
            source,
        };

        let port = serialport::new(self.path.as_str(), baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(
                self.timeout
                    .or(self.wait_slice)
                    .unwrap_or(BLOCKING_WAIT),
            )
            .open()
            .map_err(open_error)?;

        port.clear(ClearBuffer::All).map_err(open_error)?;

        Ok(SerialDevice {
            path: self.path,
            port: Some(port),
            block_forever: self.timeout.is_none(),
        })
    }
}

/// An open serial device.
///
/// Closed when dropped, or explicitly via [`SerialDevice::close`].
/// Operations on a closed device report [`StreamError::NotInitialized`].
pub struct SerialDevice {
    path: String,
    port: Option<Box<dyn SerialPort>>,
    block_forever: bool,
}

impl SerialDevice {
    /// Open the device described by the configuration.
    pub fn open(config: &DeviceConfig) -> Result<Self, Error> {
        let mut builder = SerialPortBuilder::new(&config.path).set_baud(config.baud);

        if let Some(millis) = config.read_timeout_ms {
            builder = builder.set_timeout(Duration::from_millis(millis));
        }

        builder.open()
    }

    /// The path the device was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// True until the device is closed.
    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    /// Release the device.
    pub fn close(&mut self) {
        if self.port.take().is_some() {
            debug!(%self.path, "Closed port");
        }
    }
}

impl std::fmt::Debug for SerialDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialDevice")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .field("block_forever", &self.block_forever)
            .finish()
    }
}

impl ByteStream for SerialDevice {
    fn read_byte(&mut self) -> Result<u8, StreamError> {
        let port = self.port.as_mut().ok_or(StreamError::NotInitialized)?;

        loop {
            match read_one(&mut **port) {
                Err(StreamError::Io(e))
                    if self.block_forever && e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    trace!(%self.path, "Still waiting for a byte");
                }
                result => return result,
            }
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, StreamError> {
        let port = self.port.as_mut().ok_or(StreamError::NotInitialized)?;

        let written = port.write(bytes)?;
        if written != bytes.len() {
            warn!(%self.path, written, requested = bytes.len(), "Short write");
        }
        port.flush()?;

        Ok(written)
    }
}

impl Drop for SerialDevice {
    fn drop(&mut self) {
        self.close();
    }
}

/// The serial ports found on this machine.
pub fn list_ports() -> Result<Vec<SerialPortInfo>, Error> {
    serialport::available_ports().map_err(Error::ListPorts)
}
