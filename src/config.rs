use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    serial::{
        lines::{DEFAULT_MAX_LINE_LENGTH, MAX_LINE_LENGTH},
        serial_port::DEFAULT_BAUD,
    },
};

/// Which device to open, and how.
///
/// The framing is always raw 8N1 without flow control, only the speed is configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// The path to the device.
    /// Likely "/dev/ttyTHS1", "/dev/ttyACMx" or "COMx".
    pub path: String,

    /// Baud rate, used for both directions.
    pub baud: u32,

    /// Give up on a single byte after this many milliseconds.
    /// If not set, reads block until a byte arrives.
    pub read_timeout_ms: Option<u64>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: "/dev/ttyTHS1".into(),
            baud: DEFAULT_BAUD,
            read_timeout_ms: None,
        }
    }
}

/// How lines are framed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Lines longer than this are split.
    pub max_line_length: usize,

    /// Discard whitespace and control bytes before the first content byte of a line.
    pub strip_leading_noise: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            strip_leading_noise: true,
        }
    }
}

/// How the read loop behaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Stop after this many lines. Runs forever if not set.
    pub messages: Option<usize>,

    /// Stop after this many failed reads in a row. Retries forever if not set.
    pub max_consecutive_failures: Option<usize>,

    /// Treat the stream ending as the end of the run instead of a failed read.
    pub stop_at_end_of_stream: bool,

    /// Written to the device once before reading starts.
    pub send: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            messages: Some(100),
            max_consecutive_failures: None,
            stop_at_end_of_stream: false,
            send: None,
        }
    }
}

/// The configuration used for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// See [`DeviceConfig`].
    pub device: DeviceConfig,

    /// See [`ReaderConfig`].
    pub reader: ReaderConfig,

    /// See [`DriverConfig`].
    pub driver: DriverConfig,
}

impl Config {
    fn ron() -> ron::Options {
        ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
            .with_default_extension(ron::extensions::Extensions::UNWRAP_NEWTYPES)
    }

    /// Deserialize a .ron file's contents.
    pub fn deserialize(input: &str) -> Result<Self, Error> {
        let config = Self::ron()
            .from_str::<Config>(input)
            .map_err(|e| Error::BadConfig(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// An example configuration with some fields filled in.
    pub fn example() -> Self {
        Self {
            device: DeviceConfig {
                path: "/dev/ttyACM0".into(),
                baud: 115_200,
                read_timeout_ms: Some(5000),
            },
            reader: ReaderConfig {
                max_line_length: 256,
                strip_leading_noise: true,
            },
            driver: DriverConfig {
                messages: Some(10),
                max_consecutive_failures: Some(3),
                stop_at_end_of_stream: false,
                send: Some("hello".into()),
            },
        }
    }

    /// Serialize the configuration in a "pretty" (i.e. non-compact) fashion.
    pub fn serialize_pretty(&self) -> Result<String, Error> {
        Self::ron()
            .to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::BadConfig(e.to_string()))
    }

    /// Setup a new configuration from a RON file.
    pub fn new_from_path<P: AsRef<Path>>(p: P) -> Result<Self, Error> {
        let s = std::fs::read_to_string(p)?;

        Self::deserialize(&s)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.device.baud == 0 {
            return Err(Error::BadConfig("The baud rate must be non-zero".into()));
        }

        if self.reader.max_line_length == 0 {
            return Err(Error::BadConfig(
                "The maximum line length must be at least 1".into(),
            ));
        }

        if self.reader.max_line_length > MAX_LINE_LENGTH {
            return Err(Error::BadConfig(format!(
                "The maximum line length must be at most {MAX_LINE_LENGTH}, got {}",
                self.reader.max_line_length
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn serialize() {
        let c = Config::example();

        println!("{}", c.serialize_pretty().unwrap());
    }

    #[test]
    fn example_round_trips() {
        let c = Config::example();

        let back = Config::deserialize(&c.serialize_pretty().unwrap()).unwrap();

        assert_eq!(c, back);
    }

    #[test]
    fn deserialize() {
        let input = r#"
(
    device: (
        path: "/dev/ttyUSB0",
        baud: 57600,
        read_timeout_ms: 250,
    ),
    reader: (
        max_line_length: 64,
    ),
    driver: (
        messages: None,
        send: "ping",
    ),
)"#;
        let c = Config::deserialize(input).unwrap();

        assert_eq!(c.device.path, "/dev/ttyUSB0");
        assert_eq!(c.device.baud, 57600);
        assert_eq!(c.device.read_timeout_ms, Some(250));
        assert_eq!(c.reader.max_line_length, 64);
        assert!(c.reader.strip_leading_noise);
        assert_eq!(c.driver.messages, None);
        assert_eq!(c.driver.send.as_deref(), Some("ping"));
        assert_eq!(c.driver.max_consecutive_failures, None);
    }

    #[test]
    fn empty_is_default() {
        let c = Config::deserialize("()").unwrap();

        assert_eq!(c, Config::default());
        assert_eq!(c.device.path, "/dev/ttyTHS1");
        assert_eq!(c.device.baud, 9600);
        assert_eq!(c.reader.max_line_length, 1024);
        assert_eq!(c.driver.messages, Some(100));
    }

    #[test]
    fn zero_line_length_is_bad() {
        let input = "(reader: (max_line_length: 0))";

        assert!(matches!(
            Config::deserialize(input),
            Err(Error::BadConfig(_))
        ));
    }

    #[test]
    fn zero_baud_is_bad() {
        let input = "(device: (baud: 0))";

        assert!(matches!(
            Config::deserialize(input),
            Err(Error::BadConfig(_))
        ));
    }

    #[test]
    fn huge_line_length_is_bad() {
        let input = "(reader: (max_line_length: 18446744073709551615))";

        assert!(matches!(
            Config::deserialize(input),
            Err(Error::BadConfig(_))
        ));

        let input = format!("(reader: (max_line_length: {}))", MAX_LINE_LENGTH + 1);

        assert!(matches!(
            Config::deserialize(&input),
            Err(Error::BadConfig(_))
        ));
    }

    #[test]
    fn largest_line_length_is_fine() {
        let input = format!("(reader: (max_line_length: {MAX_LINE_LENGTH}))");

        let c = Config::deserialize(&input).unwrap();

        assert_eq!(c.reader.max_line_length, MAX_LINE_LENGTH);
    }

    #[test]
    fn garbage_is_bad() {
        assert!(matches!(
            Config::deserialize("(device: 12"),
            Err(Error::BadConfig(_))
        ));
    }
}
