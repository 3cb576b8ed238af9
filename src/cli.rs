use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

use crate::{config::Config, error::Error, serial::serial_port};

/// The command line interface for uart-readln.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a configuration file
    pub config: Option<PathBuf>,

    /// The serial device to open, overrides the configuration file
    #[arg(short, long)]
    pub device: Option<String>,

    /// Baud rate, overrides the configuration file
    #[arg(short, long)]
    pub baud: Option<u32>,

    /// Stop after this many lines, overrides the configuration file
    #[arg(short, long)]
    pub messages: Option<usize>,

    /// Log level. `RUST_LOG` takes precedence if set
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Commands available in the command line interface.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Examples for user convenience.
    #[clap(subcommand)]
    Examples(Examples),

    /// List the serial ports found on this machine.
    ListPorts,

    /// Read lines from a file of captured bytes instead of a device.
    Replay {
        /// The captured bytes
        file: PathBuf,
    },
}

/// Helpful examples for users.
#[derive(Subcommand, Debug, Clone)]
pub enum Examples {
    /// Show an example of a configuration file's contents.
    Config,
}

impl Cli {
    /// Load the configuration file (if any) and apply the command line overrides.
    pub fn config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::new_from_path(path)?,
            None => Config::default(),
        };

        if let Some(device) = &self.device {
            config.device.path = device.clone();
        }

        if let Some(baud) = self.baud {
            config.device.baud = baud;
        }

        if self.messages.is_some() {
            config.driver.messages = self.messages;
        }

        config.validate()?;

        Ok(config)
    }
}

/// Handle the commands which don't read any lines.
/// Returns the command back if it needs a line reading run.
pub fn handle_command(command: Commands) -> Result<Option<Commands>, Error> {
    match command {
        Commands::Examples(Examples::Config) => {
            println!("{}", Config::example().serialize_pretty()?);
        }
        Commands::ListPorts => {
            let ports = serial_port::list_ports()?;

            if ports.is_empty() {
                println!("No serial ports found");
            }

            for port in ports {
                println!("{}\t{:?}", port.port_name, port.port_type);
            }
        }
        replay @ Commands::Replay { .. } => return Ok(Some(replay)),
    }

    Ok(None)
}
