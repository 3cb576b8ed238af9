use clap::Parser;
use color_eyre::Result;
use tracing::{debug, info};
use uart_readln::{
    cli::{self, Commands},
    driver::Driver,
    logging,
    mock::MockStream,
    serial::serial_port::SerialDevice,
};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = cli::Cli::parse();
    logging::init(cli.log_level);

    let mut config = cli.config()?;
    debug!(?config, "Configuration");

    let command = match cli.command {
        Some(command) => cli::handle_command(command)?,
        None => None,
    };

    let summary = match command {
        Some(Commands::Replay { file }) => {
            debug!(?file, "Replaying");
            let mut stream = MockStream::new(std::fs::read(&file)?);
            config.driver.stop_at_end_of_stream = true;

            Driver::from_config(&config).run(&mut stream, &mut std::io::stdout().lock())?
        }
        Some(_) => return Ok(()),
        None => {
            let mut device = SerialDevice::open(&config.device)?;
            info!(path = device.path(), baud = config.device.baud, "Port configured");
            println!("SERIAL Port Good to Go.");

            let summary =
                Driver::from_config(&config).run(&mut device, &mut std::io::stdout().lock());
            device.close();

            summary?
        }
    };

    info!(lines = summary.lines, failures = summary.failures, "Done");

    Ok(())
}
