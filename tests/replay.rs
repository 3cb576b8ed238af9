use color_eyre::Result;
use pretty_assertions::assert_eq;
use tracing::Level;
use uart_readln::{
    config::Config,
    driver::{Driver, Summary},
    error::Error,
    mock::MockStream,
};

fn run(config: &Config, input: &[u8]) -> Result<(Summary, String)> {
    uart_readln::logging::init(Level::DEBUG);

    let mut stream = MockStream::new(input);
    let mut out = Vec::new();

    let summary = Driver::from_config(config).run(&mut stream, &mut out)?;

    Ok((summary, String::from_utf8(out)?))
}

#[test]
fn replay_from_ron_config() -> Result<()> {
    let config = Config::deserialize(
        r#"
(
    reader: (max_line_length: 8),
    driver: (messages: None, stop_at_end_of_stream: true),
)"#,
    )?;

    let (summary, out) = run(&config, b"\x02 first\r\n\r\nsecond-is-long\n")?;

    assert_eq!(summary, Summary { lines: 3, failures: 0 });
    assert_eq!(
        out,
        "Message Received: first\nMessage Received: second-i\nMessage Received: s-long\n"
    );

    Ok(())
}

#[test]
fn keeping_noise_yields_empty_lines() -> Result<()> {
    let config = Config::deserialize(
        r#"
(
    reader: (strip_leading_noise: false),
    driver: (messages: Some(3)),
)"#,
    )?;

    let (summary, out) = run(&config, b"a\r\nb\n")?;

    assert_eq!(summary.lines, 3);
    assert_eq!(
        out,
        "Message Received: a\nMessage Received: \nMessage Received: b\n"
    );

    Ok(())
}

#[test]
fn default_config_retries_until_limit() -> Result<()> {
    let mut config = Config::default();
    config.driver.max_consecutive_failures = Some(2);

    let error = run(&config, b"only one\n").unwrap_err();

    match error.downcast_ref::<Error>() {
        Some(Error::TooManyFailures { count, last }) => {
            assert_eq!(*count, 2);
            assert!(last.is_end_of_stream());
        }
        other => panic!("Unexpected error: {other:?}"),
    }

    Ok(())
}
