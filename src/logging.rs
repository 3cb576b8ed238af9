use std::sync::Once;

use tracing::{debug, Level};
use tracing_subscriber::{prelude::*, EnvFilter};

fn do_init(level: Level) {
    let filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    // Logs go to stderr, stdout is reserved for received messages.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();

    debug!(%level, "Logging initialized");
}

/// Initialize tracing.
/// `RUST_LOG` takes precedence over the given level.
///
/// Will only initialize once, so tests may call this.
pub fn init(level: Level) {
    static TRACING_IS_INITIALIZED: Once = Once::new();

    TRACING_IS_INITIALIZED.call_once(|| do_init(level));
}
