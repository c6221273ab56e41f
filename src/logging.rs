use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "LOGCOST_LOG";

/// Initialize tracing on stderr so stdout stays clean for reports.
///
/// Call once, at startup.
///
/// `LOGCOST_LOG` takes precedence; otherwise `verbose` picks `debug` over `warn`.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
