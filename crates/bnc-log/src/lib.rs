//! Logging setup for bnc.
//!
//! Events go to stderr as structured JSON; stdout carries only the hex
//! payloads and reports the command-line tool prints.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Filter selected by `--verbose`, overriding `RUST_LOG`
pub const VERBOSE_FILTER: &str = "debug";

pub fn filter(verbose: bool) -> Result<EnvFilter, Error> {
    if verbose {
        return Ok(EnvFilter::try_new(VERBOSE_FILTER)?);
    }
    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(verbose: bool) -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(filter(verbose)?)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json(),
        )
        .try_init()?;

    tracing::debug!(verbose, "logging initialized");
    Ok(())
}
