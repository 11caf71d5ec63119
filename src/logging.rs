//! Logging setup for the binary.
//!
//! Installs a global `tracing` subscriber writing to stderr, filtered by
//! `RUST_LOG` (default `info`). The library itself only emits events.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{Error, Result};

const DEFAULT_FILTER: &str = "info";

/// Initialize tracing. Fails if a global subscriber is already installed.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| Error::InvalidConfig(format!("failed to install tracing subscriber: {e}")))
}
