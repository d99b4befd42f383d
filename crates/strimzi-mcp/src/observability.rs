//! Tracing setup.
//!
//! stdout carries protocol messages, so every log line goes to stderr.

use crate::config::LogFormat;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Initialize the tracing subscriber once for the process.
///
/// Filter defaults to `info` if `RUST_LOG` is unset.
pub fn init_tracing(format: LogFormat) {
    TRACING_INIT.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let result = match format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init(),
            LogFormat::Compact => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init(),
        };

        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing(LogFormat::Compact);
        init_tracing(LogFormat::Json);
    }
}
