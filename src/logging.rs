//! Tracing subscriber setup for the `sypher` binary.
//!
//! Logs go to stderr so command output on stdout stays pipeable. The filter
//! comes from `RUST_LOG` when set, otherwise from `[log].level`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogConfig;

pub fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if log.format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(atty::is(atty::Stream::Stderr))
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    // A subscriber may already be installed (e.g. in tests).
    if let Err(e) = result {
        tracing::debug!("tracing already initialized: {}", e);
    }
}
