//! Logging utilities

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber
///
/// The base level comes from `ANSA_LOG_LEVEL` (default `info`); an explicit
/// `RUST_LOG` takes precedence. Output goes to stderr so piped stdout stays
/// clean. Panics if a global subscriber is already installed.
pub fn init_logging() {
    let level = std::env::var("ANSA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
