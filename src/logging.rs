//! Logging setup
//!
//! All output goes to stderr so that command results on stdout stay
//! machine-readable.

use crate::config::Settings;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Build the filter from `RUST_LOG`, falling back to the configured level
pub fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// Initialize the global tracing subscriber
///
/// Production uses JSON lines; other environments use the compact
/// human-readable format. Calling this twice is harmless: the second
/// registration is ignored.
pub fn init_tracing(settings: &Settings) {
    let log_level = settings.log_level.as_str();
    let layer = if settings.is_production() {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(build_filter(log_level))
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(build_filter(log_level))
            .boxed()
    };

    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        tracing::debug!("Tracing subscriber already initialized");
    }
}
