//! Logger configuration for the token service and its dependents.
//!
//! See also: the bespoke logger some front-end services set up when they
//! need a non-stdout sink; this crate only covers the common case.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{
    filter::{EnvFilter, Targets},
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

/// Initialize a global `tracing` logger.
///
/// + The logger prints enabled `tracing` events and spans to stdout.
/// + The default log level includes INFO, WARN, and ERROR events.
/// + Override the log level or module filtering with `RUST_LOG`. See
///   <https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html>.
///
/// Panics if a logger is already initialized.
pub fn init() {
    try_init().expect("Failed to setup logger");
}

/// Use this to initialize the global logger in tests.
///
/// Quickly skips logger setup if no `RUST_LOG` env var is set, and doesn't
/// panic if a logger is already installed (multiple test threads race to set
/// the global logger).
pub fn init_for_testing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let _ = try_init();
}

/// Try to initialize a global logger. Returns `Err` if one is already set.
pub fn try_init() -> Result<(), TryInitError> {
    let rust_log_filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|rust_log| Targets::from_str(&rust_log).ok())
        .unwrap_or_else(|| Targets::new().with_default(Level::INFO));

    let stdout_log = tracing_subscriber::fmt::layer()
        .compact()
        .with_level(true)
        .with_target(true)
        .with_ansi(true)
        .with_filter(rust_log_filter);

    tracing_subscriber::registry().with(stdout_log).try_init()
}

/// An [`EnvFilter`]-based variant for services that want dynamic reload
/// support instead of the static [`Targets`] filter `init` uses.
pub fn env_filter_or_default(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive))
}
