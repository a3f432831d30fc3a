//! Logging setup for DELVE binaries.
//!
//! Console output only, formatted by `tracing-subscriber`. The `RUST_LOG`
//! environment variable overrides the default filter.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor a caller override is set.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// `default_filter` is an `EnvFilter` directive such as `"info"` or
/// `"delve_map=debug"`, used only when `RUST_LOG` is unset or invalid.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(default_filter: &str) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
}
