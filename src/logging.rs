use tracing_subscriber::{fmt, EnvFilter};

use crate::types::{FrescoError, Result};

/// Filter used when neither the caller nor `RUST_LOG` supplies one.
pub const DEFAULT_LOG_FILTER: &str = "fresco=info";

/// Installs a global `tracing` subscriber writing to stderr.
pub fn init_logging(filter: &str) -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_new(filter)
                .map_err(|e| FrescoError::Invalid(format!("Invalid log filter: {e}")))?,
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| FrescoError::Invalid("Logging already initialized".into()))
}

/// Picks the explicit filter, then `RUST_LOG`, then the configured one,
/// then [`DEFAULT_LOG_FILTER`].
pub fn resolve_filter(explicit: Option<&str>, configured: Option<&str>) -> String {
    explicit
        .map(str::to_owned)
        .or_else(|| std::env::var("RUST_LOG").ok().filter(|v| !v.is_empty()))
        .or_else(|| configured.map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned())
}
