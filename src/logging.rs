//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events. Binaries and test harnesses that want to
//! see them call [`init_from_config`] (or [`init`]) once at startup.
//!
//! `RUST_LOG` takes precedence over the configured level:
//!
//! ```text
//! RUST_LOG=live_roll=trace
//! ```

use crate::config::LiveRollConfig;
use crate::error::{AppResult, RollError};
use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber filtered at the configured log level.
///
/// # Errors
///
/// Returns [`RollError::Logging`] if a global subscriber is already set.
pub fn init_from_config(config: &LiveRollConfig) -> AppResult<()> {
    init(&config.application.log_level)
}

/// Installs a global `fmt` subscriber with `level` as the fallback filter.
///
/// # Errors
///
/// Returns [`RollError::Logging`] if a global subscriber is already set.
pub fn init(level: &str) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| RollError::Logging(e.to_string()))?;

    tracing::debug!(level, "logging initialized");
    Ok(())
}
