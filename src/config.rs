//! Configuration System using Figment
//!
//! This module provides strongly-typed configuration loading for the plot core.
//! Configuration is loaded from:
//! 1. `config/live_roll.toml` (base configuration, optional)
//! 2. Environment variables (prefixed with `LIVE_ROLL_`)
//!
//! # Environment Variable Overrides
//!
//! Nested keys are separated by a double underscore:
//!
//! ```text
//! LIVE_ROLL_APPLICATION__LOG_LEVEL=debug
//! LIVE_ROLL_BUFFER__CAPACITY=256
//! LIVE_ROLL_SPECTRUM__WINDOW=hann
//! ```
//!
//! # Example
//!
//! ```no_run
//! use live_roll::config::LiveRollConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LiveRollConfig::load()?;
//!     let trace = config.build_trace()?;
//!     println!("Trace capacity: {}", trace.capacity());
//!     Ok(())
//! }
//! ```

use crate::data::fft::{SpectralConverter, Window};
use crate::error::{AppResult, RollError};
use crate::trace::{NanPolicy, PlotTrace, DEFAULT_TRACE_CAPACITY};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "config/live_roll.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "LIVE_ROLL_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LiveRollConfig {
    /// Application settings
    #[serde(default)]
    pub application: ApplicationConfig,
    /// Rolling window settings
    #[serde(default)]
    pub buffer: BufferConfig,
    /// Spectral conversion settings
    #[serde(default)]
    pub spectrum: SpectrumConfig,
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_name")]
    pub name: String,
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Rolling window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Samples kept per axis. Signed so that bad values are reported, not wrapped.
    #[serde(default = "default_capacity")]
    pub capacity: i64,
    /// NaN handling applied before samples are stored
    #[serde(default)]
    pub nan_policy: NanPolicy,
}

/// Spectral conversion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SpectrumConfig {
    /// Window applied before the transform
    #[serde(default)]
    pub window: Window,
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_name() -> String {
    "live_roll".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_capacity() -> i64 {
    DEFAULT_TRACE_CAPACITY as i64
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            nan_policy: NanPolicy::default(),
        }
    }
}

// ============================================================================
// Configuration Loading and Validation
// ============================================================================

impl LiveRollConfig {
    /// Load configuration from [`DEFAULT_CONFIG_PATH`] and environment variables.
    ///
    /// A missing file is not an error; defaults and environment overrides still apply.
    ///
    /// # Errors
    ///
    /// Returns [`RollError::Config`] if a source cannot be parsed and
    /// [`RollError::InvalidConfiguration`] if validation fails.
    pub fn load() -> AppResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Same as [`LiveRollConfig::load`].
    pub fn load_from<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let config: Self = Self::figment(path.as_ref()).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    ///
    /// Checks:
    /// - Log level is valid (trace, debug, info, warn, error)
    /// - Buffer capacity is positive
    ///
    /// # Errors
    ///
    /// Returns [`RollError::InvalidConfiguration`] describing the first failure.
    pub fn validate(&self) -> AppResult<()> {
        let level = self.application.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(RollError::InvalidConfiguration(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.application.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        if self.buffer.capacity <= 0 {
            return Err(RollError::InvalidConfiguration(format!(
                "buffer.capacity must be positive, got {}",
                self.buffer.capacity
            )));
        }

        Ok(())
    }

    /// Builds an empty plot trace from the buffer settings.
    ///
    /// # Errors
    ///
    /// [`RollError::InvalidConfiguration`] for a non-positive capacity.
    pub fn build_trace(&self) -> AppResult<PlotTrace> {
        PlotTrace::new(self.buffer.capacity, self.buffer.nan_policy)
    }

    /// Builds a spectral converter from the spectrum settings.
    pub fn build_converter(&self) -> SpectralConverter {
        SpectralConverter::with_window(self.spectrum.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LiveRollConfig::default();
        config.validate().unwrap();
        assert_eq!(config.buffer.capacity, 128);
        assert_eq!(config.buffer.nan_policy, NanPolicy::Keep);
        assert_eq!(config.spectrum.window, Window::Rectangular);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = LiveRollConfig::default();
        config.application.log_level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_non_positive_capacity() {
        for capacity in [0, -1] {
            let mut config = LiveRollConfig::default();
            config.buffer.capacity = capacity;
            assert!(matches!(
                config.validate(),
                Err(RollError::InvalidConfiguration(_))
            ));
            assert!(matches!(
                config.build_trace(),
                Err(RollError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_build_from_config() {
        let mut config = LiveRollConfig::default();
        config.buffer.capacity = 16;
        config.buffer.nan_policy = NanPolicy::Replace(0.0);
        config.spectrum.window = Window::Hann;

        let trace = config.build_trace().unwrap();
        assert_eq!(trace.capacity(), 16);
        assert_eq!(trace.policy(), NanPolicy::Replace(0.0));
        assert_eq!(config.build_converter().window(), Window::Hann);
    }
}
