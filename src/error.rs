//! Custom error types for the library.
//!
//! This module defines the primary error type, `RollError`, shared by the rolling
//! buffers, the spectral converter and the configuration layer. Using the `thiserror`
//! crate, it gives every fallible operation a single, matchable error surface.
//!
//! ## Error Hierarchy
//!
//! - **`InvalidConfiguration`**: A value that can never produce a working object, such as
//!   a zero or negative buffer capacity. Fatal to construction and never retried.
//! - **`InsufficientData`**: Spectral conversion was handed fewer than two points or a
//!   time axis with zero span. Recoverable: the caller skips the spectrum for that frame.
//! - **`LengthMismatch`**: The time and value sequences of a signal differ in length.
//! - **`Config`**: Wraps errors from `figment` while loading configuration files or
//!   environment overrides.
//! - **`Logging`**: The global `tracing` subscriber could not be installed.
//!
//! Not-a-number samples are never errors. They propagate through buffers and spectra.

use thiserror::Error;

/// Convenience alias for results using the library error type.
pub type AppResult<T> = std::result::Result<T, RollError>;

/// Errors produced by this crate.
#[derive(Error, Debug)]
pub enum RollError {
    /// A construction parameter or configured value is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Not enough samples (or no time span) to build a spectrum.
    #[error("Insufficient data: {reason} (got {points} points)")]
    InsufficientData {
        /// Number of points that were supplied.
        points: usize,
        /// What made the data unusable.
        reason: &'static str,
    },

    /// Time stamps and values disagree in length.
    #[error("Signal length mismatch: {times} time stamps vs {values} values")]
    LengthMismatch {
        /// Length of the time sequence.
        times: usize,
        /// Length of the value sequence.
        values: usize,
    },

    /// Configuration could not be loaded or deserialized.
    #[error("Configuration load error: {0}")]
    Config(#[from] figment::Error),

    /// Logging subscriber installation failed.
    #[error("Logging initialization error: {0}")]
    Logging(String),
}

impl RollError {
    /// Returns true if the caller can drop the current frame and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RollError::InsufficientData { .. } | RollError::LengthMismatch { .. }
        )
    }
}
