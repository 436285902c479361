//! Core library for live sensor plots.
//!
//! This library contains the toolkit-independent numeric pieces behind a live plot:
//! fixed-capacity rolling windows that always expose the most recent samples, and a
//! converter that turns an irregularly sampled signal into a magnitude spectrum. A
//! renderer owns the windows, feeds them from its data source and reads them back on
//! every paint.
//!
//! - [`data::ring_buffer`]: [`RollingBuffer`] and its lock-guarded [`SharedRollingBuffer`]
//! - [`data::fft`]: uniform resampling and [`compute_spectrum`]
//! - [`trace`]: paired x/y windows with an explicit NaN policy
//! - [`feed`]: Tokio tasks draining a sample channel into windows
//! - [`config`] and [`logging`]: Figment configuration and `tracing` setup

pub mod config;
pub mod data;
pub mod error;
pub mod feed;
pub mod logging;
pub mod trace;

pub use data::fft::{compute_spectrum, resample_uniform, SpectralConverter, Spectrum};
pub use data::ring_buffer::{RollingBuffer, SharedRollingBuffer};
pub use error::{AppResult, RollError};
