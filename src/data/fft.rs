//! Time-domain to frequency-domain conversion for irregularly sampled signals.
//!
//! Live sensor samples rarely arrive on a perfect clock. Before a discrete Fourier
//! transform can be applied, the signal is linearly resampled onto a uniform time grid
//! spanning the original samples, keeping the same number of points. The transform is
//! unnormalized and the frequency bins follow the usual FFT ordering: DC first, then
//! ascending positive frequencies, then the mirrored negative frequencies.
//!
//! Only magnitudes are returned. Phase is discarded.
//!
//! # Example
//!
//! ```
//! use live_roll::data::fft::compute_spectrum;
//!
//! let spectrum = compute_spectrum(&[0.0, 1.0, 2.0, 3.0], &[0.0; 4]).unwrap();
//! assert_eq!(spectrum.frequencies, vec![0.0, 0.25, -0.5, -0.25]);
//! assert_eq!(spectrum.magnitudes, vec![0.0; 4]);
//! ```

use crate::error::{AppResult, RollError};
use num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Represents a single frequency bin in a spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBin {
    /// Signed frequency in inverse time units of the input stamps
    pub frequency: f64,
    /// Absolute value of the complex bin
    pub magnitude: f64,
}

/// Paired frequency and magnitude arrays produced by one conversion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Spectrum {
    /// Bin frequencies in FFT order
    pub frequencies: Vec<f64>,
    /// Bin magnitudes, same length as `frequencies`
    pub magnitudes: Vec<f64>,
}

impl Spectrum {
    /// Number of bins.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Returns true if the spectrum has no bins.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Iterates over the bins in FFT order.
    pub fn bins(&self) -> impl Iterator<Item = FrequencyBin> + '_ {
        self.frequencies
            .iter()
            .zip(&self.magnitudes)
            .map(|(&frequency, &magnitude)| FrequencyBin {
                frequency,
                magnitude,
            })
    }

    /// Magnitude of the zero-frequency bin.
    pub fn dc(&self) -> Option<f64> {
        self.magnitudes.first().copied()
    }

    /// Strongest bin with a strictly positive frequency.
    ///
    /// NaN magnitudes are skipped. Returns `None` if no such bin exists.
    pub fn peak(&self) -> Option<FrequencyBin> {
        self.bins()
            .filter(|bin| bin.frequency > 0.0 && !bin.magnitude.is_nan())
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
    }

    /// Bins with non-negative frequency, ascending. Suitable for plotting.
    pub fn one_sided(&self) -> Vec<FrequencyBin> {
        self.bins().filter(|bin| bin.frequency >= 0.0).collect()
    }

    /// Splits into `(frequencies, magnitudes)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.frequencies, self.magnitudes)
    }
}

/// Window applied to the resampled signal before the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    /// No weighting. Matches a plain DFT of the resampled values.
    #[default]
    Rectangular,
    /// Hann window, reduces leakage between neighbouring bins.
    Hann,
}

impl Window {
    /// Weight for sample `i` of a window of length `len`.
    pub fn weight(&self, i: usize, len: usize) -> f64 {
        match self {
            Window::Rectangular => 1.0,
            Window::Hann if len > 1 => {
                0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / (len - 1) as f64).cos())
            }
            Window::Hann => 1.0,
        }
    }
}

/// Frequency of every bin of an `n`-point transform with sample spacing `dt`.
///
/// Follows the standard `fftfreq` layout: `[0, 1, ..., ceil(n/2) - 1, -floor(n/2), ..., -1]`
/// scaled by `1 / (n * dt)`.
///
/// # Errors
///
/// [`RollError::InsufficientData`] unless `dt` is finite and positive.
pub fn fft_frequencies(n: usize, dt: f64) -> AppResult<Vec<f64>> {
    check_spacing(n, dt)?;
    if n == 0 {
        return Ok(Vec::new());
    }
    let resolution = 1.0 / (n as f64 * dt);
    let positive = n.div_ceil(2);
    Ok((0..n)
        .map(|i| {
            let k = if i < positive {
                i as f64
            } else {
                i as f64 - n as f64
            };
            k * resolution
        })
        .collect())
}

/// Resamples `(times, values)` onto `num_points` evenly spaced stamps.
///
/// The grid spans `[min(times), max(times)]` inclusive. Values are linearly
/// interpolated and clamp to the end samples outside the original range. `times` is
/// expected to be sorted ascending.
///
/// # Errors
///
/// - [`RollError::LengthMismatch`] if the sequences differ in length.
/// - [`RollError::InsufficientData`] for fewer than two samples, `num_points < 2`,
///   or a time axis with zero span.
pub fn resample_uniform(
    times: &[f64],
    values: &[f64],
    num_points: usize,
) -> AppResult<(Vec<f64>, Vec<f64>)> {
    check_signal(times, values)?;
    if num_points < 2 {
        return Err(RollError::InsufficientData {
            points: num_points,
            reason: "uniform grid needs at least two points",
        });
    }

    let t_min = times.iter().copied().fold(f64::INFINITY, f64::min);
    let t_max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Also rejects an all-NaN time axis.
    if !(t_max > t_min) {
        return Err(RollError::InsufficientData {
            points: times.len(),
            reason: "time axis has zero span",
        });
    }

    let step = (t_max - t_min) / (num_points - 1) as f64;
    let mut uniform_times: Vec<f64> = (0..num_points).map(|i| t_min + i as f64 * step).collect();
    if let Some(last) = uniform_times.last_mut() {
        *last = t_max;
    }

    let uniform_values = uniform_times
        .iter()
        .map(|&t| interpolate(t, times, values))
        .collect();

    Ok((uniform_times, uniform_values))
}

/// Computes the magnitude spectrum of an irregularly sampled signal.
///
/// Convenience wrapper around a fresh [`SpectralConverter`] with a rectangular window.
///
/// # Errors
///
/// Same as [`resample_uniform`].
pub fn compute_spectrum(times: &[f64], values: &[f64]) -> AppResult<Spectrum> {
    SpectralConverter::new().compute(times, values)
}

/// Reusable converter that caches FFT plans between calls.
///
/// Plot refreshes usually convert windows of the same length over and over, so
/// keeping the planner around avoids re-planning every frame.
pub struct SpectralConverter {
    planner: FftPlanner<f64>,
    window: Window,
}

impl SpectralConverter {
    /// Creates a converter with a rectangular window.
    pub fn new() -> Self {
        Self::with_window(Window::Rectangular)
    }

    /// Creates a converter applying `window` before each transform.
    pub fn with_window(window: Window) -> Self {
        Self {
            planner: FftPlanner::new(),
            window,
        }
    }

    /// Window in use.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Resamples `(times, values)` to a uniform grid of the same length and transforms it.
    ///
    /// # Errors
    ///
    /// Same as [`resample_uniform`].
    pub fn compute(&mut self, times: &[f64], values: &[f64]) -> AppResult<Spectrum> {
        let (uniform_times, uniform_values) = resample_uniform(times, values, times.len())?;
        let dt = uniform_times[1] - uniform_times[0];
        self.transform_uniform(&uniform_values, dt)
    }

    /// Transforms samples that are already evenly spaced by `dt`.
    ///
    /// # Errors
    ///
    /// [`RollError::InsufficientData`] unless `dt` is finite and positive.
    pub fn transform_uniform(&mut self, values: &[f64], dt: f64) -> AppResult<Spectrum> {
        let n = values.len();
        check_spacing(n, dt)?;
        if n == 0 {
            return Ok(Spectrum::default());
        }

        let mut buffer: Vec<Complex<f64>> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Complex::new(v * self.window.weight(i, n), 0.0))
            .collect();

        let fft = self.planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        let spectrum = Spectrum {
            frequencies: fft_frequencies(n, dt)?,
            magnitudes: buffer.iter().map(|c| c.norm()).collect(),
        };
        debug!(
            points = n,
            dt,
            window = ?self.window,
            dc = spectrum.dc(),
            "computed spectrum"
        );
        Ok(spectrum)
    }
}

impl Default for SpectralConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SpectralConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralConverter")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

fn check_signal(times: &[f64], values: &[f64]) -> AppResult<()> {
    if times.len() != values.len() {
        return Err(RollError::LengthMismatch {
            times: times.len(),
            values: values.len(),
        });
    }
    if times.len() < 2 {
        return Err(RollError::InsufficientData {
            points: times.len(),
            reason: "need at least two samples",
        });
    }
    Ok(())
}

fn check_spacing(n: usize, dt: f64) -> AppResult<()> {
    if dt > 0.0 && dt.is_finite() {
        return Ok(());
    }
    Err(RollError::InsufficientData {
        points: n,
        reason: "sample spacing must be finite and positive",
    })
}

/// Piecewise-linear lookup of `t` in sorted `times`, clamped at both ends.
fn interpolate(t: f64, times: &[f64], values: &[f64]) -> f64 {
    // Index of the first stamp strictly after `t`.
    let upper = times.partition_point(|&x| x <= t);
    if upper == 0 {
        return values[0];
    }
    if upper == times.len() {
        return values[times.len() - 1];
    }

    let lower = upper - 1;
    let (t0, t1) = (times[lower], times[upper]);
    let (v0, v1) = (values[lower], values[upper]);
    // Exact hits return the stored sample so a non-finite neighbour cannot leak in.
    if t == t0 || v0 == v1 {
        return v0;
    }
    v0 + (t - t0) * (v1 - v0) / (t1 - t0)
}
