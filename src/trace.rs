//! Paired x/y rolling windows backing one live plot trace.
//!
//! A plot keeps one [`RollingBuffer`] per axis and appends to both on every received
//! sample, so the two windows always stay aligned index-for-index. How NaN readings are
//! handled is an explicit [`NanPolicy`] chosen by the owner of the trace.

use crate::data::fft::{SpectralConverter, Spectrum};
use crate::data::ring_buffer::RollingBuffer;
use crate::error::{AppResult, RollError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Default per-axis window length of a plot trace.
pub const DEFAULT_TRACE_CAPACITY: usize = 128;

/// What to do with NaN readings before they enter the buffers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NanPolicy {
    /// Store NaN unchanged.
    #[default]
    Keep,
    /// Substitute the given value for NaN.
    Replace(f64),
}

impl NanPolicy {
    /// Applies the policy to one reading. Returns the value to store and whether it was replaced.
    pub fn apply(&self, value: f64) -> (f64, bool) {
        match self {
            NanPolicy::Replace(fill) if value.is_nan() => (*fill, true),
            _ => (value, false),
        }
    }
}

/// Two aligned rolling windows, one per axis.
#[derive(Clone)]
pub struct PlotTrace {
    x: RollingBuffer,
    y: RollingBuffer,
    policy: NanPolicy,
}

impl PlotTrace {
    /// Creates a trace whose axes each hold `capacity` samples.
    ///
    /// # Errors
    ///
    /// Returns [`RollError::InvalidConfiguration`] for a non-positive capacity.
    pub fn new<C>(capacity: C, policy: NanPolicy) -> AppResult<Self>
    where
        C: TryInto<usize> + Copy + fmt::Display,
    {
        Ok(Self {
            x: RollingBuffer::new(capacity)?,
            y: RollingBuffer::new(capacity)?,
            policy,
        })
    }

    /// Appends one `(x, y)` reading. Returns how many components the policy replaced.
    pub fn push(&mut self, x: f64, y: f64) -> usize {
        let (x, x_replaced) = self.policy.apply(x);
        let (y, y_replaced) = self.policy.apply(y);
        self.x.push(x);
        self.y.push(y);
        trace!(x, y, len = self.len(), "trace sample appended");
        usize::from(x_replaced) + usize::from(y_replaced)
    }

    /// Points in append order, skipping any pair with a NaN component.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.x
            .iter()
            .zip(self.y.iter())
            .filter(|(x, y)| !x.is_nan() && !y.is_nan())
            .map(|(x, y)| [x, y])
            .collect()
    }

    /// Spectrum of `y` over `x`, treating `x` as the time axis.
    ///
    /// NaN pairs are dropped first. `x` should be ascending, as it is for a time axis.
    ///
    /// # Errors
    ///
    /// [`RollError::InsufficientData`] if fewer than two clean points remain or the
    /// x range has zero span.
    pub fn spectrum(&self, converter: &mut SpectralConverter) -> AppResult<Spectrum> {
        let (times, values): (Vec<f64>, Vec<f64>) =
            self.points().into_iter().map(|[x, y]| (x, y)).unzip();
        if times.len() < 2 {
            return Err(RollError::InsufficientData {
                points: times.len(),
                reason: "trace has fewer than two finite points",
            });
        }
        converter.compute(&times, &values)
    }

    /// The x-axis window.
    pub fn x(&self) -> &RollingBuffer {
        &self.x
    }

    /// The y-axis window.
    pub fn y(&self) -> &RollingBuffer {
        &self.y
    }

    /// Active NaN policy.
    pub fn policy(&self) -> NanPolicy {
        self.policy
    }

    /// Number of stored readings.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if no readings are stored.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Per-axis capacity.
    pub fn capacity(&self) -> usize {
        self.x.capacity()
    }

    /// Drops all readings.
    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
    }
}

impl fmt::Debug for PlotTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotTrace")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_stay_aligned() {
        let mut t = PlotTrace::new(3, NanPolicy::Keep).unwrap();
        for i in 0..5 {
            let v = f64::from(i);
            t.push(v, v * 10.0);
        }
        assert_eq!(t.x().to_vec(), vec![2.0, 3.0, 4.0]);
        assert_eq!(t.y().to_vec(), vec![20.0, 30.0, 40.0]);
        assert_eq!(t.points(), vec![[2.0, 20.0], [3.0, 30.0], [4.0, 40.0]]);
    }

    #[test]
    fn test_keep_policy_filters_points_only() {
        let mut t = PlotTrace::new(4, NanPolicy::Keep).unwrap();
        assert_eq!(t.push(0.0, f64::NAN), 0);
        t.push(1.0, 1.0);
        assert_eq!(t.len(), 2);
        assert!(t.y().to_vec()[0].is_nan());
        assert_eq!(t.points(), vec![[1.0, 1.0]]);
    }

    #[test]
    fn test_replace_policy() {
        let mut t = PlotTrace::new(4, NanPolicy::Replace(0.0)).unwrap();
        assert_eq!(t.push(f64::NAN, f64::NAN), 2);
        assert_eq!(t.push(1.0, f64::NAN), 1);
        assert_eq!(t.points(), vec![[0.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn test_invalid_capacity() {
        assert!(matches!(
            PlotTrace::new(0, NanPolicy::Keep),
            Err(RollError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_spectrum_needs_two_clean_points() {
        let mut t = PlotTrace::new(4, NanPolicy::Keep).unwrap();
        t.push(0.0, 1.0);
        t.push(1.0, f64::NAN);
        let mut converter = SpectralConverter::new();
        let err = t.spectrum(&mut converter).unwrap_err();
        assert!(matches!(err, RollError::InsufficientData { points: 1, .. }));
    }

    #[test]
    fn test_spectrum_of_constant_trace() {
        let mut t = PlotTrace::new(8, NanPolicy::Keep).unwrap();
        for i in 0..8 {
            t.push(f64::from(i), 3.0);
        }
        let spectrum = t.spectrum(&mut SpectralConverter::new()).unwrap();
        assert_eq!(spectrum.len(), 8);
        assert!((spectrum.dc().unwrap() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_nan_policy_deserializes() {
        let keep: NanPolicy = serde_json::from_str("\"keep\"").unwrap();
        let replace: NanPolicy = serde_json::from_str("{\"replace\": 0.0}").unwrap();
        assert_eq!(keep, NanPolicy::Keep);
        assert_eq!(replace, NanPolicy::Replace(0.0));
    }
}
