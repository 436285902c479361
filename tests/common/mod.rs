//! Common test utilities for live_roll integration tests
//!
//! This module provides reusable test helpers for:
//! - Floating point comparisons with explicit tolerances
//! - Deterministic signal generators (uniform and jittered time axes)

#![allow(dead_code)] // Not every test file uses every helper

use std::f64::consts::PI;

/// Tolerance levels for numeric assertions.
#[derive(Debug, Clone, Copy)]
pub enum Tolerance {
    /// Bit-for-bit or within a few ulps of arithmetic noise
    Exact,
    /// Accumulated FFT rounding over a few hundred points
    Numeric,
}

impl Tolerance {
    /// Absolute tolerance for this level
    pub fn epsilon(&self) -> f64 {
        match self {
            Tolerance::Exact => 1e-12,
            Tolerance::Numeric => 1e-9,
        }
    }
}

/// Assert `actual` is within `tolerance` of `expected`.
pub fn assert_close(actual: f64, expected: f64, tolerance: Tolerance) {
    let eps = tolerance.epsilon();
    assert!(
        (actual - expected).abs() <= eps,
        "expected {expected} ± {eps}, got {actual}"
    );
}

/// `n` evenly spaced stamps at sample rate `fs`, starting at zero.
pub fn uniform_times(n: usize, fs: f64) -> Vec<f64> {
    (0..n).map(|i| i as f64 / fs).collect()
}

/// `n` ascending stamps at roughly `fs`, with a deterministic jitter of up to 20% of
/// a sample period. First and last stamps are not jittered.
pub fn jittered_times(n: usize, fs: f64) -> Vec<f64> {
    let dt = 1.0 / fs;
    (0..n)
        .map(|i| {
            let base = i as f64 * dt;
            if i == 0 || i == n - 1 {
                base
            } else {
                base + 0.2 * dt * (i as f64 * 1.7).sin()
            }
        })
        .collect()
}

/// Sine of frequency `f` and unit amplitude evaluated at `times`.
pub fn sine(times: &[f64], f: f64) -> Vec<f64> {
    times.iter().map(|t| (2.0 * PI * f * t).sin()).collect()
}
