//! Sample storage and spectral processing.

pub mod fft;
pub mod ring_buffer;
