//! Background ingestion of live samples into rolling windows.
//!
//! Samples arrive from an external subscription at an irregular rate, typically on a
//! different task than the one that renders. The feed tasks below drain a Tokio
//! `mpsc` channel and append each sample under the owning lock, so the renderer can
//! read a consistent window at any time.
//!
//! # Data Flow
//!
//! ```text
//! subscriber --[Sample]--> mpsc::channel ---> feed task ---> Mutex<PlotTrace> ---> renderer
//! ```
//!
//! A feed finishes once every sender is dropped and reports what it ingested.

use crate::data::ring_buffer::SharedRollingBuffer;
use crate::trace::PlotTrace;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn, Instrument};

/// One reading delivered by the data source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Horizontal coordinate, usually a time stamp
    pub x: f64,
    /// Measured value
    pub y: f64,
}

impl From<(f64, f64)> for Sample {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Counters reported when a feed task finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Samples taken off the channel
    pub received: usize,
    /// Components substituted by the trace's NaN policy
    pub replaced_nan: usize,
}

/// Spawns a task appending every [`Sample`] from `rx` to `trace`.
///
/// The task inherits the caller's tracing span. Must be called from within a Tokio runtime.
pub fn spawn_trace_feed(
    mut rx: mpsc::Receiver<Sample>,
    trace: Arc<Mutex<PlotTrace>>,
) -> JoinHandle<FeedStats> {
    tokio::spawn(async move {
        info!("trace feed started");
        let mut stats = FeedStats::default();

        while let Some(sample) = rx.recv().await {
            stats.received += 1;
            stats.replaced_nan += trace.lock().push(sample.x, sample.y);
        }

        if stats.replaced_nan > 0 {
            warn!(
                replaced = stats.replaced_nan,
                "NaN readings were substituted by the trace policy"
            );
        }
        info!(received = stats.received, "trace feed finished");
        stats
    }
    .in_current_span())
}

/// Spawns a task appending every value from `rx` to a single shared buffer.
///
/// NaN values are stored unchanged. Must be called from within a Tokio runtime.
pub fn spawn_buffer_feed(
    mut rx: mpsc::Receiver<f64>,
    buffer: SharedRollingBuffer,
) -> JoinHandle<FeedStats> {
    tokio::spawn(async move {
        debug!(capacity = buffer.capacity(), "buffer feed started");
        let mut stats = FeedStats::default();

        while let Some(value) = rx.recv().await {
            stats.received += 1;
            buffer.push(value);
        }

        debug!(received = stats.received, "buffer feed finished");
        stats
    }
    .in_current_span())
}
