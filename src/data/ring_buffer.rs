//! Fixed-capacity rolling window over a stream of scalar samples.
//!
//! A [`RollingBuffer`] always holds the most recent `capacity` samples. Appending to a
//! full buffer evicts the oldest sample before the new one takes the newest slot, so
//! the exported window slides forward one sample at a time.
//!
//! # Architecture
//!
//! The buffer is a circular array: a backing `Vec<f64>` that grows up to `capacity`
//! and a `head` index pointing at the oldest sample once the buffer has wrapped.
//! Appends are O(1); exporting the window is O(n) and always oldest-first.
//!
//! # Thread Safety
//!
//! `RollingBuffer` itself requires `&mut self` to append. When the data-arrival path
//! runs on a different thread from the renderer, wrap it in a [`SharedRollingBuffer`],
//! which serializes every call behind a single mutex.

use crate::error::{AppResult, RollError};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Oldest-first iterator over the samples of a [`RollingBuffer`].
pub type Iter<'a> =
    std::iter::Copied<std::iter::Chain<std::slice::Iter<'a, f64>, std::slice::Iter<'a, f64>>>;

/// A bounded, order-preserving window of `f64` samples.
///
/// # Example
///
/// ```
/// use live_roll::data::ring_buffer::RollingBuffer;
///
/// let mut roll = RollingBuffer::new(3).unwrap();
/// for v in [1.0, 2.0, 3.0, 4.0] {
///     roll.push(v);
/// }
/// assert_eq!(roll.to_vec(), vec![2.0, 3.0, 4.0]);
/// assert_eq!(roll.len(), 3);
/// ```
#[derive(Clone)]
pub struct RollingBuffer {
    /// Backing storage, never longer than `capacity`
    storage: Vec<f64>,

    /// Maximum number of samples retained
    capacity: usize,

    /// Index of the oldest sample (non-zero only after the buffer has wrapped)
    head: usize,
}

impl RollingBuffer {
    /// Creates an empty buffer holding at most `capacity` samples.
    ///
    /// Any integer type is accepted so that signed values read from configuration or
    /// user input are checked here rather than silently wrapped.
    ///
    /// # Errors
    ///
    /// Returns [`RollError::InvalidConfiguration`] if `capacity` is zero or negative.
    pub fn new<C>(capacity: C) -> AppResult<Self>
    where
        C: TryInto<usize> + Copy + fmt::Display,
    {
        let capacity = match capacity.try_into() {
            Ok(cap) if cap > 0 => cap,
            _ => {
                return Err(RollError::InvalidConfiguration(format!(
                    "rolling buffer capacity must be positive, got {capacity}"
                )))
            }
        };

        Ok(Self {
            storage: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        })
    }

    /// Appends a sample, evicting the oldest one first if the buffer is full.
    ///
    /// NaN is stored as-is; filtering is the caller's policy.
    pub fn push(&mut self, value: f64) {
        if self.storage.len() < self.capacity {
            self.storage.push(value);
            return;
        }

        // Slot `head` holds the oldest sample: overwrite it, then the next slot becomes oldest.
        trace!(evicted = self.storage[self.head], value, "rolling buffer full, evicting oldest");
        self.storage[self.head] = value;
        self.head = (self.head + 1) % self.capacity;
    }

    /// Appends every sample from `values` in order.
    pub fn extend_from_slice(&mut self, values: &[f64]) {
        for &value in values {
            self.push(value);
        }
    }

    /// Copies the current window into a new vector, oldest first.
    pub fn to_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.storage.len());
        let (older, newer) = self.as_slices();
        out.extend_from_slice(older);
        out.extend_from_slice(newer);
        out
    }

    /// Returns the window as two contiguous slices, oldest part first.
    ///
    /// The second slice is empty until the buffer has wrapped at least once.
    pub fn as_slices(&self) -> (&[f64], &[f64]) {
        let (newer, older) = self.storage.split_at(self.head);
        (older, newer)
    }

    /// Iterates over the samples from oldest to newest without copying.
    pub fn iter(&self) -> Iter<'_> {
        let (older, newer) = self.as_slices();
        older.iter().chain(newer.iter()).copied()
    }

    /// The most recently appended sample.
    pub fn latest(&self) -> Option<f64> {
        if self.storage.is_empty() {
            return None;
        }
        let idx = (self.head + self.storage.len() - 1) % self.storage.len();
        Some(self.storage[idx])
    }

    /// Current occupancy.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if no samples have been appended since construction or `clear`.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns true once occupancy has reached capacity.
    pub fn is_full(&self) -> bool {
        self.storage.len() == self.capacity
    }

    /// Maximum occupancy, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every sample while keeping the capacity.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.head = 0;
    }
}

// Equal when capacity and window contents match, regardless of where the window wrapped.
impl PartialEq for RollingBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity
            && self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Debug for RollingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingBuffer")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("samples", &self.to_vec())
            .finish()
    }
}

impl fmt::Display for RollingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RollingBuffer({}/{})[", self.len(), self.capacity)?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

impl<'a> IntoIterator for &'a RollingBuffer {
    type Item = f64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<f64> for RollingBuffer {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

/// A [`RollingBuffer`] shared between a producer and one or more readers.
///
/// Every method takes the internal lock exactly once, so appends and exports on the
/// same instance never interleave. Cloning is cheap and yields another handle to the
/// same buffer.
#[derive(Clone)]
pub struct SharedRollingBuffer {
    inner: Arc<Mutex<RollingBuffer>>,
}

impl SharedRollingBuffer {
    /// Creates a shared buffer with the given capacity.
    ///
    /// # Errors
    ///
    /// Same as [`RollingBuffer::new`].
    pub fn new<C>(capacity: C) -> AppResult<Self>
    where
        C: TryInto<usize> + Copy + fmt::Display,
    {
        Ok(Self::from(RollingBuffer::new(capacity)?))
    }

    /// Appends a sample under the lock.
    pub fn push(&self, value: f64) {
        self.inner.lock().push(value);
    }

    /// Appends a batch of samples under a single lock acquisition.
    pub fn extend_from_slice(&self, values: &[f64]) {
        self.inner.lock().extend_from_slice(values);
    }

    /// Copies the current window, oldest first.
    pub fn to_vec(&self) -> Vec<f64> {
        self.inner.lock().to_vec()
    }

    /// Current occupancy.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Maximum occupancy.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Runs `f` against the buffer while holding the lock.
    ///
    /// Lets a renderer walk the window without an intermediate copy. Keep `f` short:
    /// the producer is blocked for its duration.
    pub fn with<R>(&self, f: impl FnOnce(&RollingBuffer) -> R) -> R {
        f(&self.inner.lock())
    }
}

impl From<RollingBuffer> for SharedRollingBuffer {
    fn from(buffer: RollingBuffer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }
}

impl fmt::Debug for SharedRollingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buffer = self.inner.lock();
        f.debug_struct("SharedRollingBuffer")
            .field("capacity", &buffer.capacity())
            .field("len", &buffer.len())
            .finish()
    }
}
