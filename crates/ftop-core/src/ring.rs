// ── Fixed-capacity history ──
//
// Bounded FIFO used for per-metric sample history and for the decorative
// rolling window. Capacity is derived from panel geometry by the caller, so
// a resize discards everything rather than trying to rescale old samples.

use std::collections::VecDeque;
use std::time::Instant;

/// A clamped scalar reading taken at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub at: Instant,
}

impl Sample {
    /// A percentage reading, clamped to `[0, 100]`. NaN reads as 0.
    pub fn percent(value: f64, at: Instant) -> Self {
        let value = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 100.0)
        };
        Self { value, at }
    }

    /// A byte-rate reading, clamped to `>= 0`. NaN reads as 0.
    pub fn rate(value: f64, at: Instant) -> Self {
        let value = if value.is_nan() { 0.0 } else { value.max(0.0) };
        Self { value, at }
    }
}

/// Most recent `capacity` items in chronological order.
#[derive(Debug, Clone)]
pub struct RingHistory<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RingHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an item, evicting the oldest one when full.
    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    /// Drop all contents and start over with a new capacity.
    pub fn resize(&mut self, capacity: usize) {
        self.items = VecDeque::with_capacity(capacity);
        self.capacity = capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }
}

impl<T: Clone> RingHistory<T> {
    /// Contents oldest to newest, possibly empty.
    pub fn values(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl RingHistory<Sample> {
    /// Raw sample values, oldest to newest. Feeds the sparkline encoder.
    pub fn scalars(&self) -> Vec<f64> {
        self.items.iter().map(|s| s.value).collect()
    }

    /// Largest value currently held, or 0 when empty.
    pub fn peak(&self) -> f64 {
        self.items.iter().map(|s| s.value).fold(0.0, f64::max)
    }
}
