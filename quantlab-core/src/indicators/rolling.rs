//! Fixed-capacity ring buffer with a running sum.
//!
//! Backs every trailing-window calculation in the crate. Each `push` is O(1):
//! the new value overwrites the oldest slot once the buffer is full. The
//! running sum adds the new value first, then subtracts the evicted one.

#[derive(Debug, Clone)]
pub struct RollingWindow {
    buf: Vec<f64>,
    capacity: usize,
    /// Slot the next value is written to.
    head: usize,
    len: usize,
    sum: f64,
}

impl RollingWindow {
    /// Create an empty window holding at most `capacity` values.
    ///
    /// # Panics
    /// If `capacity` is zero. Callers validate window lengths before building one.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "rolling window capacity must be >= 1");
        Self {
            buf: vec![0.0; capacity],
            capacity,
            head: 0,
            len: 0,
            sum: 0.0,
        }
    }

    /// Push a value, returning the value it evicted once the window is full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let evicted = if self.len == self.capacity {
            Some(self.buf[self.head])
        } else {
            self.len += 1;
            None
        };

        self.buf[self.head] = value;
        self.head = (self.head + 1) % self.capacity;
        self.sum += value;
        if let Some(old) = evicted {
            self.sum -= old;
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Mean of the window, or `None` until it has been filled once.
    pub fn mean(&self) -> Option<f64> {
        self.is_full().then(|| self.sum / self.capacity as f64)
    }
}
