//! Fixed-capacity FIFO delay line.
//!
//! The sliding transform needs, for each new sample `x[t]`, the sample that
//! is leaving its window: `x[t - N]`. [`DelayLine`] supplies it with a ring
//! buffer of capacity `N` that is primed with zeros, so the lookback is
//! silence until `N` real samples have gone in.
//!
//! # Discipline
//!
//! Call [`DelayLine::get`] then [`DelayLine::put`], exactly once each per
//! incoming sample. With a primed line of capacity `N` the value returned by
//! `get` is then always the sample passed to `put` `N` calls earlier.
//!
//! # Memory
//!
//! The buffer is heap-allocated during construction but never reallocates.
//! `get` and `put` do not allocate or lock.
//!
//! # Example
//!
//! ```rust
//! use slidecq_core::DelayLine;
//!
//! let mut line = DelayLine::new(3);
//! let mut out = Vec::new();
//! for x in [1.0, 2.0, 3.0, 4.0, 5.0] {
//!     out.push(line.get());
//!     line.put(x);
//! }
//! assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0, 2.0]);
//! ```

/// Ring buffer of samples with overwrite-on-full semantics.
#[derive(Debug, Clone)]
pub struct DelayLine {
    /// Circular buffer storage
    buffer: Vec<f64>,
    /// Next write position
    head: usize,
    /// Oldest retained sample
    tail: usize,
    /// Distinguishes full from empty when `head == tail`
    full: bool,
}

impl DelayLine {
    /// Creates a delay line holding `capacity` zeros.
    ///
    /// This is the state the sliding transform expects: the first
    /// `capacity` reads return 0.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        let mut line = Self::with_capacity_empty(capacity);
        line.prime();
        line
    }

    /// Creates an empty delay line.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn with_capacity_empty(capacity: usize) -> Self {
        assert!(capacity > 0, "Delay line capacity must be > 0");

        Self {
            buffer: vec![0.0; capacity],
            head: 0,
            tail: 0,
            full: false,
        }
    }

    /// Writes a sample at the head, evicting the oldest sample if full.
    #[inline]
    pub fn put(&mut self, sample: f64) {
        let capacity = self.buffer.len();
        self.buffer[self.head] = sample;

        if self.full {
            self.tail = (self.tail + 1) % capacity;
        }

        self.head = (self.head + 1) % capacity;
        self.full = self.head == self.tail;
    }

    /// Removes and returns the oldest sample, or 0 if the line is empty.
    #[inline]
    pub fn get(&mut self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }

        let sample = self.buffer[self.tail];
        self.full = false;
        self.tail = (self.tail + 1) % self.buffer.len();
        sample
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        let capacity = self.buffer.len();
        if self.full {
            capacity
        } else if self.head >= self.tail {
            self.head - self.tail
        } else {
            capacity + self.head - self.tail
        }
    }

    /// Maximum number of retained samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// True when no samples are retained.
    pub fn is_empty(&self) -> bool {
        !self.full && self.head == self.tail
    }

    /// True when `len() == capacity()`.
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Discards every retained sample.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.head = 0;
        self.tail = 0;
        self.full = false;
    }

    /// Appends zeros until the line is full.
    pub fn prime(&mut self) {
        while !self.full {
            self.put(0.0);
        }
    }
}
