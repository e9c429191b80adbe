//! Fixed-length delay line.
//!
//! A circular buffer with a single cursor. The slot under the cursor always
//! holds the sample pushed exactly [`len`](DelayLine::len) pushes ago, so
//! reading it and then overwriting it gives an integer delay of `len` samples
//! with one index and no modulo on the read side.
//!
//! # Memory
//!
//! The buffer is allocated once in [`DelayLine::new`] and never resized.
//! [`current`](DelayLine::current), [`push`](DelayLine::push) and
//! [`clear`](DelayLine::clear) do not allocate.

use alloc::vec;
use alloc::vec::Vec;

/// Integer delay line backed by a fixed ring buffer.
///
/// # Example
///
/// ```rust
/// use vocl_core::DelayLine;
///
/// let mut line = DelayLine::new(3).unwrap();
/// line.push(1.0);
/// line.push(0.0);
/// line.push(0.0);
/// // Three pushes later the first sample is back under the cursor.
/// assert_eq!(line.current(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    position: usize,
}

impl DelayLine {
    /// Creates a silent delay line of `len` samples.
    ///
    /// Returns `None` when `len` is 0; an empty ring has no slot to read.
    pub fn new(len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        Some(Self {
            buffer: vec![0.0; len],
            position: 0,
        })
    }

    /// The sample under the cursor, written `len()` pushes ago.
    #[inline]
    pub fn current(&self) -> f32 {
        self.buffer[self.position]
    }

    /// Overwrites the slot under the cursor and advances it.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.buffer[self.position] = sample;
        self.position += 1;
        if self.position == self.buffer.len() {
            self.position = 0;
        }
    }

    /// Zeroes the buffer and rewinds the cursor.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.position = 0;
    }

    /// Delay length in samples. Always at least 1.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always `false`; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Cursor index, in `0..len()`.
    pub fn position(&self) -> usize {
        self.position
    }
}
