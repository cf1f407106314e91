//! ## flowid-core::alloc::bitmap
//! **Fixed-capacity bitmap allocator**
//!
//! One bit per identifier slot:
//! - `1` → allocated
//! - `0` → free
//!
//! Allocation always returns the lowest free index, which keeps allocation
//! order reproducible. Bits past `capacity` in the last word are pre-set so
//! the scan never returns them.

use thiserror::Error;

const WORD_BITS: usize = u64::BITS as usize;

/// Bitmap allocator error conditions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapError {
    #[error("No free slot left")]
    Exhausted,
    #[error("Slot {0} is outside the bitmap")]
    OutOfRange(usize),
    #[error("Slot {0} is not allocated")]
    NotAllocated(usize),
}

#[derive(Debug)]
pub struct BitmapAllocator {
    words: Box<[u64]>,
    capacity: usize,
    in_use: usize,
    /// Every word below `hint` is full.
    hint: usize,
}

impl BitmapAllocator {
    /// Creates an allocator with `capacity` free slots.
    ///
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        let len = capacity.div_ceil(WORD_BITS);
        let mut words = vec![0u64; len].into_boxed_slice();

        let tail = capacity % WORD_BITS;
        if tail != 0 {
            words[len - 1] = u64::MAX << tail;
        }

        Self {
            words,
            capacity,
            in_use: 0,
            hint: 0,
        }
    }

    /// Marks the lowest free slot allocated and returns its index.
    pub fn allocate(&mut self) -> Result<usize, BitmapError> {
        for idx in self.hint..self.words.len() {
            let word = self.words[idx];
            if word != u64::MAX {
                let bit = word.trailing_ones() as usize;
                self.words[idx] |= 1 << bit;
                self.hint = idx;
                self.in_use += 1;
                return Ok(idx * WORD_BITS + bit);
            }
        }
        self.hint = self.words.len();
        Err(BitmapError::Exhausted)
    }

    /// Clears the bit for `index`.
    pub fn release(&mut self, index: usize) -> Result<(), BitmapError> {
        if index >= self.capacity {
            return Err(BitmapError::OutOfRange(index));
        }
        let (idx, mask) = Self::locate(index);
        if self.words[idx] & mask == 0 {
            return Err(BitmapError::NotAllocated(index));
        }
        self.words[idx] &= !mask;
        self.in_use -= 1;
        if idx < self.hint {
            self.hint = idx;
        }
        Ok(())
    }

    /// Returns whether `index` is currently allocated. Out-of-range indices
    /// are never allocated.
    pub fn is_allocated(&self, index: usize) -> bool {
        if index >= self.capacity {
            return false;
        }
        let (idx, mask) = Self::locate(index);
        self.words[idx] & mask != 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use_count(&self) -> usize {
        self.in_use
    }

    pub fn is_full(&self) -> bool {
        self.in_use == self.capacity
    }

    #[inline]
    fn locate(index: usize) -> (usize, u64) {
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }
}
