//! ## flowid-core::alloc::pool
//! **Per-(direction, type) identifier pool**
//!
//! Wraps a `BitmapAllocator` behind its own lock and translates between
//! bitmap slot indices and identifier values (`base + index`).
use parking_lot::Mutex;
use serde::Serialize;

use super::bitmap::{BitmapAllocator, BitmapError};
use crate::error::{IdentError, IdentResult};
use crate::types::{Direction, Identifier, IdentifierType, PoolSpec};

/// Point-in-time view of one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolInfo {
    pub direction: Direction,
    pub ident_type: IdentifierType,
    pub base: Identifier,
    pub capacity: u32,
    pub in_use: u32,
}

impl PoolInfo {
    pub fn available(&self) -> u32 {
        self.capacity - self.in_use
    }
}

#[derive(Debug)]
pub struct IdentifierPool {
    direction: Direction,
    ident_type: IdentifierType,
    base: Identifier,
    capacity: usize,
    bitmap: Mutex<BitmapAllocator>,
}

impl IdentifierPool {
    /// Builds an empty pool. `spec` must already be validated.
    pub fn new(direction: Direction, ident_type: IdentifierType, spec: PoolSpec) -> Self {
        Self {
            direction,
            ident_type,
            base: spec.base,
            capacity: spec.capacity as usize,
            bitmap: Mutex::new(BitmapAllocator::new(spec.capacity as usize)),
        }
    }

    /// Allocates the lowest free identifier.
    pub fn allocate(&self) -> IdentResult<Identifier> {
        match self.bitmap.lock().allocate() {
            // base + index < 2^16 holds for validated specs
            Ok(index) => Ok(self.base + index as Identifier),
            Err(_) => Err(IdentError::PoolExhausted {
                direction: self.direction,
                ident_type: self.ident_type,
                capacity: self.capacity as u32,
            }),
        }
    }

    /// Returns `id` to the pool.
    pub fn release(&self, id: Identifier) -> IdentResult<()> {
        let index = self.index_of(id)?;
        self.bitmap.lock().release(index).map_err(|err| match err {
            BitmapError::NotAllocated(_) => IdentError::DoubleFree {
                direction: self.direction,
                ident_type: self.ident_type,
                id,
            },
            BitmapError::OutOfRange(_) | BitmapError::Exhausted => self.invalid(id),
        })
    }

    /// Returns whether `id` is currently allocated.
    pub fn is_allocated(&self, id: Identifier) -> IdentResult<bool> {
        let index = self.index_of(id)?;
        Ok(self.bitmap.lock().is_allocated(index))
    }

    pub fn info(&self) -> PoolInfo {
        let bitmap = self.bitmap.lock();
        PoolInfo {
            direction: self.direction,
            ident_type: self.ident_type,
            base: self.base,
            capacity: bitmap.capacity() as u32,
            in_use: bitmap.in_use_count() as u32,
        }
    }

    pub fn in_use_count(&self) -> usize {
        self.bitmap.lock().in_use_count()
    }

    fn index_of(&self, id: Identifier) -> IdentResult<usize> {
        let index = id.checked_sub(self.base).ok_or_else(|| self.invalid(id))? as usize;
        if index >= self.capacity {
            return Err(self.invalid(id));
        }
        Ok(index)
    }

    fn invalid(&self, id: Identifier) -> IdentError {
        IdentError::InvalidIdentifier {
            direction: self.direction,
            ident_type: self.ident_type,
            id,
        }
    }
}
