//! ## flowid-core::alloc
//! **Identifier allocation primitives**
//!
//! ### Key Submodules:
//! - `bitmap`: Fixed-capacity lowest-free bitmap allocator
//! - `pool`: One locked bitmap per `(direction, type)` with base offset applied
//! - `stats`: Allocation counters shared by every pool of a manager

pub mod bitmap;
pub mod pool;
pub mod stats;

pub use bitmap::{BitmapAllocator, BitmapError};
pub use pool::{IdentifierPool, PoolInfo};
pub use stats::AllocStats;
