//! # flowid-core
//!
//! Identifier resource pools for a flow-offload pipeline.
//!
//! Hands out and reclaims 16-bit identifiers per `(Direction, IdentifierType)`
//! pool. The `IdentManager` is the single source of truth for which
//! identifiers are live; it rejects out-of-range and already-freed
//! identifiers and serialises access per pool.
//!
//! ### Key Submodules:
//! - `alloc`: Bitmap allocator, locked per-pool wrapper and statistics
//! - `binding`: Pool table that exists while the manager is bound
//! - `manager`: Bind/unbind lifecycle and alloc/free routing
//! - `observer`: Notification seam for metrics exporters
//!
//! ```
//! use flowid_core::prelude::*;
//!
//! let config = PoolConfig::new().with_pool(
//!     Direction::Receive,
//!     IdentifierType::ProfFunc,
//!     PoolSpec::new(16),
//! );
//! let manager = IdentManager::new();
//! manager.bind(&config)?;
//! let id = manager.alloc(Direction::Receive, IdentifierType::ProfFunc)?;
//! manager.free(Direction::Receive, IdentifierType::ProfFunc, id)?;
//! manager.unbind()?;
//! # Ok::<(), IdentError>(())
//! ```

pub mod alloc;
pub mod binding;
pub mod error;
pub mod manager;
pub mod observer;
pub mod types;

pub mod prelude {
    pub use crate::alloc::*;
    pub use crate::binding::*;
    pub use crate::error::*;
    pub use crate::manager::*;
    pub use crate::observer::*;
    pub use crate::types::*;
}

pub use error::{IdentError, IdentResult};
pub use manager::IdentManager;
