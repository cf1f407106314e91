//! Hook for exporting pool activity (metrics, audit) without the core knowing
//! about the exporter.

use crate::error::IdentError;
use crate::types::{Direction, Identifier, IdentifierType};

/// Receives notifications from an `IdentManager`. All methods default to no-ops.
///
/// Callbacks run while the manager holds its binding lock (shared for
/// alloc/free, exclusive for unbind). They must be quick and must not call
/// back into the manager.
pub trait AllocObserver: Send + Sync {
    fn on_alloc(&self, _direction: Direction, _ident_type: IdentifierType, _id: Identifier) {}

    fn on_free(&self, _direction: Direction, _ident_type: IdentifierType, _id: Identifier) {}

    /// An alloc or free was refused.
    fn on_failure(&self, _direction: Direction, _ident_type: IdentifierType, _error: &IdentError) {}

    /// A binding was torn down; every pool's in-use count is now zero.
    fn on_unbind(&self, _generation: u64) {}
}
