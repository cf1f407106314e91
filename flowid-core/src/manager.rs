//! ## flowid-core::manager
//! **Identifier pool manager**
//!
//! Routes alloc/free requests to the pool owned by the current binding.
//!
//! ### Locking:
//! - The binding slot sits behind an `RwLock`. alloc/free/search take it
//!   shared; bind/unbind take it exclusive, so no pool is dropped mid-scan.
//! - Each pool has its own `Mutex`, so unrelated pools never contend.
//!
//! Observer callbacks are delivered while the binding lock is still held, so
//! an unbind notification is never followed by a stale alloc/free one.
//!
//! Unbind is destructive: identifiers still allocated when it runs are simply
//! forgotten. They are not valid in any later binding.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::alloc::{AllocStats, PoolInfo};
use crate::binding::{Binding, ManagerState};
use crate::error::{IdentError, IdentResult};
use crate::observer::AllocObserver;
use crate::types::{Direction, Identifier, IdentifierType, PoolConfig};

/// Owns the pools of one device. Share it by reference or `Arc`.
pub struct IdentManager {
    binding: RwLock<Option<Binding>>,
    binds: AtomicU64,
    stats: AllocStats,
    observer: Option<Arc<dyn AllocObserver>>,
}

impl IdentManager {
    /// Creates an unbound manager.
    pub fn new() -> Self {
        Self {
            binding: RwLock::new(None),
            binds: AtomicU64::new(0),
            stats: AllocStats::new(),
            observer: None,
        }
    }

    /// Creates an unbound manager that reports activity to `observer`.
    pub fn with_observer(observer: Arc<dyn AllocObserver>) -> Self {
        Self::with_optional_observer(Some(observer))
    }

    /// Creates an unbound manager; `None` disables notifications.
    pub fn with_optional_observer(observer: Option<Arc<dyn AllocObserver>>) -> Self {
        Self {
            observer,
            ..Self::new()
        }
    }

    /// Builds one pool per configuration entry and enters the bound state.
    ///
    /// Fails with `AlreadyBound` if already bound and `InvalidConfig` if any
    /// entry is empty or does not fit the 16-bit identifier space. The state
    /// is unchanged on failure.
    #[instrument(level = "debug", skip_all, fields(pools = config.len()))]
    pub fn bind(&self, config: &PoolConfig) -> IdentResult<()> {
        let mut slot = self.binding.write();
        if slot.is_some() {
            return Err(IdentError::AlreadyBound);
        }

        let generation = self.binds.load(Ordering::Relaxed) + 1;
        let binding = Binding::new(generation, config).inspect_err(|err| {
            warn!(error = %err, "Rejected identifier pool configuration");
        })?;
        self.binds.store(generation, Ordering::Relaxed);

        info!(
            generation,
            pools = binding.pool_count(),
            "Identifier manager bound"
        );
        *slot = Some(binding);
        Ok(())
    }

    /// Drops every pool and returns to the unbound state.
    #[instrument(level = "debug", skip_all)]
    pub fn unbind(&self) -> IdentResult<()> {
        let mut slot = self.binding.write();
        let binding = slot.take().ok_or(IdentError::NotBound)?;

        let outstanding = binding.outstanding();
        if outstanding > 0 {
            warn!(
                generation = binding.generation(),
                outstanding, "Unbinding with identifiers still allocated"
            );
        }
        info!(generation = binding.generation(), "Identifier manager unbound");

        // Still exclusive: no alloc/free notification can trail this one.
        if let Some(observer) = &self.observer {
            observer.on_unbind(binding.generation());
        }
        Ok(())
    }

    /// Allocates the lowest free identifier of `(direction, ident_type)`.
    pub fn alloc(&self, direction: Direction, ident_type: IdentifierType) -> IdentResult<Identifier> {
        let slot = self.binding.read();
        let result = Self::bound(&slot)
            .and_then(|binding| binding.pool(direction, ident_type)?.allocate());

        match &result {
            Ok(id) => {
                self.stats.increment_allocations();
                debug!(%direction, %ident_type, id, "Allocated identifier");
                if let Some(observer) = &self.observer {
                    observer.on_alloc(direction, ident_type, *id);
                }
            }
            Err(err) => {
                if matches!(err, IdentError::PoolExhausted { .. }) {
                    self.stats.increment_exhausted();
                    warn!(%direction, %ident_type, "Identifier pool exhausted");
                }
                self.report_failure(direction, ident_type, err);
            }
        }
        result
    }

    /// Returns `id` to the pool of `(direction, ident_type)`.
    pub fn free(&self, direction: Direction, ident_type: IdentifierType, id: Identifier) -> IdentResult<()> {
        let slot = self.binding.read();
        let result = Self::bound(&slot)
            .and_then(|binding| binding.pool(direction, ident_type)?.release(id));

        match &result {
            Ok(()) => {
                self.stats.increment_releases();
                debug!(%direction, %ident_type, id, "Freed identifier");
                if let Some(observer) = &self.observer {
                    observer.on_free(direction, ident_type, id);
                }
            }
            Err(err) => {
                if matches!(
                    err,
                    IdentError::InvalidIdentifier { .. } | IdentError::DoubleFree { .. }
                ) {
                    self.stats.increment_rejected_releases();
                    warn!(%direction, %ident_type, id, error = %err, "Rejected identifier free");
                }
                self.report_failure(direction, ident_type, err);
            }
        }
        result
    }

    /// Reports whether `id` is currently allocated in `(direction, ident_type)`.
    pub fn search(&self, direction: Direction, ident_type: IdentifierType, id: Identifier) -> IdentResult<bool> {
        self.with_binding(|binding| binding.pool(direction, ident_type)?.is_allocated(id))
    }

    pub fn pool_info(&self, direction: Direction, ident_type: IdentifierType) -> IdentResult<PoolInfo> {
        self.with_binding(|binding| Ok(binding.pool(direction, ident_type)?.info()))
    }

    /// Snapshot of every pool in the current binding.
    pub fn usage(&self) -> IdentResult<Vec<PoolInfo>> {
        self.with_binding(|binding| Ok(binding.usage()))
    }

    pub fn state(&self) -> ManagerState {
        match self.binding.read().as_ref() {
            Some(binding) => ManagerState::Bound {
                generation: binding.generation(),
            },
            None => ManagerState::Unbound,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.binding.read().is_some()
    }

    /// Counters accumulated over the manager's lifetime.
    pub fn stats(&self) -> &AllocStats {
        &self.stats
    }

    fn with_binding<T>(&self, f: impl FnOnce(&Binding) -> IdentResult<T>) -> IdentResult<T> {
        f(Self::bound(&self.binding.read())?)
    }

    fn bound(slot: &Option<Binding>) -> IdentResult<&Binding> {
        slot.as_ref().ok_or(IdentError::NotBound)
    }

    fn report_failure(&self, direction: Direction, ident_type: IdentifierType, err: &IdentError) {
        if let Some(observer) = &self.observer {
            observer.on_failure(direction, ident_type, err);
        }
    }
}

impl Default for IdentManager {
    fn default() -> Self {
        Self::new()
    }
}
