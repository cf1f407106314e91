//! ## flowid-core::binding
//! **Bound pool table**
//!
//! A `Binding` exists exactly while the manager is bound. It owns every pool
//! built from the configuration and is dropped wholesale on unbind.

use std::collections::HashMap;

use crate::alloc::{IdentifierPool, PoolInfo};
use crate::error::{IdentError, IdentResult};
use crate::types::{Direction, IdentifierType, PoolConfig, PoolKey};

/// Lifecycle state reported by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    Unbound,
    /// Bound, with the generation of the current binding (first bind is 1).
    Bound { generation: u64 },
}

impl ManagerState {
    pub fn is_bound(&self) -> bool {
        matches!(self, ManagerState::Bound { .. })
    }
}

#[derive(Debug)]
pub struct Binding {
    generation: u64,
    pools: HashMap<PoolKey, IdentifierPool>,
}

impl Binding {
    /// Validates `config` and builds one empty pool per entry.
    pub fn new(generation: u64, config: &PoolConfig) -> IdentResult<Self> {
        config.validate()?;

        let pools = config
            .iter()
            .map(|(&(direction, ident_type), &spec)| {
                (
                    (direction, ident_type),
                    IdentifierPool::new(direction, ident_type, spec),
                )
            })
            .collect();

        Ok(Self { generation, pools })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pool(&self, direction: Direction, ident_type: IdentifierType) -> IdentResult<&IdentifierPool> {
        self.pools
            .get(&(direction, ident_type))
            .ok_or(IdentError::UnknownPool {
                direction,
                ident_type,
            })
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Identifiers still allocated across all pools.
    pub fn outstanding(&self) -> usize {
        self.pools.values().map(IdentifierPool::in_use_count).sum()
    }

    /// Snapshot of every pool, ordered by direction then type.
    pub fn usage(&self) -> Vec<PoolInfo> {
        let mut usage: Vec<PoolInfo> = self.pools.values().map(IdentifierPool::info).collect();
        usage.sort_by_key(|info| (info.direction, info.ident_type));
        usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PoolSpec;

    #[test]
    fn test_binding_builds_configured_pools_only() {
        let config = PoolConfig::new()
            .with_pool(Direction::Receive, IdentifierType::ProfFunc, PoolSpec::new(4))
            .with_pool(Direction::Transmit, IdentifierType::L2Func, PoolSpec::with_base(2, 10));
        let binding = Binding::new(1, &config).unwrap();

        assert_eq!(binding.pool_count(), 2);
        assert!(binding.pool(Direction::Receive, IdentifierType::ProfFunc).is_ok());
        assert_eq!(
            binding.pool(Direction::Transmit, IdentifierType::ProfFunc).unwrap_err(),
            IdentError::UnknownPool {
                direction: Direction::Transmit,
                ident_type: IdentifierType::ProfFunc,
            }
        );
    }

    #[test]
    fn test_binding_usage_is_sorted() {
        let config = PoolConfig::new()
            .with_pool(Direction::Transmit, IdentifierType::L2CtxtHigh, PoolSpec::new(1))
            .with_pool(Direction::Receive, IdentifierType::EmProf, PoolSpec::new(1))
            .with_pool(Direction::Receive, IdentifierType::L2CtxtLow, PoolSpec::new(1));
        let binding = Binding::new(3, &config).unwrap();
        binding
            .pool(Direction::Receive, IdentifierType::EmProf)
            .unwrap()
            .allocate()
            .unwrap();

        let keys: Vec<_> = binding
            .usage()
            .iter()
            .map(|info| (info.direction, info.ident_type))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Direction::Receive, IdentifierType::L2CtxtLow),
                (Direction::Receive, IdentifierType::EmProf),
                (Direction::Transmit, IdentifierType::L2CtxtHigh),
            ]
        );
        assert_eq!(binding.outstanding(), 1);
        assert_eq!(binding.generation(), 3);
    }

    #[test]
    fn test_binding_rejects_invalid_config() {
        let config = PoolConfig::new().with_pool(
            Direction::Receive,
            IdentifierType::WcProf,
            PoolSpec::new(0),
        );
        assert!(matches!(
            Binding::new(1, &config),
            Err(IdentError::InvalidConfig(_))
        ));
    }
}
