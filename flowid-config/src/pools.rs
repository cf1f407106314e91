//! Identifier pool sizing.
//!
//! Each entry reserves one pool for a `(direction, ident_type)` pair:
//!
//! ```yaml
//! pools:
//!   entries:
//!     - { direction: receive, ident_type: prof_func, capacity: 64 }
//!     - { direction: transmit, ident_type: em_prof, capacity: 256, base: 1024 }
//! ```

use flowid_core::types::{Direction, Identifier, IdentifierType, PoolConfig, PoolSpec};
use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// One reserved pool.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
#[validate(schema(function = validation::validate_entry_range))]
pub struct PoolEntry {
    pub direction: Direction,

    pub ident_type: IdentifierType,

    /// Number of identifiers in the pool.
    #[validate(range(min = 1, max = 65536))]
    pub capacity: u32,

    /// First identifier value of the pool.
    #[serde(default)]
    pub base: Identifier,
}

impl PoolEntry {
    pub fn new(direction: Direction, ident_type: IdentifierType, capacity: u32) -> Self {
        Self {
            direction,
            ident_type,
            capacity,
            base: 0,
        }
    }

    pub fn spec(&self) -> PoolSpec {
        PoolSpec::with_base(self.capacity, self.base)
    }
}

/// All reserved pools.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = validation::validate_unique_pools))]
pub struct PoolsConfig {
    #[validate(length(min = 1))]
    #[validate(nested)]
    #[serde(default = "default_entries")]
    pub entries: Vec<PoolEntry>,
}

// Every identifier type in both directions.
fn default_entries() -> Vec<PoolEntry> {
    let sizes = [
        (IdentifierType::L2CtxtHigh, 256),
        (IdentifierType::L2CtxtLow, 256),
        (IdentifierType::ProfFunc, 64),
        (IdentifierType::WcProf, 256),
        (IdentifierType::EmProf, 256),
        (IdentifierType::L2Func, 64),
    ];
    Direction::ALL
        .iter()
        .flat_map(|&direction| {
            sizes
                .iter()
                .map(move |&(ident_type, capacity)| PoolEntry::new(direction, ident_type, capacity))
        })
        .collect()
}

impl Default for PoolsConfig {
    fn default() -> Self {
        Self {
            entries: default_entries(),
        }
    }
}

impl PoolsConfig {
    /// Builds the core pool table. Entries are assumed to be validated.
    pub fn to_pool_config(&self) -> PoolConfig {
        self.entries
            .iter()
            .map(|entry| ((entry.direction, entry.ident_type), entry.spec()))
            .collect()
    }
}
