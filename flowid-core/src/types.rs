//! ## flowid-core::types
//! **Direction, identifier type and pool configuration**
//!
//! Identifier spaces are partitioned by `(Direction, IdentifierType)`. A
//! `PoolConfig` maps each configured pair to a `PoolSpec` describing how many
//! identifiers the pool holds and where its numeric range starts.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IdentError, IdentResult};

/// A hardware resource handle. Values are dense within a pool's range.
pub type Identifier = u16;

/// Size of the 16-bit identifier space.
pub const IDENTIFIER_SPACE: u32 = Identifier::MAX as u32 + 1;

/// Traffic direction. Receive and transmit identifier spaces never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Receive,
    Transmit,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Receive, Direction::Transmit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Receive => "rx",
            Direction::Transmit => "tx",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of hardware resource an identifier tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierType {
    /// High L2 context TCAM entry.
    L2CtxtHigh,
    /// Low L2 context TCAM entry.
    L2CtxtLow,
    /// Profile function.
    ProfFunc,
    /// Wildcard match profile.
    WcProf,
    /// Exact match profile.
    EmProf,
    /// L2 function.
    L2Func,
}

impl IdentifierType {
    /// Every type, in array-configuration order.
    pub const ALL: [IdentifierType; 6] = [
        IdentifierType::L2CtxtHigh,
        IdentifierType::L2CtxtLow,
        IdentifierType::ProfFunc,
        IdentifierType::WcProf,
        IdentifierType::EmProf,
        IdentifierType::L2Func,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierType::L2CtxtHigh => "l2_ctxt_high",
            IdentifierType::L2CtxtLow => "l2_ctxt_low",
            IdentifierType::ProfFunc => "prof_func",
            IdentifierType::WcProf => "wc_prof",
            IdentifierType::EmProf => "em_prof",
            IdentifierType::L2Func => "l2_func",
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of one pool.
pub type PoolKey = (Direction, IdentifierType);

/// Size and range of one identifier pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolSpec {
    /// Number of identifiers in the pool.
    pub capacity: u32,
    /// First identifier value handed out by the pool.
    #[serde(default)]
    pub base: Identifier,
}

impl PoolSpec {
    pub fn new(capacity: u32) -> Self {
        Self { capacity, base: 0 }
    }

    pub fn with_base(capacity: u32, base: Identifier) -> Self {
        Self { capacity, base }
    }

    /// Checks that the pool is non-empty and its whole range fits 16 bits.
    pub fn validate(&self, key: PoolKey) -> IdentResult<()> {
        if self.capacity == 0 {
            return Err(IdentError::InvalidConfig(format!(
                "pool {}/{} has zero capacity",
                key.0, key.1
            )));
        }
        if u32::from(self.base) + self.capacity > IDENTIFIER_SPACE {
            return Err(IdentError::InvalidConfig(format!(
                "pool {}/{} range {}+{} exceeds the 16-bit identifier space",
                key.0, key.1, self.base, self.capacity
            )));
        }
        Ok(())
    }
}

/// Pool sizes keyed by `(Direction, IdentifierType)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolConfig {
    pools: HashMap<PoolKey, PoolSpec>,
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry for `(direction, ident_type)`.
    pub fn with_pool(mut self, direction: Direction, ident_type: IdentifierType, spec: PoolSpec) -> Self {
        self.insert(direction, ident_type, spec);
        self
    }

    pub fn insert(&mut self, direction: Direction, ident_type: IdentifierType, spec: PoolSpec) -> Option<PoolSpec> {
        self.pools.insert((direction, ident_type), spec)
    }

    pub fn get(&self, direction: Direction, ident_type: IdentifierType) -> Option<&PoolSpec> {
        self.pools.get(&(direction, ident_type))
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PoolKey, &PoolSpec)> {
        self.pools.iter()
    }

    /// Builds a configuration from per-direction arrays indexed in
    /// `IdentifierType::ALL` order.
    ///
    /// `num_elements` must equal the length of both arrays and may not exceed
    /// the number of identifier types. Entries with zero capacity mean the
    /// type is not reserved in that direction and are skipped.
    pub fn from_arrays(num_elements: usize, rx: &[PoolSpec], tx: &[PoolSpec]) -> IdentResult<Self> {
        if num_elements > IdentifierType::ALL.len() {
            return Err(IdentError::InvalidConfig(format!(
                "{} elements exceeds the {} identifier types",
                num_elements,
                IdentifierType::ALL.len()
            )));
        }
        if rx.len() != num_elements || tx.len() != num_elements {
            return Err(IdentError::InvalidConfig(format!(
                "element count {} does not match array lengths rx={} tx={}",
                num_elements,
                rx.len(),
                tx.len()
            )));
        }

        let mut config = Self::new();
        for (direction, specs) in [(Direction::Receive, rx), (Direction::Transmit, tx)] {
            for (ident_type, spec) in IdentifierType::ALL.iter().zip(specs) {
                if spec.capacity > 0 {
                    config.insert(direction, *ident_type, *spec);
                }
            }
        }
        Ok(config)
    }

    /// Validates every entry. An empty configuration is rejected.
    pub fn validate(&self) -> IdentResult<()> {
        if self.pools.is_empty() {
            return Err(IdentError::InvalidConfig("no pools configured".into()));
        }
        self.pools
            .iter()
            .try_for_each(|(key, spec)| spec.validate(*key))
    }
}

impl FromIterator<(PoolKey, PoolSpec)> for PoolConfig {
    fn from_iter<I: IntoIterator<Item = (PoolKey, PoolSpec)>>(iter: I) -> Self {
        Self {
            pools: iter.into_iter().collect(),
        }
    }
}
