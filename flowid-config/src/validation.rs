// flowid-config/src/validation.rs
//! Custom validation functions for configuration.

use std::collections::HashSet;

use flowid_core::types::IDENTIFIER_SPACE;
use tracing_subscriber::EnvFilter;
use validator::ValidationError;

use crate::pools::{PoolEntry, PoolsConfig};

/// Validate that a pool's whole range fits the 16-bit identifier space.
pub fn validate_entry_range(entry: &PoolEntry) -> Result<(), ValidationError> {
    if u32::from(entry.base) + entry.capacity > IDENTIFIER_SPACE {
        return Err(ValidationError::new("pool_range_overflow"));
    }
    Ok(())
}

/// Validate that no `(direction, ident_type)` pair is reserved twice.
pub fn validate_unique_pools(pools: &PoolsConfig) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if pools
        .entries
        .iter()
        .all(|entry| seen.insert((entry.direction, entry.ident_type)))
    {
        Ok(())
    } else {
        Err(ValidationError::new("duplicate_pool"))
    }
}

/// Validate a `tracing` env-filter directive string the same way the
/// subscriber will parse it.
pub fn validate_log_filter(filter: &str) -> Result<(), ValidationError> {
    if filter.trim().is_empty() || EnvFilter::try_new(filter).is_err() {
        return Err(ValidationError::new("invalid_log_filter"));
    }
    Ok(())
}
