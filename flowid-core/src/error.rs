use thiserror::Error;

use crate::types::{Direction, Identifier, IdentifierType};

pub type IdentResult<T> = Result<T, IdentError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentError {
    #[error("Identifier manager is already bound")]
    AlreadyBound,

    #[error("Identifier manager is not bound")]
    NotBound,

    #[error("Invalid pool configuration: {0}")]
    InvalidConfig(String),

    #[error("No pool configured for {direction}/{ident_type}")]
    UnknownPool {
        direction: Direction,
        ident_type: IdentifierType,
    },

    #[error("Pool {direction}/{ident_type} exhausted ({capacity} identifiers in use)")]
    PoolExhausted {
        direction: Direction,
        ident_type: IdentifierType,
        capacity: u32,
    },

    #[error("Identifier {id} outside pool {direction}/{ident_type}")]
    InvalidIdentifier {
        direction: Direction,
        ident_type: IdentifierType,
        id: Identifier,
    },

    #[error("Identifier {id} in pool {direction}/{ident_type} is not allocated")]
    DoubleFree {
        direction: Direction,
        ident_type: IdentifierType,
        id: Identifier,
    },
}

impl IdentError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            IdentError::AlreadyBound => "already_bound",
            IdentError::NotBound => "not_bound",
            IdentError::InvalidConfig(_) => "invalid_config",
            IdentError::UnknownPool { .. } => "unknown_pool",
            IdentError::PoolExhausted { .. } => "pool_exhausted",
            IdentError::InvalidIdentifier { .. } => "invalid_identifier",
            IdentError::DoubleFree { .. } => "double_free",
        }
    }
}
