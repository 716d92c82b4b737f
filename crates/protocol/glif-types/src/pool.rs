//! Pool identifiers.

use crate::error::{TypesError, TypesResult};

/// Known lending pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum PoolType {
    InfinityPool = 0,
}

impl PoolType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InfinityPool => "infinity-pool",
        }
    }

    pub fn id(&self) -> u64 {
        *self as u64
    }
}

/// Resolve a pool name to its on-chain ID.
pub fn parse_pool_type(pool: &str) -> TypesResult<PoolType> {
    match pool {
        "" => Err(TypesError::InvalidPool("Invalid pool name".to_string())),
        "infinity-pool" => Ok(PoolType::InfinityPool),
        _ => Err(TypesError::InvalidPool("invalid pool".to_string())),
    }
}
