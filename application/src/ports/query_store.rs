//! Query store port
//!
//! Persistence contract for council results, partitioned by tenant.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use council_domain::CouncilResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while persisting or reading results
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A persisted council query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuery {
    pub record_id: String,
    pub tenant_id: String,
    pub domain: String,
    pub query: String,
    pub result: CouncilResult,
    pub created_at: DateTime<Utc>,
}

/// Store for council results
///
/// A record saved under one tenant is never returned for another.
#[async_trait]
pub trait QueryStore: Send + Sync {
    /// Persist a result and return its record id
    async fn save_query(
        &self,
        query: &str,
        result: &CouncilResult,
        domain: &str,
        tenant_id: &str,
    ) -> Result<String, StoreError>;

    async fn get_query(
        &self,
        record_id: &str,
        tenant_id: &str,
    ) -> Result<Option<StoredQuery>, StoreError>;
}
