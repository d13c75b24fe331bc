//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod clock;
pub mod model_backend;
pub mod progress;
pub mod query_store;
pub mod tenant_registry;
