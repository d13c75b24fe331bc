//! Application layer for chairman-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.
//!
//! The request path is assembled in [`CouncilService`]:
//!
//! ```text
//! credential ─► CredentialResolver ─► PermissionContext ─► AdmissionController
//!                                                               │
//!                        QueryStore (detached) ◄─ CouncilDispatcher ─► ChairmanSynthesis
//! ```

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AuthParams, CouncilParams};
pub use ports::{
    clock::{Clock, SystemClock},
    model_backend::{CallError, ModelBackend},
    progress::{NoProgress, ProgressNotifier},
    query_store::{QueryStore, StoreError, StoredQuery},
    tenant_registry::{RegistryError, TenantConfig, TenantRegistry},
};
#[cfg(any(test, feature = "test-util"))]
pub use ports::clock::ManualClock;
pub use use_cases::{
    admission::{AdmissionController, RateLimitError},
    council_service::{CouncilService, QueryError, QueryRequest},
    resolve_credential::{AuthError, CredentialResolver, Resolution, credential_fingerprint},
    run_council::{CouncilDispatcher, RunCouncilError},
    synthesize::{ChairmanSynthesis, SynthesisError},
};
