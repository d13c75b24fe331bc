//! Domain layer for chairman-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A council is a fixed set of [`CouncilMember`]s, each one a model persona
//! (model id + system prompt + role label). A query is put to every member
//! and the answers are collected into a [`CouncilResult`], one
//! [`CouncilOpinion`] per member whether it answered or failed.
//!
//! ## Tenants
//!
//! Access is partitioned by tenant. A credential resolves to a
//! [`TenantIdentity`]; together with a role from the [`RoleTable`] it forms the
//! [`PermissionContext`] that authorizes a single request.
//!
//! ## Specialties
//!
//! A tenant's specialty selects a [`SpecialtyProfile`] from the
//! [`SpecialtyTable`], which swaps member models and lists the context fields
//! a request should carry. [`ContextReview`] records, by field name only,
//! which PHI fields a request carried.

pub mod clinical;
pub mod config;
pub mod core;
pub mod council;
pub mod prompt;
pub mod tenant;

// Re-export commonly used types
pub use clinical::{
    phi::{PHI_FIELDS, detect_phi},
    review::ContextReview,
    specialty::{SpecialtyProfile, SpecialtyTable},
};
pub use config::validation::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{error::DomainError, model::ModelId, query::Query, string::truncate};
pub use council::{
    member::CouncilMember,
    opinion::CouncilOpinion,
    result::{CouncilResult, Stage, SynthesisResult},
};
pub use prompt::PromptTemplate;
pub use tenant::{
    credential::Credential,
    identity::TenantIdentity,
    permission::PermissionContext,
    role::{Permission, RoleConfig, RoleTable},
};
