//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelId`] - provider-qualified model identifiers
//! - [`query::Query`] - a validated query to put to the council
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod model;
pub mod query;
pub mod string;
