//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Query is required")]
    EmptyQuery,

    #[error("No council members configured")]
    NoMembers,

    #[error("Duplicate council member id: {0}")]
    DuplicateMember(String),

    #[error("Invalid council member: {0}")]
    InvalidMember(String),
}

impl DomainError {
    /// Check if this error was caused by the caller's input rather than configuration
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::EmptyQuery)
    }
}
