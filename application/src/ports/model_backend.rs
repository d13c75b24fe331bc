//! Model backend port
//!
//! Defines the single-call contract for one chat-completion provider.

use async_trait::async_trait;
use council_domain::{ModelId, truncate};
use std::time::Duration;
use thiserror::Error;

/// Longest provider body kept in an error message
const MAX_ERROR_BODY: usize = 500;

/// Errors that can occur during a backend call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Provider returned HTTP {status}: {}", truncate(.body, MAX_ERROR_BODY))]
    Status { status: u16, body: String },

    #[error("Malformed provider response: {detail}")]
    MalformedBody { detail: String, body: String },

    #[error("Request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl CallError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CallError::Timeout(_))
    }
}

/// Adapter for one provider's chat-completion endpoint
///
/// Implementations build a system + user turn, send it, and return the first
/// completion's text. They must never panic on provider misbehaviour: every
/// failure is a [`CallError`].
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn call(
        &self,
        model: &ModelId,
        system_prompt: &str,
        user_message: &str,
        timeout: Duration,
    ) -> Result<String, CallError>;
}
