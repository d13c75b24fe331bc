//! Model identifier value object

use serde::{Deserialize, Serialize};

/// Provider-qualified model identifier (Value Object)
///
/// Identifiers follow the router convention `vendor/model`, for example
/// `anthropic/claude-3-opus`. The identifier is opaque to the domain; it is
/// passed through to the backend unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Vendor prefix (`anthropic` in `anthropic/claude-3-opus`), if any
    pub fn vendor(&self) -> Option<&str> {
        self.0.split_once('/').map(|(vendor, _)| vendor)
    }

    /// The default chairman model used for synthesis
    pub fn default_chairman() -> Self {
        Self::new("google/gemini-2.0-flash")
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ModelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
