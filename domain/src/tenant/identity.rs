//! Resolved tenant identity

use serde::{Deserialize, Serialize};

/// Default organization name when the registry record has none
pub const UNKNOWN_TENANT_NAME: &str = "Unknown";

/// Default specialty when the registry record has none
pub const DEFAULT_SPECIALTY: &str = "healthcare";

/// Identity a credential resolves to (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantIdentity {
    pub tenant_id: String,
    pub user_id: String,
    pub tenant_name: String,
    pub specialty: String,
}

impl TenantIdentity {
    pub fn new(
        tenant_id: impl Into<String>,
        user_id: impl Into<String>,
        tenant_name: Option<String>,
        specialty: Option<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
            tenant_name: tenant_name.unwrap_or_else(|| UNKNOWN_TENANT_NAME.to_string()),
            specialty: specialty.unwrap_or_else(|| DEFAULT_SPECIALTY.to_string()),
        }
    }
}
