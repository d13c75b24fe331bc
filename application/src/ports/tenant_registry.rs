//! Tenant registry port
//!
//! Read-only lookup of tenant configuration by tenant id.

use async_trait::async_trait;
use council_domain::tenant::role::roles;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during registry lookups
#[derive(Error, Debug, Clone)]
pub enum RegistryError {
    #[error("Tenant registry unavailable: {0}")]
    Unavailable(String),
}

/// Tenant record as stored in the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantConfig {
    pub organization_name: Option<String>,
    pub specialty: Option<String>,
    /// Role for users without an explicit assignment
    pub default_role: Option<String>,
    /// user id → role name
    pub users: HashMap<String, String>,
}

impl TenantConfig {
    pub fn new(organization_name: impl Into<String>, specialty: impl Into<String>) -> Self {
        Self {
            organization_name: Some(organization_name.into()),
            specialty: Some(specialty.into()),
            ..Default::default()
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>, role: impl Into<String>) -> Self {
        self.users.insert(user_id.into(), role.into());
        self
    }

    pub fn with_default_role(mut self, role: impl Into<String>) -> Self {
        self.default_role = Some(role.into());
        self
    }

    /// Role for a user: explicit assignment, then tenant default, then `clinician`
    pub fn role_for(&self, user_id: &str) -> &str {
        self.users
            .get(user_id)
            .or(self.default_role.as_ref())
            .map(String::as_str)
            .unwrap_or(roles::DEFAULT)
    }
}

/// Registry of tenants
#[async_trait]
pub trait TenantRegistry: Send + Sync {
    /// `Ok(None)` means the tenant does not exist
    async fn get_tenant_config(&self, tenant_id: &str) -> Result<Option<TenantConfig>, RegistryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_resolution_order() {
        let config = TenantConfig::new("Acme", "psychiatry")
            .with_user("boss", "admin")
            .with_default_role("researcher");
        assert_eq!(config.role_for("boss"), "admin");
        assert_eq!(config.role_for("someone"), "researcher");

        let bare = TenantConfig::default();
        assert_eq!(bare.role_for("someone"), "clinician");
    }
}
