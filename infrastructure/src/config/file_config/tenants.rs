//! Tenant configuration from TOML (`[[tenants]]` array)
//!
//! ```toml
//! [[tenants]]
//! id = "mercy"
//! organization_name = "Mercy Clinic"
//! specialty = "psychiatry"
//!
//! [tenants.users]
//! drsmith = "clinician"
//! ops = "admin"
//! ```

use council_application::TenantConfig;
use council_domain::{ConfigIssue, ConfigIssueCode, RoleTable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTenantConfig {
    pub id: String,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    /// Role for users not listed in `users`
    #[serde(default)]
    pub default_role: Option<String>,
    /// user id → role
    #[serde(default)]
    pub users: BTreeMap<String, String>,
}

impl FileTenantConfig {
    pub fn to_tenant_config(&self) -> TenantConfig {
        TenantConfig {
            organization_name: self.organization_name.clone(),
            specialty: self.specialty.clone(),
            default_role: self.default_role.clone(),
            users: self
                .users
                .iter()
                .map(|(user, role)| (user.clone(), role.clone()))
                .collect(),
        }
    }
}

/// Check tenant ids are usable in credentials and roles are known
pub(super) fn validate_tenants(tenants: &[FileTenantConfig], roles: &RoleTable) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for tenant in tenants {
        let invalid = |message: String| {
            ConfigIssue::error(
                ConfigIssueCode::InvalidTenant {
                    tenant_id: tenant.id.clone(),
                },
                message,
            )
        };

        if tenant.id.trim().is_empty() {
            issues.push(invalid("tenants: tenant id must not be empty".to_string()));
            continue;
        }
        // Credentials are split on '-', so such an id could never be presented
        if tenant.id.contains('-') {
            issues.push(invalid(format!(
                "tenants: tenant id '{}' must not contain '-'",
                tenant.id
            )));
        }
        if !seen.insert(tenant.id.as_str()) {
            issues.push(invalid(format!("tenants: duplicate tenant id '{}'", tenant.id)));
        }

        let assigned = tenant.default_role.iter().chain(tenant.users.values());
        for role in assigned {
            if !roles.contains(role) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownRole { role: role.clone() },
                    format!(
                        "tenants.{}: role '{}' grants no permissions",
                        tenant.id, role
                    ),
                ));
            }
        }
    }

    issues
}
