//! Per-request permission context

use super::identity::TenantIdentity;
use super::role::{Permission, RoleTable};
use std::collections::BTreeSet;

/// Authorization view of one request (Value Object)
///
/// Built once after the credential is resolved and passed explicitly through
/// admission and dispatch. Permissions are copied from the role table, so
/// they can never exceed what the role grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionContext {
    pub tenant_id: String,
    pub user_id: String,
    pub specialty: String,
    pub role: String,
    pub permissions: BTreeSet<String>,
    can_access_all_patients: bool,
    rate_limit_per_minute: u32,
}

impl PermissionContext {
    pub fn build(identity: &TenantIdentity, role: &str, table: &RoleTable) -> Self {
        let config = table.get(role);
        Self {
            tenant_id: identity.tenant_id.clone(),
            user_id: identity.user_id.clone(),
            specialty: identity.specialty.clone(),
            role: role.to_string(),
            permissions: config.permissions.clone(),
            can_access_all_patients: config.can_access_all_patients,
            rate_limit_per_minute: config.rate_limit_per_minute,
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(Permission::WILDCARD) || self.permissions.contains(permission)
    }

    /// Patient-level access check.
    ///
    /// Authorization is role-level only: every authenticated caller may
    /// access any patient. `can_access_all_patients` is kept for when a
    /// per-patient ACL exists.
    pub fn can_access_patient(&self, _patient_id: &str) -> bool {
        true
    }

    pub fn can_access_all_patients(&self) -> bool {
        self.can_access_all_patients
    }

    /// Admission limit for this caller's tenant, taken from the role
    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }
}
