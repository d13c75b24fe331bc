//! Role table (static role → permissions / rate limit mapping)

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Permission names understood by the service
pub struct Permission;

impl Permission {
    /// Grants every permission
    pub const WILDCARD: &'static str = "*";
    pub const QUERY_COUNCIL: &'static str = "query_council";
    pub const VIEW_HISTORY: &'static str = "view_history";
    pub const MANAGE_USERS: &'static str = "manage_users";
    pub const VIEW_ANALYTICS: &'static str = "view_analytics";
    pub const VIEW_AGGREGATED_ANALYTICS: &'static str = "view_aggregated_analytics";
    pub const MANAGE_DOMAIN_CONFIG: &'static str = "manage_domain_config";
}

/// Built-in role names
pub mod roles {
    pub const HEALTHCARE_ADMIN: &str = "healthcare_admin";
    pub const CLINICIAN: &str = "clinician";
    pub const RESEARCHER: &str = "researcher";
    pub const ADMIN: &str = "admin";

    /// Role assumed when a tenant does not assign one
    pub const DEFAULT: &str = CLINICIAN;
}

/// Rate limit applied to roles the table does not know
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 30;

/// Authorization settings for one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub permissions: BTreeSet<String>,
    pub can_access_all_patients: bool,
    pub rate_limit_per_minute: u32,
}

impl RoleConfig {
    pub fn new(permissions: &[&str], can_access_all_patients: bool, rate_limit: u32) -> Self {
        Self {
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            can_access_all_patients,
            rate_limit_per_minute: rate_limit,
        }
    }

    /// Configuration for an unrecognized role: no permissions, default limit
    pub fn empty() -> Self {
        Self {
            permissions: BTreeSet::new(),
            can_access_all_patients: false,
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.permissions.contains(Permission::WILDCARD)
    }
}

/// Process-wide role table, read-only once built
#[derive(Debug, Clone)]
pub struct RoleTable {
    roles: HashMap<String, RoleConfig>,
    unknown: RoleConfig,
}

impl RoleTable {
    /// The four built-in roles
    pub fn builtin() -> Self {
        let roles = HashMap::from([
            (
                roles::HEALTHCARE_ADMIN.to_string(),
                RoleConfig::new(
                    &[
                        Permission::MANAGE_USERS,
                        Permission::VIEW_ANALYTICS,
                        Permission::MANAGE_DOMAIN_CONFIG,
                    ],
                    false,
                    100,
                ),
            ),
            (
                roles::CLINICIAN.to_string(),
                RoleConfig::new(
                    &[Permission::QUERY_COUNCIL, Permission::VIEW_HISTORY],
                    false,
                    30,
                ),
            ),
            (
                roles::RESEARCHER.to_string(),
                RoleConfig::new(
                    &[
                        Permission::QUERY_COUNCIL,
                        Permission::VIEW_AGGREGATED_ANALYTICS,
                    ],
                    false,
                    50,
                ),
            ),
            (
                roles::ADMIN.to_string(),
                RoleConfig::new(&[Permission::WILDCARD], true, 1000),
            ),
        ]);
        Self {
            roles,
            unknown: RoleConfig::empty(),
        }
    }

    /// Override the rate limit of a known role. Unknown roles are left alone.
    pub fn with_rate_limit(mut self, role: &str, limit_per_minute: u32) -> Self {
        if let Some(config) = self.roles.get_mut(role) {
            config.rate_limit_per_minute = limit_per_minute;
        }
        self
    }

    /// Look up a role. Unknown roles get an empty config, never an error.
    pub fn get(&self, role: &str) -> &RoleConfig {
        self.roles.get(role).unwrap_or(&self.unknown)
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    pub fn rate_limit_for(&self, role: &str) -> u32 {
        self.get(role).rate_limit_per_minute
    }

    /// Role names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::builtin()
    }
}
