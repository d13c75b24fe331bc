//! Authentication configuration from TOML (`[auth]` section)
//!
//! ```toml
//! [auth]
//! cache_ttl_seconds = 3600
//! cache_capacity = 10000
//!
//! [auth.rate_limits]
//! clinician = 60
//! ```

use council_application::AuthParams;
use council_domain::{ConfigIssue, ConfigIssueCode, RoleTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuthConfig {
    /// How long a resolved credential is served from cache
    pub cache_ttl_seconds: u64,
    /// Maximum cached credentials
    pub cache_capacity: u64,
    /// Per-role requests-per-minute overrides
    pub rate_limits: BTreeMap<String, u32>,
}

impl Default for FileAuthConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 3600,
            cache_capacity: 10_000,
            rate_limits: BTreeMap::new(),
        }
    }
}

impl FileAuthConfig {
    pub fn to_params(&self) -> AuthParams {
        AuthParams {
            cache_ttl: Duration::from_secs(self.cache_ttl_seconds),
            cache_capacity: self.cache_capacity,
            ..AuthParams::default()
        }
    }

    /// Built-in role table with the configured overrides applied
    pub fn role_table(&self) -> (RoleTable, Vec<ConfigIssue>) {
        let mut table = RoleTable::builtin();
        let mut issues = Vec::new();

        for (role, &limit) in &self.rate_limits {
            if !table.contains(role) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownRole { role: role.clone() },
                    format!("auth.rate_limits: unknown role '{}' is ignored", role),
                ));
                continue;
            }
            if limit == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroValue {
                        field: format!("auth.rate_limits.{}", role),
                    },
                    format!("auth.rate_limits.{} must be greater than zero", role),
                ));
                continue;
            }
            table = table.with_rate_limit(role, limit);
        }

        (table, issues)
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.role_table().1;
        for (field, value) in [
            ("auth.cache_ttl_seconds", self.cache_ttl_seconds),
            ("auth.cache_capacity", self.cache_capacity),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroValue {
                        field: field.to_string(),
                    },
                    format!("{} must be greater than zero", field),
                ));
            }
        }
        issues
    }
}
