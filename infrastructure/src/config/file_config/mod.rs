//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application parameters
//! at startup.

mod auth;
mod council;
mod provider;
mod server;
mod store;
mod tenants;

pub use auth::FileAuthConfig;
pub use council::{FileCouncilConfig, FileMemberConfig, FileSpecialtyConfig};
pub use provider::FileProviderConfig;
pub use server::FileServerConfig;
pub use store::{FileStoreConfig, StoreBackend};
pub use tenants::FileTenantConfig;

use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP bind settings
    pub server: FileServerConfig,
    /// Chat completions endpoint and credentials
    pub provider: FileProviderConfig,
    /// Members, timeouts and the chairman stage
    pub council: FileCouncilConfig,
    /// Resolution cache and rate limits
    pub auth: FileAuthConfig,
    /// Static tenant registry
    pub tenants: Vec<FileTenantConfig>,
    /// Query persistence
    pub store: FileStoreConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. The provider API key resolves
    /// 2. The council is usable and its timeouts are non-zero
    /// 3. Cache bounds and rate limit overrides
    /// 4. Tenant ids and role names
    /// 5. CORS origins
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Provider
        if self.provider.resolve_api_key().is_none() {
            issues.push(ConfigIssue::missing_api_key(&self.provider.api_key_env));
        }
        if self.provider.max_tokens == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "provider.max_tokens".to_string(),
                },
                "provider.max_tokens must be greater than zero",
            ));
        }

        // 2. Council
        issues.extend(self.council.validate());

        // 3. Auth
        issues.extend(self.auth.validate());

        // 4. Tenants
        let (roles, _) = self.auth.role_table();
        issues.extend(tenants::validate_tenants(&self.tenants, &roles));
        if self.tenants.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidTenant {
                    tenant_id: String::new(),
                },
                "no [[tenants]] configured; every credential will be rejected",
            ));
        }

        // 5. Server
        issues.extend(self.server.validate());

        issues
    }

    /// Copy safe to print: secrets masked
    pub fn redacted(&self) -> Self {
        Self {
            provider: self.provider.redacted(),
            ..self.clone()
        }
    }
}
