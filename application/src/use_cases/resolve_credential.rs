//! Resolve Credential use case
//!
//! Turns an API key into a tenant identity and role, with a bounded TTL
//! cache in front of the tenant registry.

use crate::config::AuthParams;
use crate::ports::clock::{Clock, SystemClock};
use crate::ports::tenant_registry::{RegistryError, TenantRegistry};
use council_domain::{Credential, TenantIdentity};
use moka::sync::Cache;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while authenticating a caller
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing API key")]
    MissingCredential,

    #[error("Malformed API key")]
    MalformedCredential,

    #[error("Unknown tenant: {0}")]
    UnknownTenant(String),

    #[error(transparent)]
    RegistryUnavailable(#[from] RegistryError),
}

/// A resolved caller: identity plus the role the tenant assigns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub identity: TenantIdentity,
    pub role: String,
}

#[derive(Debug, Clone)]
struct CachedResolution {
    resolution: Resolution,
    expires_at: Instant,
}

/// Hex SHA-256 of the raw credential. Used as the cache key and in logs.
pub fn credential_fingerprint(credential: &Credential) -> String {
    let mut hasher = Sha256::new();
    hasher.update(credential.expose().as_bytes());
    hex::encode(hasher.finalize())
}

/// Credential resolver with a TTL + capacity bounded cache
///
/// Expiry is checked against the injected [`Clock`] on every lookup, so an
/// entry is never served past `expires_at`. Capacity eviction is handled by
/// the cache itself.
pub struct CredentialResolver {
    registry: Arc<dyn TenantRegistry>,
    cache: Cache<String, CachedResolution>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl CredentialResolver {
    pub fn new(registry: Arc<dyn TenantRegistry>, params: &AuthParams) -> Self {
        Self {
            registry,
            cache: Cache::builder()
                .max_capacity(params.cache_capacity)
                .time_to_live(params.cache_ttl)
                .build(),
            ttl: params.cache_ttl,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Resolve a credential to its tenant identity
    pub async fn resolve(&self, credential: &Credential) -> Result<TenantIdentity, AuthError> {
        self.resolve_with_role(credential)
            .await
            .map(|resolution| resolution.identity)
    }

    /// Resolve a credential to its identity and assigned role
    pub async fn resolve_with_role(
        &self,
        credential: &Credential,
    ) -> Result<Resolution, AuthError> {
        let key = credential_fingerprint(credential);
        let now = self.clock.now();

        if let Some(entry) = self.cache.get(&key) {
            if entry.expires_at > now {
                debug!(key = &key[..12], "Credential cache hit");
                return Ok(entry.resolution);
            }
            debug!(key = &key[..12], "Credential cache entry expired");
            self.cache.invalidate(&key);
        }

        let parts = credential.parts().ok_or(AuthError::MalformedCredential)?;

        let tenant = match self.registry.get_tenant_config(&parts.tenant_id).await {
            Ok(Some(tenant)) => tenant,
            Ok(None) => {
                warn!(tenant_id = %parts.tenant_id, "Credential names an unknown tenant");
                return Err(AuthError::UnknownTenant(parts.tenant_id));
            }
            Err(e) => {
                warn!(tenant_id = %parts.tenant_id, "Tenant registry lookup failed: {}", e);
                return Err(e.into());
            }
        };

        let role = tenant.role_for(&parts.user_id).to_string();
        let resolution = Resolution {
            identity: TenantIdentity::new(
                parts.tenant_id,
                parts.user_id,
                tenant.organization_name,
                tenant.specialty,
            ),
            role,
        };

        info!(
            tenant_id = %resolution.identity.tenant_id,
            role = %resolution.role,
            "Resolved credential"
        );

        self.cache.insert(
            key,
            CachedResolution {
                resolution: resolution.clone(),
                expires_at: now + self.ttl,
            },
        );

        Ok(resolution)
    }

    /// Number of live cache entries (after pending maintenance)
    pub fn cached_entries(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    /// Drop every cached resolution
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
