//! Tenant registry populated from `[[tenants]]`.

use crate::config::FileTenantConfig;
use async_trait::async_trait;
use council_application::{RegistryError, TenantConfig, TenantRegistry};
use std::collections::HashMap;

/// Read-only, in-process tenant registry
#[derive(Debug, Clone, Default)]
pub struct StaticTenantRegistry {
    tenants: HashMap<String, TenantConfig>,
}

impl StaticTenantRegistry {
    pub fn from_config(tenants: &[FileTenantConfig]) -> Self {
        Self {
            tenants: tenants
                .iter()
                .map(|t| (t.id.clone(), t.to_tenant_config()))
                .collect(),
        }
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>, config: TenantConfig) -> Self {
        self.tenants.insert(tenant_id.into(), config);
        self
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

#[async_trait]
impl TenantRegistry for StaticTenantRegistry {
    async fn get_tenant_config(
        &self,
        tenant_id: &str,
    ) -> Result<Option<TenantConfig>, RegistryError> {
        Ok(self.tenants.get(tenant_id).cloned())
    }
}
