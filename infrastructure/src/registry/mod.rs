//! [`TenantRegistry`](council_application::TenantRegistry) adapters

mod static_registry;

pub use static_registry::StaticTenantRegistry;
