//! Infrastructure layer for chairman-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod openrouter;
pub mod registry;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAuthConfig, FileConfig, FileCouncilConfig, FileMemberConfig,
    FileProviderConfig, FileServerConfig, FileSpecialtyConfig, FileStoreConfig, FileTenantConfig,
    StoreBackend,
};
pub use openrouter::{OpenRouterBackend, OpenRouterSettings};
pub use registry::StaticTenantRegistry;
pub use store::{InMemoryQueryStore, JsonlQueryStore};
