//! Configuration file loading for chairman-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `COUNCIL_*`, nested keys split on `__`
//! 2. `--config <path>` specified file
//! 3. Project root: `./council.toml` or `./.council.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/chairman-council/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAuthConfig, FileConfig, FileCouncilConfig, FileMemberConfig, FileProviderConfig,
    FileServerConfig, FileSpecialtyConfig, FileStoreConfig, FileTenantConfig, StoreBackend,
};
pub use loader::ConfigLoader;
