//! HTTP server configuration from TOML (`[server]` section)
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//! cors_origins = ["http://localhost:3000"]
//! ```

use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Origin value that allows any origin
pub const ANY_ORIGIN: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Interface to bind (default: "0.0.0.0")
    pub host: String,
    /// Port to bind (default: 8000)
    pub port: u16,
    /// Browser origins allowed by CORS (default: `["*"]`)
    pub cors_origins: Vec<String>,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec![ANY_ORIGIN.to_string()],
        }
    }
}

impl FileServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        self.cors_origins
            .iter()
            .filter(|origin| {
                origin.as_str() != ANY_ORIGIN
                    && !(origin.starts_with("http://") || origin.starts_with("https://"))
            })
            .map(|origin| {
                ConfigIssue::warning(
                    ConfigIssueCode::InvalidCorsOrigin {
                        origin: origin.clone(),
                    },
                    format!(
                        "server.cors_origins: '{}' is not an http(s) origin and will never match",
                        origin
                    ),
                )
            })
            .collect()
    }
}
