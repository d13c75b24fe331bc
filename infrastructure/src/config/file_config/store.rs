//! Query store configuration from TOML (`[store]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Records live for the process lifetime
    #[default]
    Memory,
    /// Append-only JSON lines file
    Jsonl,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    pub backend: StoreBackend,
    /// JSONL file; defaults to the user data directory
    pub path: Option<PathBuf>,
}

impl FileStoreConfig {
    /// `$XDG_DATA_HOME/chairman-council/queries.jsonl`, or `./queries.jsonl`
    pub fn jsonl_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("chairman-council").join("queries.jsonl"))
                .unwrap_or_else(|| PathBuf::from("queries.jsonl"))
        })
    }
}
