//! Authentication and admission parameters.

use std::time::Duration;

/// Resolution cache and admission window settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthParams {
    /// How long a resolved credential stays valid in the cache
    pub cache_ttl: Duration,
    /// Upper bound on cached resolutions
    pub cache_capacity: u64,
    /// Sliding window the per-minute limits are counted over
    pub rate_window: Duration,
}

impl Default for AuthParams {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            cache_capacity: 10_000,
            rate_window: Duration::from_secs(60),
        }
    }
}
