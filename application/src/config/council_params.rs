//! Council parameters - dispatch and synthesis control.

use council_domain::ModelId;
use std::time::Duration;

/// Timeouts and options for one council dispatch.
///
/// `council_timeout` is the shared deadline for the whole fan-out;
/// `call_timeout` bounds each member's backend call on its own.
#[derive(Debug, Clone)]
pub struct CouncilParams {
    pub council_timeout: Duration,
    pub call_timeout: Duration,
    pub chairman_model: ModelId,
    pub chairman_timeout: Duration,
    /// Run the chairman stage when the request does not say
    pub synthesize_by_default: bool,
    /// Domain label stored with persisted queries
    pub domain: String,
}

impl Default for CouncilParams {
    fn default() -> Self {
        Self {
            council_timeout: Duration::from_secs(120),
            call_timeout: Duration::from_secs(120),
            chairman_model: ModelId::default_chairman(),
            chairman_timeout: Duration::from_secs(90),
            synthesize_by_default: false,
            domain: "healthcare".to_string(),
        }
    }
}

impl CouncilParams {
    // ==================== Builder Methods ====================

    pub fn with_council_timeout(mut self, timeout: Duration) -> Self {
        self.council_timeout = timeout;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_chairman(mut self, model: ModelId, timeout: Duration) -> Self {
        self.chairman_model = model;
        self.chairman_timeout = timeout;
        self
    }

    pub fn with_synthesis_by_default(mut self, enabled: bool) -> Self {
        self.synthesize_by_default = enabled;
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = CouncilParams::default();
        assert_eq!(params.council_timeout, Duration::from_secs(120));
        assert_eq!(params.chairman_timeout, Duration::from_secs(90));
        assert_eq!(params.chairman_model.as_str(), "google/gemini-2.0-flash");
        assert!(!params.synthesize_by_default);
    }

    #[test]
    fn test_builder_chain() {
        let params = CouncilParams::default()
            .with_council_timeout(Duration::from_secs(5))
            .with_call_timeout(Duration::from_secs(2))
            .with_synthesis_by_default(true)
            .with_domain("psychiatry");
        assert_eq!(params.council_timeout, Duration::from_secs(5));
        assert_eq!(params.call_timeout, Duration::from_secs(2));
        assert!(params.synthesize_by_default);
        assert_eq!(params.domain, "psychiatry");
    }
}
