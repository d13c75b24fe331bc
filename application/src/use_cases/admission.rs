//! Admission control use case
//!
//! Sliding-window rate limiting per tenant, applied after authentication and
//! before any model call is issued.

use crate::config::AuthParams;
use crate::ports::clock::{Clock, SystemClock};
use council_domain::PermissionContext;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Rejection returned when a tenant is over its limit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Rate limit exceeded for tenant {tenant_id} ({limit_per_minute} requests per minute)")]
pub struct RateLimitError {
    pub tenant_id: String,
    pub limit_per_minute: u32,
}

/// Per-tenant sliding-window admission controller
///
/// Each tenant owns a queue of admission timestamps. A check prunes entries
/// that have aged out of the window, compares the count to the limit, and
/// records the new timestamp only when admitting. The prune/compare/record
/// sequence runs under one lock so concurrent requests for a tenant cannot
/// both take the last slot.
pub struct AdmissionController {
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl AdmissionController {
    pub fn new(params: &AuthParams) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            window: params.rate_window,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Check-and-record. Rejected attempts are not recorded.
    pub fn allow(&self, tenant_id: &str, limit_per_minute: u32) -> bool {
        let now = self.clock.now();
        let mut windows = self.windows.lock();
        let window = windows.entry(tenant_id.to_string()).or_default();

        while let Some(&oldest) = window.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                window.pop_front();
            } else {
                break;
            }
        }

        if window.len() >= limit_per_minute as usize {
            return false;
        }

        window.push_back(now);
        debug!(tenant_id, used = window.len(), limit_per_minute, "Admitted request");
        true
    }

    /// Admit a caller using the limit carried by its permission context
    pub fn admit(&self, ctx: &PermissionContext) -> Result<(), RateLimitError> {
        let limit = ctx.rate_limit_per_minute();
        if self.allow(&ctx.tenant_id, limit) {
            Ok(())
        } else {
            warn!(tenant_id = %ctx.tenant_id, limit, "Rate limit exceeded");
            Err(RateLimitError {
                tenant_id: ctx.tenant_id.clone(),
                limit_per_minute: limit,
            })
        }
    }

    /// Admissions still counted in the tenant's window (without pruning)
    pub fn recorded(&self, tenant_id: &str) -> usize {
        self.windows.lock().get(tenant_id).map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::ManualClock;
    use council_domain::{RoleTable, TenantIdentity};

    fn controller() -> (AdmissionController, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let controller = AdmissionController::new(&AuthParams::default()).with_clock(clock.clone());
        (controller, clock)
    }

    #[test]
    fn test_exactly_limit_admissions_per_window() {
        let (controller, clock) = controller();
        for _ in 0..5 {
            assert!(controller.allow("acme", 5));
            clock.advance(Duration::from_secs(1));
        }
        assert!(!controller.allow("acme", 5));
    }

    #[test]
    fn test_rejections_are_not_recorded() {
        let (controller, _clock) = controller();
        assert!(controller.allow("acme", 1));
        for _ in 0..10 {
            assert!(!controller.allow("acme", 1));
        }
        assert_eq!(controller.recorded("acme"), 1);
    }

    #[test]
    fn test_slot_frees_when_oldest_ages_out() {
        let (controller, clock) = controller();
        assert!(controller.allow("acme", 2)); // t = 0
        clock.advance(Duration::from_secs(30));
        assert!(controller.allow("acme", 2)); // t = 30
        assert!(!controller.allow("acme", 2));

        clock.advance(Duration::from_secs(29)); // t = 59
        assert!(!controller.allow("acme", 2));

        clock.advance(Duration::from_secs(1)); // t = 60, first entry aged out
        assert!(controller.allow("acme", 2));
        assert!(!controller.allow("acme", 2));
    }

    #[test]
    fn test_window_never_holds_stale_entries() {
        let (controller, clock) = controller();
        for _ in 0..3 {
            controller.allow("acme", 10);
        }
        clock.advance(Duration::from_secs(120));
        controller.allow("acme", 10);
        assert_eq!(controller.recorded("acme"), 1);
    }

    #[test]
    fn test_tenants_are_independent() {
        let (controller, _clock) = controller();
        assert!(controller.allow("acme", 1));
        assert!(!controller.allow("acme", 1));
        assert!(controller.allow("globex", 1));
    }

    #[test]
    fn test_clinician_31st_request_in_ten_seconds_rejected() {
        let (controller, clock) = controller();
        let identity = TenantIdentity::new("acme", "jdoe", None, None);
        let ctx = PermissionContext::build(&identity, "clinician", &RoleTable::builtin());

        for _ in 0..30 {
            assert!(controller.admit(&ctx).is_ok());
            clock.advance(Duration::from_millis(300));
        }
        let err = controller.admit(&ctx).unwrap_err();
        assert_eq!(err.limit_per_minute, 30);
        assert_eq!(err.tenant_id, "acme");
    }

    #[test]
    fn test_concurrent_checks_admit_exactly_limit() {
        let (controller, _clock) = controller();
        let controller = Arc::new(controller);
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let controller = Arc::clone(&controller);
                std::thread::spawn(move || (0..10).filter(|_| controller.allow("acme", 50)).count())
            })
            .collect();
        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 50);
    }
}
