//! Progress notification port
//!
//! Defines the interface for reporting progress during a council dispatch.

use council_domain::{CouncilOpinion, CouncilResult};

/// Callback for progress updates during council execution
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, logs, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once before any member call is issued
    fn on_dispatch_start(&self, total_members: usize);

    /// Called when a member settles (response, error or timeout)
    fn on_member_complete(&self, opinion: &CouncilOpinion);

    /// Called after the result has been assembled
    fn on_dispatch_complete(&self, result: &CouncilResult);

    /// Called when the chairman stage starts
    fn on_synthesis_start(&self) {}

    /// Called when the chairman stage ends
    fn on_synthesis_complete(&self, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_dispatch_start(&self, _total_members: usize) {}
    fn on_member_complete(&self, _opinion: &CouncilOpinion) {}
    fn on_dispatch_complete(&self, _result: &CouncilResult) {}
}
