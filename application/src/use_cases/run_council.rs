//! Run Council use case
//!
//! Fans one query out to every council member in parallel and assembles a
//! partial-failure tolerant result.

use crate::config::CouncilParams;
use crate::ports::model_backend::{CallError, ModelBackend};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use council_domain::council::opinion::FailureKind;
use council_domain::{CouncilMember, CouncilOpinion, CouncilResult, DomainError, Query};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Errors that can occur during a council dispatch
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("Council unavailable: all {} members failed", .opinions.len())]
    CouncilUnavailable {
        /// The error opinions, one per member
        opinions: BTreeMap<String, CouncilOpinion>,
    },
}

impl RunCouncilError {
    /// True when the caller's input was rejected before any call was made
    pub fn is_validation(&self) -> bool {
        matches!(self, RunCouncilError::Invalid(e) if e.is_validation())
    }
}

/// Concurrent council dispatcher
///
/// One task per member, all sharing the council deadline. Each call is also
/// bounded by `call_timeout`, which is handed to the backend so it can set it
/// on its transport.
pub struct CouncilDispatcher {
    backend: Arc<dyn ModelBackend>,
    call_timeout: Duration,
}

impl CouncilDispatcher {
    pub fn new(backend: Arc<dyn ModelBackend>, params: &CouncilParams) -> Self {
        Self {
            backend,
            call_timeout: params.call_timeout,
        }
    }

    /// Dispatch with default (no-op) progress
    pub async fn dispatch(
        &self,
        query: &str,
        members: &[CouncilMember],
        council_timeout: Duration,
    ) -> Result<CouncilResult, RunCouncilError> {
        self.dispatch_with_progress(query, members, council_timeout, &NoProgress)
            .await
    }

    /// Dispatch with progress callbacks
    pub async fn dispatch_with_progress(
        &self,
        query: &str,
        members: &[CouncilMember],
        council_timeout: Duration,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilResult, RunCouncilError> {
        let query = Query::try_new(query)?;
        CouncilMember::validate_council(members)?;

        info!(
            members = members.len(),
            timeout_secs = council_timeout.as_secs_f64(),
            "Dispatching council query"
        );
        progress.on_dispatch_start(members.len());

        let deadline = tokio::time::Instant::now() + council_timeout;
        let mut join_set = JoinSet::new();

        for member in members {
            let backend = Arc::clone(&self.backend);
            let member = member.clone();
            let question = query.content().to_string();
            let call_timeout = self.call_timeout;

            join_set.spawn(async move {
                let result = Self::call_member(&backend, &member, &question, call_timeout).await;
                (member, result)
            });
        }

        let mut opinions = BTreeMap::new();
        let mut deadline_elapsed = false;

        loop {
            match tokio::time::timeout_at(deadline, join_set.join_next()).await {
                Ok(Some(Ok((member, result)))) => {
                    let opinion = match result {
                        Ok(response) => {
                            info!(member = %member.member_id, "Council member responded");
                            CouncilOpinion::success(&member, response)
                        }
                        Err(e) => {
                            warn!(member = %member.member_id, model = %member.model, "Council member failed: {}", e);
                            let kind = if e.is_timeout() {
                                FailureKind::Timeout
                            } else {
                                FailureKind::Provider
                            };
                            CouncilOpinion::failure(&member, kind, e.to_string())
                        }
                    };
                    progress.on_member_complete(&opinion);
                    opinions.insert(member.member_id, opinion);
                }
                Ok(Some(Err(e))) => {
                    warn!("Council member task join error: {}", e);
                }
                Ok(None) => break,
                Err(_) => {
                    deadline_elapsed = true;
                    warn!(pending = join_set.len(), "Council deadline elapsed, abandoning pending members");
                    join_set.abort_all();
                    break;
                }
            }
        }

        // Every member gets exactly one entry, settled or not
        for member in members {
            if opinions.contains_key(&member.member_id) {
                continue;
            }
            let opinion = if deadline_elapsed {
                CouncilOpinion::failure(
                    member,
                    FailureKind::Timeout,
                    format!(
                        "Council deadline of {}s exceeded",
                        council_timeout.as_secs_f64()
                    ),
                )
            } else {
                CouncilOpinion::failure(
                    member,
                    FailureKind::Aborted,
                    "Member task ended without a result",
                )
            };
            progress.on_member_complete(&opinion);
            opinions.insert(member.member_id.clone(), opinion);
        }

        let result = CouncilResult::new(&query, opinions);

        if result.success_count() == 0 {
            warn!(members = members.len(), "Every council member failed");
            return Err(RunCouncilError::CouncilUnavailable {
                opinions: result.opinions,
            });
        }

        info!(
            session_id = %result.session_id,
            responses = result.success_count(),
            failures = result.failure_count(),
            "Council stage 1 complete"
        );
        progress.on_dispatch_complete(&result);
        Ok(result)
    }

    /// Query a single member, bounded by the call timeout
    async fn call_member(
        backend: &Arc<dyn ModelBackend>,
        member: &CouncilMember,
        question: &str,
        call_timeout: Duration,
    ) -> Result<String, CallError> {
        let call = backend.call(&member.model, &member.system_prompt, question, call_timeout);
        match tokio::time::timeout(call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CallError::Timeout(call_timeout)),
        }
    }
}
