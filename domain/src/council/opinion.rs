//! Council opinion value object

use super::member::CouncilMember;
use serde::{Deserialize, Serialize};

/// Why a member produced no response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The call or the council deadline timed out
    Timeout,
    /// The provider answered with an error status or an unusable body
    #[default]
    Provider,
    /// The member task ended without reporting (panic or abort)
    Aborted,
}

/// Outcome half of a [`CouncilOpinion`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpinionOutcome {
    Response {
        model: String,
        response: String,
    },
    Error {
        error: String,
        #[serde(default)]
        kind: FailureKind,
    },
}

/// One member's contribution to a council result
///
/// Serialized as `{member_id, role, model, response}` on success and
/// `{member_id, role, error, kind}` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilOpinion {
    pub member_id: String,
    #[serde(rename = "role")]
    pub role_label: String,
    #[serde(flatten)]
    pub outcome: OpinionOutcome,
}

impl CouncilOpinion {
    pub fn success(member: &CouncilMember, response: impl Into<String>) -> Self {
        Self {
            member_id: member.member_id.clone(),
            role_label: member.role_label.clone(),
            outcome: OpinionOutcome::Response {
                model: member.model.to_string(),
                response: response.into(),
            },
        }
    }

    pub fn failure(member: &CouncilMember, kind: FailureKind, error: impl Into<String>) -> Self {
        Self {
            member_id: member.member_id.clone(),
            role_label: member.role_label.clone(),
            outcome: OpinionOutcome::Error {
                error: error.into(),
                kind,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, OpinionOutcome::Response { .. })
    }

    pub fn response(&self) -> Option<&str> {
        match &self.outcome {
            OpinionOutcome::Response { response, .. } => Some(response),
            OpinionOutcome::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            OpinionOutcome::Error { error, .. } => Some(error),
            OpinionOutcome::Response { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            OpinionOutcome::Error { kind, .. } => Some(*kind),
            OpinionOutcome::Response { .. } => None,
        }
    }
}
