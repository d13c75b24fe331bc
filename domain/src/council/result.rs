//! Council result value objects

use super::member::CouncilMember;
use super::opinion::CouncilOpinion;
use crate::clinical::review::ContextReview;
use crate::core::query::Query;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// How far a council session progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Every member has answered, failed or timed out
    #[serde(rename = "stage_1_complete")]
    OpinionsCollected,
    /// The chairman synthesis has been attached
    #[serde(rename = "stage_2_complete")]
    Synthesized,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::OpinionsCollected => "stage_1_complete",
            Stage::Synthesized => "stage_2_complete",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chairman's synthesized recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub chairman_model: String,
    pub recommendation: String,
}

impl SynthesisResult {
    pub fn new(chairman_model: impl Into<String>, recommendation: impl Into<String>) -> Self {
        Self {
            chairman_model: chairman_model.into(),
            recommendation: recommendation.into(),
        }
    }
}

/// Assembled result of one council query
///
/// `opinions` is keyed by member id and holds exactly one entry per
/// configured member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilResult {
    pub session_id: Uuid,
    pub query: String,
    pub stage: Stage,
    #[serde(rename = "council_opinions")]
    pub opinions: BTreeMap<String, CouncilOpinion>,
    pub timestamp: DateTime<Utc>,
    #[serde(
        rename = "chairman_synthesis",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub synthesis: Option<SynthesisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthesis_error: Option<String>,
    /// Field names only; set on the authenticated request path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_review: Option<ContextReview>,
}

impl CouncilResult {
    /// Assemble a stage-1 result with a fresh session id
    pub fn new(query: &Query, opinions: BTreeMap<String, CouncilOpinion>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            query: query.content().to_string(),
            stage: Stage::OpinionsCollected,
            opinions,
            timestamp: Utc::now(),
            synthesis: None,
            synthesis_error: None,
            context_review: None,
        }
    }

    /// Attach a chairman synthesis, advancing the stage
    pub fn with_synthesis(mut self, synthesis: SynthesisResult) -> Self {
        self.synthesis = Some(synthesis);
        self.synthesis_error = None;
        self.stage = Stage::Synthesized;
        self
    }

    /// Record that synthesis was attempted and failed; opinions are kept
    pub fn with_synthesis_error(mut self, error: impl Into<String>) -> Self {
        self.synthesis_error = Some(error.into());
        self
    }

    pub fn with_context_review(mut self, review: ContextReview) -> Self {
        self.context_review = Some(review);
        self
    }

    pub fn success_count(&self) -> usize {
        self.opinions.values().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.opinions.len() - self.success_count()
    }

    /// Successful `(role_label, response)` pairs, in member id order
    pub fn responses(&self) -> Vec<(&str, &str)> {
        self.opinions
            .values()
            .filter_map(|o| o.response().map(|r| (o.role_label.as_str(), r)))
            .collect()
    }

    /// True when the opinion keys are exactly the given members' ids
    pub fn covers_exactly(&self, members: &[CouncilMember]) -> bool {
        self.opinions.len() == members.len()
            && members
                .iter()
                .all(|m| self.opinions.contains_key(&m.member_id))
    }
}
