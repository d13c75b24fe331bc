//! Council member configuration

use crate::core::error::DomainError;
use crate::core::model::ModelId;
use crate::prompt::PromptTemplate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A configured model persona queried on every council request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilMember {
    pub member_id: String,
    pub model: ModelId,
    pub role_label: String,
    pub system_prompt: String,
}

impl CouncilMember {
    pub fn new(
        member_id: impl Into<String>,
        model: impl Into<ModelId>,
        role_label: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            model: model.into(),
            role_label: role_label.into(),
            system_prompt: system_prompt.into(),
        }
    }

    /// The four-member advisory council
    pub fn default_council() -> Vec<CouncilMember> {
        vec![
            CouncilMember::new(
                "clinical_expert",
                "anthropic/claude-3-opus",
                "Clinical Advisor",
                PromptTemplate::clinical_advisor_system(),
            ),
            CouncilMember::new(
                "patient_advocate",
                "openai/gpt-4-turbo-preview",
                "Patient Experience Advisor",
                PromptTemplate::patient_advocate_system(),
            ),
            CouncilMember::new(
                "business_strategist",
                "google/gemini-2.0-flash",
                "Business & Operations Advisor",
                PromptTemplate::business_strategist_system(),
            ),
            CouncilMember::new(
                "innovation_lead",
                "meta-llama/llama-3-70b-instruct",
                "Innovation & Technology Advisor",
                PromptTemplate::innovation_lead_system(),
            ),
        ]
    }

    /// Check that a council is usable: non-empty, unique ids, no blank fields
    pub fn validate_council(members: &[CouncilMember]) -> Result<(), DomainError> {
        if members.is_empty() {
            return Err(DomainError::NoMembers);
        }
        let mut seen = HashSet::new();
        for member in members {
            if member.member_id.trim().is_empty() {
                return Err(DomainError::InvalidMember("empty member id".to_string()));
            }
            if member.model.as_str().trim().is_empty() {
                return Err(DomainError::InvalidMember(format!(
                    "{}: empty model id",
                    member.member_id
                )));
            }
            if !seen.insert(member.member_id.as_str()) {
                return Err(DomainError::DuplicateMember(member.member_id.clone()));
            }
        }
        Ok(())
    }
}
