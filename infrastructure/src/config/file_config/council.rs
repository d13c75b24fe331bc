//! Council configuration from TOML (`[council]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [council]
//! timeout_seconds = 120
//! chairman_model = "google/gemini-2.0-flash"
//! synthesis = true
//!
//! [[council.members]]
//! id = "clinical_expert"
//! model = "anthropic/claude-3-opus"
//! role = "Clinical Advisor"
//!
//! [council.specialties.psychiatry]
//! required_context = ["patient_age", "symptoms"]
//! models = { clinical_expert = "anthropic/claude-3.5-sonnet" }
//! ```
//!
//! A member without `system_prompt` gets the built-in prompt for its id, or
//! the generic council prompt for its role when the id is not built in.
//! Leaving out `[[council.members]]` entirely keeps the four-member default.
//! A `[council.specialties.<name>]` table replaces the built-in profile of
//! that name.

use council_application::CouncilParams;
use council_domain::{
    ConfigIssue, ConfigIssueCode, CouncilMember, ModelId, PromptTemplate, SpecialtyProfile,
    SpecialtyTable,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// One `[[council.members]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMemberConfig {
    pub id: String,
    pub model: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl FileMemberConfig {
    fn from_member(member: &CouncilMember) -> Self {
        Self {
            id: member.member_id.clone(),
            model: member.model.to_string(),
            role: member.role_label.clone(),
            system_prompt: None,
        }
    }
}

/// One `[council.specialties.<name>]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSpecialtyConfig {
    /// member id -> model
    pub models: BTreeMap<String, String>,
    pub required_context: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Shared deadline for the whole fan-out
    pub timeout_seconds: u64,
    /// Bound on each member call
    pub call_timeout_seconds: u64,
    pub chairman_model: String,
    pub chairman_timeout_seconds: u64,
    /// Run the chairman stage unless a request opts out
    pub synthesis: bool,
    /// Label stored with persisted queries
    pub domain: String,
    pub members: Vec<FileMemberConfig>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub specialties: BTreeMap<String, FileSpecialtyConfig>,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
            call_timeout_seconds: 120,
            chairman_model: ModelId::default_chairman().to_string(),
            chairman_timeout_seconds: 90,
            synthesis: false,
            domain: "healthcare".to_string(),
            members: CouncilMember::default_council()
                .iter()
                .map(FileMemberConfig::from_member)
                .collect(),
            specialties: BTreeMap::new(),
        }
    }
}

impl FileCouncilConfig {
    /// Build the council, filling in built-in prompts by member id
    pub fn to_members(&self) -> (Vec<CouncilMember>, Vec<ConfigIssue>) {
        let builtin = CouncilMember::default_council();
        let mut issues = Vec::new();
        let mut members = Vec::with_capacity(self.members.len());

        for entry in &self.members {
            let prompt = match &entry.system_prompt {
                Some(prompt) => prompt.clone(),
                None => match builtin.iter().find(|m| m.member_id == entry.id) {
                    Some(known) => known.system_prompt.clone(),
                    None => PromptTemplate::council_member_system(&entry.role),
                },
            };
            members.push(CouncilMember::new(
                entry.id.clone(),
                ModelId::new(entry.model.clone()),
                entry.role.clone(),
                prompt,
            ));
        }

        if let Err(e) = CouncilMember::validate_council(&members) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidCouncil,
                format!("council.members: {}", e),
            ));
        }

        (members, issues)
    }

    /// Built-in specialty profiles with configured tables layered on top
    pub fn to_specialties(
        &self,
        members: &[CouncilMember],
    ) -> (SpecialtyTable, Vec<ConfigIssue>) {
        let mut table = SpecialtyTable::builtin();
        let mut issues = Vec::new();

        for (specialty, entry) in &self.specialties {
            let mut profile = SpecialtyProfile::new();
            for (member_id, model) in &entry.models {
                if model.trim().is_empty() {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::InvalidCouncil,
                        format!(
                            "council.specialties.{}: empty model for '{}'",
                            specialty, member_id
                        ),
                    ));
                    continue;
                }
                if !members.iter().any(|m| &m.member_id == member_id) {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::UnknownMember {
                            specialty: specialty.clone(),
                            member_id: member_id.clone(),
                        },
                        format!(
                            "council.specialties.{}: '{}' is not a council member; override ignored",
                            specialty, member_id
                        ),
                    ));
                }
                profile = profile.with_model(member_id.clone(), ModelId::new(model.clone()));
            }
            profile.required_context = entry.required_context.clone();
            table = table.with_profile(specialty.clone(), profile);
        }

        (table, issues)
    }

    pub fn to_params(&self) -> CouncilParams {
        CouncilParams::default()
            .with_council_timeout(Duration::from_secs(self.timeout_seconds))
            .with_call_timeout(Duration::from_secs(self.call_timeout_seconds))
            .with_chairman(
                ModelId::new(self.chairman_model.clone()),
                Duration::from_secs(self.chairman_timeout_seconds),
            )
            .with_synthesis_by_default(self.synthesis)
            .with_domain(self.domain.clone())
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let (members, mut issues) = self.to_members();
        issues.extend(self.to_specialties(&members).1);
        for (field, value) in [
            ("council.timeout_seconds", self.timeout_seconds),
            ("council.call_timeout_seconds", self.call_timeout_seconds),
            ("council.chairman_timeout_seconds", self.chairman_timeout_seconds),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroValue {
                        field: field.to_string(),
                    },
                    format!("{} must be greater than zero", field),
                ));
            }
        }
        if self.chairman_model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidCouncil,
                "council.chairman_model must not be empty",
            ));
        }
        if self.call_timeout_seconds > self.timeout_seconds {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidCouncil,
                "council.call_timeout_seconds exceeds council.timeout_seconds; the council deadline applies first",
            ));
        }
        issues
    }
}
