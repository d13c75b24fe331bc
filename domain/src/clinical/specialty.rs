//! Specialty profiles
//!
//! A tenant's specialty picks member model overrides and the context fields
//! a request is expected to carry. Specialties without a profile use the
//! council as configured.

use crate::council::member::CouncilMember;
use crate::core::model::ModelId;
use std::collections::BTreeMap;

pub mod specialties {
    pub const PSYCHIATRY: &str = "psychiatry";
    pub const GENERAL_PRACTICE: &str = "general_practice";
    pub const CARDIOLOGY: &str = "cardiology";
}

/// Council tuning for one specialty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialtyProfile {
    /// member id -> model used instead of the member's configured model
    pub models: BTreeMap<String, ModelId>,
    pub required_context: Vec<String>,
}

impl SpecialtyProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, member_id: impl Into<String>, model: impl Into<ModelId>) -> Self {
        self.models.insert(member_id.into(), model.into());
        self
    }

    pub fn with_required_context(mut self, fields: &[&str]) -> Self {
        self.required_context = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}

/// Specialty name -> profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialtyTable {
    profiles: BTreeMap<String, SpecialtyProfile>,
}

impl SpecialtyTable {
    /// Profiles for the specialties the default council is tuned for
    pub fn builtin() -> Self {
        Self::default()
            .with_profile(
                specialties::PSYCHIATRY,
                SpecialtyProfile::new()
                    .with_model("patient_advocate", "openai/gpt-4-turbo")
                    .with_model("innovation_lead", "mistralai/mistral-large")
                    .with_required_context(&[
                        "patient_age",
                        "symptoms",
                        "medication_history",
                        "medical_history",
                        "comorbidities",
                    ]),
            )
            .with_profile(
                specialties::GENERAL_PRACTICE,
                SpecialtyProfile::new()
                    .with_model("patient_advocate", "openai/gpt-4-turbo")
                    .with_model("business_strategist", "google/gemini-pro-1.5")
                    .with_required_context(&[
                        "patient_age",
                        "symptoms",
                        "vital_signs",
                        "medical_history",
                    ]),
            )
            .with_profile(
                specialties::CARDIOLOGY,
                SpecialtyProfile::new()
                    .with_model("patient_advocate", "openai/gpt-4-turbo")
                    .with_model("innovation_lead", "meta-llama/llama-2-70b-chat"),
            )
    }

    /// Add or replace a profile
    pub fn with_profile(mut self, specialty: impl Into<String>, profile: SpecialtyProfile) -> Self {
        self.profiles.insert(specialty.into(), profile);
        self
    }

    pub fn get(&self, specialty: &str) -> Option<&SpecialtyProfile> {
        self.profiles.get(specialty)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// The council for `specialty`: same members, overridden models applied
    ///
    /// Overrides for ids that are not council members are ignored.
    pub fn members_for(&self, specialty: &str, members: &[CouncilMember]) -> Vec<CouncilMember> {
        let Some(profile) = self.get(specialty) else {
            return members.to_vec();
        };
        members
            .iter()
            .map(|member| match profile.models.get(&member.member_id) {
                Some(model) => CouncilMember {
                    model: model.clone(),
                    ..member.clone()
                },
                None => member.clone(),
            })
            .collect()
    }

    pub fn required_context(&self, specialty: &str) -> &[String] {
        self.get(specialty)
            .map(|p| p.required_context.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn council() -> Vec<CouncilMember> {
        CouncilMember::default_council()
    }

    #[test]
    fn test_psychiatry_overrides_models() {
        let members = SpecialtyTable::builtin().members_for("psychiatry", &council());
        let models: BTreeMap<&str, &str> = members
            .iter()
            .map(|m| (m.member_id.as_str(), m.model.as_str()))
            .collect();
        assert_eq!(models["clinical_expert"], "anthropic/claude-3-opus");
        assert_eq!(models["patient_advocate"], "openai/gpt-4-turbo");
        assert_eq!(models["innovation_lead"], "mistralai/mistral-large");
        assert_eq!(members.len(), 4);
    }

    #[test]
    fn test_overrides_keep_prompts_and_order() {
        let base = council();
        let members = SpecialtyTable::builtin().members_for("cardiology", &base);
        for (before, after) in base.iter().zip(&members) {
            assert_eq!(before.member_id, after.member_id);
            assert_eq!(before.system_prompt, after.system_prompt);
            assert_eq!(before.role_label, after.role_label);
        }
    }

    #[test]
    fn test_unknown_specialty_keeps_council() {
        let base = council();
        assert_eq!(SpecialtyTable::builtin().members_for("healthcare", &base), base);
        assert!(SpecialtyTable::builtin().required_context("healthcare").is_empty());
    }

    #[test]
    fn test_override_for_absent_member_ignored() {
        let table = SpecialtyTable::default().with_profile(
            "oncology",
            SpecialtyProfile::new().with_model("radiologist", "x/rad"),
        );
        let members = vec![CouncilMember::new("a", "x/a", "A", "p")];
        assert_eq!(table.members_for("oncology", &members), members);
    }

    #[test]
    fn test_required_context() {
        let table = SpecialtyTable::builtin();
        assert_eq!(table.required_context("general_practice").len(), 4);
        assert!(
            table
                .required_context("psychiatry")
                .iter()
                .any(|f| f == "medication_history")
        );
    }
}
