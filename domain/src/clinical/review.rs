//! Request context review

use super::phi::detect_phi;
use super::specialty::SpecialtyTable;
use serde::{Deserialize, Serialize};

/// Field-name summary of a request's clinical context
///
/// Holds names only, so it is safe to log and persist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextReview {
    pub specialty: String,
    /// PHI fields present in the context
    #[serde(default)]
    pub phi_fields: Vec<String>,
    /// Fields the specialty expects that the context lacks
    #[serde(default)]
    pub missing_context: Vec<String>,
}

impl ContextReview {
    pub fn review<'a>(
        specialty: &str,
        table: &SpecialtyTable,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let fields: Vec<&str> = fields.into_iter().collect();
        let missing_context = table
            .required_context(specialty)
            .iter()
            .filter(|f| !fields.contains(&f.as_str()))
            .cloned()
            .collect();
        Self {
            specialty: specialty.to_string(),
            phi_fields: detect_phi(fields.iter().copied()),
            missing_context,
        }
    }

    pub fn has_phi(&self) -> bool {
        !self.phi_fields.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_context.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_psychiatry_review() {
        let review = ContextReview::review(
            "psychiatry",
            &SpecialtyTable::builtin(),
            ["patient_age", "symptoms", "patient_name", "comorbidities"],
        );
        assert!(review.has_phi());
        assert_eq!(review.phi_fields, vec!["patient_name"]);
        assert_eq!(
            review.missing_context,
            vec!["medication_history", "medical_history"]
        );
        assert!(!review.is_complete());
    }

    #[test]
    fn test_specialty_without_requirements() {
        let review =
            ContextReview::review("healthcare", &SpecialtyTable::builtin(), Vec::<&str>::new());
        assert!(!review.has_phi());
        assert!(review.is_complete());
        assert_eq!(review.specialty, "healthcare");
    }
}
