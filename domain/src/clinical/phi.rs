//! Protected health information fields

/// Context fields treated as PHI
pub const PHI_FIELDS: &[&str] = &[
    "patient_name",
    "date_of_birth",
    "medical_record_number",
    "phone_number",
    "email",
];

pub fn is_phi_field(field: &str) -> bool {
    PHI_FIELDS.contains(&field)
}

/// PHI field names present among `fields`, in [`PHI_FIELDS`] order
///
/// Only names are returned; values never pass through here.
pub fn detect_phi<'a>(fields: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let present: Vec<&str> = fields.into_iter().collect();
    PHI_FIELDS
        .iter()
        .filter(|f| present.contains(*f))
        .map(|f| f.to_string())
        .collect()
}
