//! Clinical domain
//!
//! Specialty-specific council tuning and request context checks:
//! - [`specialty::SpecialtyTable`] - per-specialty model overrides and required context
//! - [`phi`] - protected health information field detection
//! - [`review::ContextReview`] - what a request's context carried and lacked

pub mod phi;
pub mod review;
pub mod specialty;
