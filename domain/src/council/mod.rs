//! Council domain
//!
//! Value objects for one council dispatch:
//! - [`member::CouncilMember`] - a configured model persona
//! - [`opinion::CouncilOpinion`] - one member's answer or failure
//! - [`result::CouncilResult`] - the assembled result of a query

pub mod member;
pub mod opinion;
pub mod result;
