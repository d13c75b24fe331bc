//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`CouncilParams`] - dispatch and synthesis timeouts, chairman model
//! - [`AuthParams`] - resolution cache TTL/capacity and the admission window

pub mod auth_params;
pub mod council_params;

pub use auth_params::AuthParams;
pub use council_params::CouncilParams;
