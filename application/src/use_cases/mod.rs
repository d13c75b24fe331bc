//! Use cases (application services)
//!
//! Each use case orchestrates domain logic through the ports.

pub mod admission;
pub mod council_service;
pub mod resolve_credential;
pub mod run_council;
pub mod synthesize;
