//! Configuration value objects for the domain layer
//!
//! Structured configuration issues shared by the loader (infrastructure)
//! and the binary that decides whether to start.

pub mod validation;
