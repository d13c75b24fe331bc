//! OpenRouter adapter
//!
//! One reqwest client shared by every council member and the chairman.

pub mod gateway;
pub mod protocol;

pub use gateway::{OpenRouterBackend, OpenRouterSettings};
