//! Presentation layer for chairman-council
//!
//! This crate contains the HTTP surface, CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod http;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{AskArgs, Cli, Command, OutputFormat, ServeArgs};
pub use http::{ApiError, AppState, SERVICE_NAME, router};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
