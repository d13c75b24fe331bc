//! Prompt domain
//!
//! System prompts for the council personas and the chairman synthesis prompt.

mod template;

pub use template::PromptTemplate;
