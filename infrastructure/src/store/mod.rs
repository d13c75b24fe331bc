//! [`QueryStore`](council_application::QueryStore) adapters

mod jsonl;
mod memory;

pub use jsonl::JsonlQueryStore;
pub use memory::InMemoryQueryStore;
