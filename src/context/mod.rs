//! Accumulated page text and combined QA context
//!
//! - `ContextStore`: URL → extracted text, in insertion order
//! - `build_context`: joins stored pages into one context string

mod assembly;
mod store;

pub use assembly::{build_context, ContextError, ContextStats};
pub use store::{ContextStore, StoredPage};
