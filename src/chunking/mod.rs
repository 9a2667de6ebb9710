//! Token window chunking
//!
//! Long contexts are tokenized once and split into overlapping windows that
//! each fit the model's input length.

mod window;

pub use window::*;
