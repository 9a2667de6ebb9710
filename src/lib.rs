//! pageqa: extractive question answering over web pages
//!
//! Features:
//! - Site-aware HTML text extraction (Wikipedia, GeeksForGeeks, generic pages)
//! - In-memory page store and combined context assembly
//! - Sliding-window span search with an ONNX Runtime QA model
//! - HTTP API and form UI via axum

pub mod chunking;
pub mod config;
pub mod context;
pub mod qa;
pub mod scraping;
pub mod server;
pub mod session;
pub mod util;

pub use config::Config;
pub use qa::Answer;
pub use session::QaSession;
