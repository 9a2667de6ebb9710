//! HTTP API and form UI
//!
//! JSON endpoints for processing URLs and asking questions, plus a small
//! HTML page that drives the same session.

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;
mod ui;

pub use handlers::AppState;
pub use routes::create_router;
pub use server::HttpServer;
