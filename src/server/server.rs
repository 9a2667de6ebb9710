//! HTTP API Server
//!
//! Axum-based HTTP server for the pageqa API and UI.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::Method;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::HttpConfig;
use crate::session::QaSession;

use super::handlers::AppState;
use super::routes::create_router;

/// HTTP API server
pub struct HttpServer {
    config: HttpConfig,
    session: Arc<QaSession>,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: HttpConfig, session: Arc<QaSession>) -> Self {
        Self { config, session }
    }

    /// Router with CORS and tracing layers applied
    pub fn router(&self) -> Router {
        let app_state = AppState {
            session: self.session.clone(),
        };
        let mut app = create_router(app_state, self.config.ui_enabled);

        // Add CORS if enabled
        if self.config.cors_enabled {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any)
                .allow_origin(Any);
            app = app.layer(cors);
        }

        app.layer(TraceLayer::new_for_http())
    }

    /// Run the HTTP server until `shutdown` fires
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .listen_addr
            .parse()
            .context("Invalid HTTP listen address")?;

        let listener = TcpListener::bind(&addr)
            .await
            .context("Failed to bind HTTP server")?;
        info!("HTTP API server listening on http://{}", addr);
        if self.config.ui_enabled {
            info!("UI available at http://{}/", addr);
        }

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                info!("HTTP server shutting down");
            })
            .await
            .context("HTTP server error")?;

        Ok(())
    }
}
