use anyhow::Result;
use pageqa::{config::Config, qa::QaEngine, server::HttpServer, session::QaSession};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Load the model and run the HTTP server until Ctrl+C
pub async fn serve(mut config: Config, listen: Option<String>) -> Result<()> {
    if let Some(addr) = listen {
        config.set_listen_addr(addr)?;
    }

    let engine = match QaEngine::from_config(&config.model, &config.answering) {
        Ok(engine) => Some(engine),
        Err(e) => {
            warn!("Question answering disabled: {}", e);
            None
        }
    };
    let session = Arc::new(QaSession::new(&config, engine)?);

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let http_server = HttpServer::new(config.http.clone(), session);
    let mut http_handle = tokio::spawn(async move { http_server.run(shutdown_rx).await });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
        result = &mut http_handle => {
            // Server stopped on its own (bind failure or fatal error)
            return result?;
        }
    }

    let _ = shutdown_tx.send(());
    let http_abort = http_handle.abort_handle();
    match tokio::time::timeout(Duration::from_secs(5), http_handle).await {
        Ok(result) => result??,
        Err(_) => {
            warn!("HTTP server did not shut down within 5s, aborting");
            http_abort.abort();
        }
    }
    info!("HTTP server shut down cleanly");
    Ok(())
}
