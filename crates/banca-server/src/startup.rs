//! Server startup and graceful shutdown.

use crate::di::build_app_context;
use banca_config::AppConfig;
use banca_core::BancaError;
use banca_core::BancaResult;
use banca_rest::{create_router, AppState};
use tokio::signal;
use tracing::info;

/// Runs the server until a shutdown signal arrives.
pub async fn run(config: AppConfig) -> BancaResult<()> {
    let context = build_app_context(&config).await?;

    // Background staleness sweeps start with the server and stop with it
    let sweeper_handle = context.sweeper.start();

    let state = AppState::from_module(context.module.as_ref(), context.bus.clone());
    let router = create_router(state, &config.server);

    let addr = config.server.addr();
    info!("Starting REST server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BancaError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BancaError::Internal(format!("REST server error: {}", e)))?;

    // Stop the sweeper first, then complete the bus so subscriber streams
    // end after draining
    context.sweeper.shutdown();
    context.bus.close();
    let _ = sweeper_handle.await;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
