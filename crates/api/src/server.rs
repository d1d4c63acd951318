//! Process bootstrap: wire stores from config, bind, serve until a shutdown signal.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use inkwell_infra::AppConfig;

use crate::app::{self, services};

/// Build services from `config` and serve HTTP until Ctrl-C / SIGTERM.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let services = Arc::new(services::build_services(&config).await?);
    let router = app::build_app(services);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
