use tokio::net::TcpListener;
use tracing::{error, info};

use super::routes::{AppState, router};
use crate::{config::ServerConfig, error::AppError};

pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub async fn start(&self) -> Result<(), AppError> {
        info!(
            "Starting color detection server on {}:{}",
            self.config.host, self.config.port
        );
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port))
            .await
            .map_err(|e| AppError::Bind(e, self.config.port))?;

        let app = router(self.state.clone(), self.config.max_upload_bytes);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(AppError::Serve)?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
