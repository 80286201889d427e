//! Catalog Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebError, WebResult};
use axum::serve;
use catalog_core::AppConfig;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Main catalog web server
pub struct CatalogServer {
    config: AppConfig,
    state: AppState,
}

impl CatalogServer {
    /// Create a new server, connecting stores and bootstrapping the admin account
    pub async fn new(config: AppConfig) -> WebResult<Self> {
        config.validate()?;
        let state = AppState::new(config.clone()).await?;

        Ok(Self { config, state })
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.server.address();

        info!("Starting catalog web server");
        info!("Server address: http://{}", address);
        info!("Development mode: {}", self.config.server.dev_mode);

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> WebResult<()> {
        let app = create_app(self.state);

        if let Ok(local) = listener.local_addr() {
            info!("Server listening on http://{}", local);
        }

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down gracefully");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Builder for CatalogServer
pub struct CatalogServerBuilder {
    config: AppConfig,
}

impl CatalogServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn with_config(config: AppConfig) -> Self {
        Self { config }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Enable development mode
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.server.dev_mode = dev_mode;
        self
    }

    /// Set database URL
    pub fn database_url<S: Into<String>>(mut self, database_url: S) -> Self {
        self.config.database.url = Some(database_url.into());
        self
    }

    /// Set the token signing secret
    pub fn jwt_secret<S: Into<String>>(mut self, secret: S) -> Self {
        self.config.auth.jwt_secret = secret.into();
        self
    }

    /// Build the server
    pub async fn build(self) -> WebResult<CatalogServer> {
        CatalogServer::new(self.config).await
    }
}

impl Default for CatalogServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::PasswordConfig;

    #[tokio::test]
    async fn test_server_creation() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "server-test-secret-0123456789abcdef".to_string();
        config.password = PasswordConfig::minimal();

        let server = CatalogServer::new(config).await;
        assert!(server.is_ok());
    }

    #[tokio::test]
    async fn test_server_requires_secret() {
        let server = CatalogServer::new(AppConfig::default()).await;
        assert!(matches!(server, Err(WebError::Core(_))));
    }

    #[test]
    fn test_server_builder() {
        let builder = CatalogServerBuilder::new()
            .host("localhost")
            .port(3000)
            .dev_mode(true)
            .database_url("sqlite::memory:")
            .jwt_secret("secret");

        assert_eq!(builder.config.server.host, "localhost");
        assert_eq!(builder.config.server.port, 3000);
        assert!(builder.config.server.dev_mode);
        assert_eq!(builder.config.database.url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(builder.config.auth.jwt_secret, "secret");
    }
}
