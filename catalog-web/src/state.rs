//! Application state shared by every handler

use crate::{
    auth::{jwt::TokenService, users::UserService},
    items::ItemService,
    storage::MemoryStore,
    WebError, WebResult,
};
use catalog_core::{AccountStore, AppConfig, ItemStore};
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "sqlite")]
use crate::storage::SqliteStore;

/// Everything a request may need, cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Token issuer/verifier used by the authentication middleware
    pub tokens: TokenService,
    pub user_service: UserService,
    pub item_service: ItemService,
    /// Account store, also used by the health check
    pub accounts: Arc<dyn AccountStore>,
}

impl AppState {
    /// Build the state, choosing SQLite when a database URL is configured
    pub async fn new(config: AppConfig) -> WebResult<Self> {
        let (accounts, items) = match config.database.url.as_deref() {
            #[cfg(feature = "sqlite")]
            Some(url) => shared(Arc::new(SqliteStore::connect(url).await?)),
            #[cfg(not(feature = "sqlite"))]
            Some(url) => {
                warn!(
                    "Database URL {} ignored: built without sqlite support, using memory store",
                    url
                );
                shared(Arc::new(MemoryStore::new()))
            }
            None => {
                warn!("No database configured, using in-memory store (data is lost on restart)");
                shared(Arc::new(MemoryStore::new()))
            }
        };

        Self::with_stores(config, accounts, items).await
    }

    /// Build the state over explicit stores
    pub async fn with_stores(
        config: AppConfig,
        accounts: Arc<dyn AccountStore>,
        items: Arc<dyn ItemStore>,
    ) -> WebResult<Self> {
        let tokens = TokenService::from_config(&config.auth)?;
        let user_service = UserService::new(accounts.clone(), tokens.clone(), config.password)
            .map_err(|e| WebError::Config(format!("Failed to create user service: {}", e)))?;

        if let Some((email, password)) = config.auth.bootstrap_admin() {
            user_service
                .ensure_admin(&config.auth.admin_name, email, password)
                .await
                .map_err(|e| WebError::Config(format!("Failed to bootstrap admin: {}", e)))?;
        }

        let state = Self {
            config: Arc::new(config),
            tokens,
            user_service,
            item_service: ItemService::new(items),
            accounts,
        };

        info!("Application state initialized successfully");
        Ok(state)
    }
}

/// One backend serving both capabilities
fn shared<S>(store: Arc<S>) -> (Arc<dyn AccountStore>, Arc<dyn ItemStore>)
where
    S: AccountStore + ItemStore + 'static,
{
    let accounts: Arc<dyn AccountStore> = store.clone();
    let items: Arc<dyn ItemStore> = store;
    (accounts, items)
}
