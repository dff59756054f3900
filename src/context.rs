/// Application context and dependency injection
use crate::{
    admin::{AccountDirectory, AuditLog, DisputeResolver, LifecycleEngine},
    auth::AdminAuth,
    config::{ConsoleConfig, StoreBackend},
    error::ConsoleResult,
    store::{DocumentStore, MemoryStore, SqliteStore},
};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ConsoleConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub directory: Arc<AccountDirectory>,
    pub lifecycle: Arc<LifecycleEngine>,
    pub disputes: Arc<DisputeResolver>,
    pub audit: Arc<AuditLog>,
    pub auth: Arc<AdminAuth>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ConsoleConfig) -> ConsoleResult<Self> {
        // Validate configuration
        config.validate()?;

        let store: Arc<dyn DocumentStore> = match &config.store {
            StoreBackend::Sqlite { db_path } => {
                tracing::info!("Opening SQLite document store at {:?}", db_path);
                Arc::new(SqliteStore::open(db_path).await?)
            }
            StoreBackend::Memory => {
                tracing::info!("Using in-memory document store");
                Arc::new(MemoryStore::new())
            }
        };

        let audit = AuditLog::new(store.clone());
        let directory = Arc::new(AccountDirectory::new(store.clone()));
        let lifecycle = Arc::new(LifecycleEngine::new(store.clone(), audit.clone()));
        let disputes = Arc::new(DisputeResolver::new(store.clone(), audit.clone()));
        let auth = Arc::new(AdminAuth::new(&config));

        Ok(Self {
            config: Arc::new(config),
            store,
            directory,
            lifecycle,
            disputes,
            audit: Arc::new(audit),
            auth,
        })
    }

    /// Base URL the console is reachable on
    pub fn service_url(&self) -> String {
        format!("http://{}:{}", self.config.hostname, self.config.port)
    }
}
