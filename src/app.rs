use crate::admin::AdminSession;
use crate::backend::{Backend, HttpBackend};
use crate::config::ClientConfig;
use crate::entries::EntryController;
use crate::errors::ClientError;
use crate::session::SessionManager;
use crate::stats::StatisticsController;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use std::sync::Arc;

/// Every controller, wired to one backend and one credential store.
pub struct App<B, S> {
    pub session: Arc<SessionManager<B, S>>,
    pub entries: EntryController<B, S>,
    pub stats: StatisticsController<B, S>,
    pub admin: AdminSession<B, MemoryStore>,
    pub admin_password: Option<String>,
}

impl App<HttpBackend, FileStore> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let backend = HttpBackend::new(config.api_url.clone(), config.request_timeout)?;
        let store = FileStore::new(config.data_path.clone());
        Ok(Self::with_parts(backend, store, config.admin_password.clone()))
    }
}

impl<B: Backend + Clone, S: KeyValueStore> App<B, S> {
    pub fn with_parts(backend: B, store: S, admin_password: Option<String>) -> Self {
        let session = Arc::new(SessionManager::new(backend.clone(), store));
        Self {
            entries: EntryController::new(Arc::clone(&session)),
            stats: StatisticsController::new(Arc::clone(&session)),
            admin: AdminSession::new(backend, MemoryStore::new()),
            session,
            admin_password,
        }
    }
}
