//! Gate for the cross-user admin views.
//!
//! There is no login endpoint: the shared passphrase is tried on a real data
//! call and kept only for the lifetime of the session store once accepted.
//! Any 401/403 on any admin call locks the view again.

use crate::backend::{ApiRequest, Backend, Credential, Reply};
use crate::errors::ClientError;
use crate::guard::FormLock;
use crate::models::{UserStat, WordCloudData};
use crate::storage::{ADMIN_PASSWORD_KEY, KeyValueStore};
use crate::words::WordCloudView;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{info, warn};

const USERS_STATS_PATH: &str = "/admin/users-stats";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminState {
    Locked,
    Unlocked,
}

/// Both halves of the admin dashboard; each reports on its own.
#[derive(Debug)]
pub struct AdminDashboard {
    pub users: Result<Vec<UserStat>, ClientError>,
    pub word_clouds: Result<WordCloudView, ClientError>,
}

pub struct AdminSession<B, S> {
    backend: B,
    store: S,
    state: watch::Sender<AdminState>,
    passphrase: Mutex<Option<String>>,
    unlock_form: FormLock,
}

impl<B: Backend, S: KeyValueStore> AdminSession<B, S> {
    pub fn new(backend: B, store: S) -> Self {
        let (state, _) = watch::channel(AdminState::Locked);
        Self {
            backend,
            store,
            state,
            passphrase: Mutex::new(None),
            unlock_form: FormLock::new(),
        }
    }

    pub fn state(&self) -> AdminState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AdminState> {
        self.state.subscribe()
    }

    pub fn is_unlocked(&self) -> bool {
        self.state() == AdminState::Unlocked
    }

    /// Picks up a passphrase accepted earlier in this session.
    pub async fn restore(&self) -> AdminState {
        if self.is_unlocked() {
            return AdminState::Unlocked;
        }
        if let Some(passphrase) = self.store.get(ADMIN_PASSWORD_KEY).await {
            *self.lock_passphrase() = Some(passphrase);
            self.state.send_replace(AdminState::Unlocked);
        }
        self.state()
    }

    /// Tries `passphrase` against the users-stats endpoint. Other admin calls
    /// only see the passphrase once the server has accepted it.
    pub async fn unlock(&self, passphrase: &str) -> Result<Vec<UserStat>, ClientError> {
        let _guard = self.unlock_form.acquire().ok_or(ClientError::Busy)?;
        let request = with_passphrase(ApiRequest::get(USERS_STATS_PATH), passphrase.to_string());

        let result = self.backend.call(request).await.and_then(Reply::into_json);
        let users: Vec<UserStat> = match result {
            Ok(users) => users,
            Err(err) => {
                self.discard("passphrase not accepted").await;
                return Err(err);
            }
        };

        *self.lock_passphrase() = Some(passphrase.to_string());
        if let Err(err) = self.store.set(ADMIN_PASSWORD_KEY, passphrase).await {
            warn!("admin unlocked but passphrase was not stored: {err}");
        }
        info!("admin view unlocked");
        self.state.send_replace(AdminState::Unlocked);
        Ok(users)
    }

    pub fn is_unlocking(&self) -> bool {
        self.unlock_form.is_busy()
    }

    pub async fn lock(&self) {
        self.discard("locked by user").await;
    }

    pub async fn users_stats(&self) -> Result<Vec<UserStat>, ClientError> {
        self.call(ApiRequest::get(USERS_STATS_PATH))
            .await
            .and_then(Reply::into_json)
    }

    pub async fn word_clouds(&self) -> Result<WordCloudView, ClientError> {
        let data: WordCloudData = self
            .call(ApiRequest::get("/admin/word-cloud-data"))
            .await
            .and_then(Reply::into_json)?;
        Ok(WordCloudView::from_data(&data))
    }

    pub async fn load_dashboard(&self) -> AdminDashboard {
        let (users, word_clouds) = tokio::join!(self.users_stats(), self.word_clouds());
        AdminDashboard { users, word_clouds }
    }

    async fn call(&self, request: ApiRequest) -> Result<Reply, ClientError> {
        let passphrase = self.lock_passphrase().clone().ok_or(ClientError::Locked)?;
        let request = with_passphrase(request, passphrase);

        let result = self.backend.call(request).await;
        if let Err(err) = &result {
            if err.is_unauthorized() {
                warn!("admin passphrase rejected by server");
                self.discard("authorization rejected").await;
            }
        }
        result
    }

    async fn discard(&self, reason: &str) {
        self.lock_passphrase().take();
        if let Err(err) = self.store.remove(ADMIN_PASSWORD_KEY).await {
            warn!("failed to discard admin passphrase: {err}");
        }
        if self.state.send_replace(AdminState::Locked) == AdminState::Unlocked {
            info!(reason, "admin view locked");
        }
    }

    fn lock_passphrase(&self) -> MutexGuard<'_, Option<String>> {
        self.passphrase.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn with_passphrase(request: ApiRequest, passphrase: String) -> ApiRequest {
    request
        .authenticated()
        .with_credential(Credential::AdminPassword(passphrase))
}
