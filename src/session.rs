//! User sign-in state machine.
//!
//! `SignedOut -> OtpPending -> SignedIn`, and back to `SignedOut` on logout,
//! on a failed startup probe, or whenever any authenticated call is answered
//! with 401/403. The bearer token is owned here; it is written to the durable
//! store only by these transitions.

use crate::backend::{ApiRequest, Backend, Credential, Reply};
use crate::errors::ClientError;
use crate::guard::FormLock;
use crate::models::{TokenResponse, User};
use crate::storage::{ACCESS_TOKEN_KEY, KeyValueStore};
use serde_json::json;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    OtpPending { email: String },
    SignedIn { user: User },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpForm {
    Request,
    Verify,
}

pub struct SessionManager<B, S> {
    backend: B,
    store: S,
    state: watch::Sender<SessionState>,
    credential: Mutex<Option<String>>,
    request_form: FormLock,
    verify_form: FormLock,
}

impl<B: Backend, S: KeyValueStore> SessionManager<B, S> {
    pub fn new(backend: B, store: S) -> Self {
        let (state, _) = watch::channel(SessionState::SignedOut);
        Self {
            backend,
            store,
            state,
            credential: Mutex::new(None),
            request_form: FormLock::new(),
            verify_form: FormLock::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        match &*self.state.borrow() {
            SessionState::SignedIn { user } => Some(user.clone()),
            _ => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::SignedIn { .. })
    }

    /// Whether the trigger of `form` should be disabled.
    pub fn is_busy(&self, form: OtpForm) -> bool {
        match form {
            OtpForm::Request => self.request_form.is_busy(),
            OtpForm::Verify => self.verify_form.is_busy(),
        }
    }

    pub async fn request_otp(&self, email: &str) -> Result<(), ClientError> {
        let _guard = self.request_form.acquire().ok_or(ClientError::Busy)?;
        let email = email.trim();
        let request = ApiRequest::post("/auth/send-otp", &json!({ "email": email }))?;

        self.backend.call(request).await?;
        info!("verification code requested");
        self.state.send_if_modified(|state| {
            if matches!(state, SessionState::SignedIn { .. }) {
                return false;
            }
            *state = SessionState::OtpPending {
                email: email.to_string(),
            };
            true
        });
        Ok(())
    }

    /// Trades a one-time code for a bearer token. Any rejection from the
    /// server is reported as [`ClientError::InvalidCode`] without detail.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<User, ClientError> {
        let _guard = self.verify_form.acquire().ok_or(ClientError::Busy)?;
        let request = ApiRequest::post(
            "/auth/verify-otp",
            &json!({ "email": email.trim(), "otp": code.trim() }),
        )?;

        let token: TokenResponse = match self.backend.call(request).await {
            Ok(reply) => reply.into_json()?,
            Err(ClientError::Api(err)) => {
                debug!(status = %err.status, "verification code rejected");
                return Err(ClientError::InvalidCode);
            }
            Err(err) => return Err(err),
        };

        if let Err(err) = self.store.set(ACCESS_TOKEN_KEY, &token.access_token).await {
            warn!("signed in but failed to persist credential: {err}");
        }
        *self.lock_credential() = Some(token.access_token);
        info!("signed in");
        self.state.send_replace(SessionState::SignedIn {
            user: token.user.clone(),
        });
        Ok(token.user)
    }

    /// The "back" action of the verify form.
    pub fn cancel_otp(&self) {
        self.state.send_if_modified(|state| {
            if matches!(state, SessionState::OtpPending { .. }) {
                *state = SessionState::SignedOut;
                true
            } else {
                false
            }
        });
    }

    /// Restores a session from the durable credential with a single probe.
    ///
    /// Returns `Ok(None)` when there is nothing to restore. A failed probe
    /// clears the credential and is final.
    pub async fn bootstrap(&self) -> Result<Option<User>, ClientError> {
        if let Some(user) = self.user() {
            return Ok(Some(user));
        }
        let Some(token) = self.store.get(ACCESS_TOKEN_KEY).await else {
            return Ok(None);
        };
        *self.lock_credential() = Some(token);

        let probe = ApiRequest::get("/auth/me").authenticated();
        match self.call(probe).await.and_then(Reply::into_json::<User>) {
            Ok(user) => {
                info!("session restored");
                self.state.send_replace(SessionState::SignedIn { user: user.clone() });
                Ok(Some(user))
            }
            Err(err) => {
                self.sign_out("startup probe failed").await;
                Err(err)
            }
        }
    }

    pub async fn logout(&self) {
        self.sign_out("logout").await;
    }

    /// Sends `request` through the backend, attaching the bearer token when
    /// the request is authenticated. A 401/403 answer signs the user out.
    pub async fn call(&self, request: ApiRequest) -> Result<Reply, ClientError> {
        let request = match self.current_credential() {
            Some(token) if request.auth_required => {
                request.with_credential(Credential::Bearer(token))
            }
            _ => request,
        };

        let result = self.backend.call(request).await;
        if let Err(err) = &result {
            if err.is_unauthorized() {
                warn!("authorization rejected by server, signing out");
                self.sign_out("authorization rejected").await;
            }
        }
        result
    }

    async fn sign_out(&self, reason: &str) {
        let held = self.lock_credential().take().is_some();
        if held || self.store.get(ACCESS_TOKEN_KEY).await.is_some() {
            if let Err(err) = self.store.remove(ACCESS_TOKEN_KEY).await {
                warn!("failed to clear stored credential: {err}");
            }
            info!(reason, "signed out");
        }
        self.state.send_if_modified(|state| {
            if *state == SessionState::SignedOut {
                false
            } else {
                *state = SessionState::SignedOut;
                true
            }
        });
    }

    fn current_credential(&self) -> Option<String> {
        self.lock_credential().clone()
    }

    fn lock_credential(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.credential.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
