//! HTTP access to the leisure-tracking REST API.
//!
//! The backend only moves requests and normalizes failures into
//! [`ClientError`]. It never decides what a 401 means; that belongs to the
//! session owning the credential.

use crate::errors::{ApiError, ClientError};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const ADMIN_PASSWORD_HEADER: &str = "X-Admin-Password";

/// Secret attached to a request, depending on the channel.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    AdminPassword(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Bearer(_) => f.write_str("Bearer(..)"),
            Credential::AdminPassword(_) => f.write_str("AdminPassword(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub auth_required: bool,
    pub credential: Option<Credential>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            auth_required: false,
            credential: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: &impl Serialize) -> Result<Self, ClientError> {
        let mut request = Self::new(Method::POST, path);
        request.body = Some(serde_json::to_value(body)?);
        Ok(request)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn authenticated(mut self) -> Self {
        self.auth_required = true;
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// The credential that will actually travel with the request.
    pub fn effective_credential(&self) -> Option<&Credential> {
        self.credential.as_ref().filter(|_| self.auth_required)
    }
}

/// Successful outcome of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Status 204; distinct from an empty JSON object.
    NoContent,
    Json(Value),
}

impl Reply {
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        match self {
            Reply::Json(value) => Ok(serde_json::from_value(value)?),
            Reply::NoContent => Err(ClientError::Transport(
                "expected a response body but the server sent none".to_string(),
            )),
        }
    }
}

pub trait Backend {
    fn call(&self, request: ApiRequest) -> impl Future<Output = Result<Reply, ClientError>>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Backend for HttpBackend {
    async fn call(&self, request: ApiRequest) -> Result<Reply, ClientError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, path = %request.path, "api call");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        builder = match request.effective_credential() {
            Some(Credential::Bearer(token)) => builder.bearer_auth(token),
            Some(Credential::AdminPassword(password)) => {
                builder.header(ADMIN_PASSWORD_HEADER, password)
            }
            None => builder,
        };
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Reply::NoContent);
        }

        let bytes = response.bytes().await?;
        if !status.is_success() {
            let err = ApiError::from_body(status, &bytes);
            debug!(%status, path = %request.path, "api error: {}", err.message);
            return Err(err.into());
        }

        Ok(Reply::Json(serde_json::from_slice(&bytes)?))
    }
}
