use crate::errors::ConfigError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_DATA_PATH: &str = "data/client.json";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub data_path: PathBuf,
    pub admin_password: Option<String>,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("data_path", &self.data_path)
            .field("admin_password", &self.admin_password.as_ref().map(|_| ".."))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let request_timeout = match read("LEISURE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|err| ConfigError::Invalid {
                    key: "LEISURE_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: err.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let config = Self {
            api_url: read("LEISURE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            data_path: read("LEISURE_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            admin_password: read("LEISURE_ADMIN_PASSWORD"),
            request_timeout,
        };
        debug!(?config, "configuration loaded");
        Ok(config)
    }
}
