use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{CheckError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://safebrowsing.googleapis.com/v4/threatMatches:find";
pub const DEFAULT_CLIENT_ID: &str = "url-guard";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-wide settings, loaded once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct Config {
    api_key: SecretString,
    pub endpoint: String,
    pub client_id: String,
    pub client_version: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_client(mut self, id: impl Into<String>, version: impl Into<String>) -> Self {
        self.client_id = id.into();
        self.client_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Reject settings that could never produce a successful lookup.
    pub fn validate(&self) -> Result<()> {
        if self.api_key().trim().is_empty() {
            return Err(CheckError::Config("API key is empty".into()));
        }
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(CheckError::Config(format!(
                "endpoint must be an http(s) URL: {}",
                self.endpoint
            )));
        }
        if self.timeout.is_zero() {
            return Err(CheckError::Config("timeout must be greater than zero".into()));
        }
        Ok(())
    }
}

// Hand-written so the key never ends up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("client_version", &self.client_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}
