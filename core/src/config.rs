//! Client configuration, built in code or read from the environment.

use std::env;
use std::time::Duration;

use crate::auth::AuthContext;
use crate::error::ApiError;

/// Development address of the staff directory backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5002";

pub const ENV_BASE_URL: &str = "STAFFDESK_BASE_URL";
pub const ENV_TOKEN: &str = "STAFFDESK_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "STAFFDESK_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth: AuthContext,
    /// `None` means requests are never timed out.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: AuthContext::anonymous(),
            timeout: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthContext::new(token);
        self
    }

    pub fn with_auth(mut self, auth: AuthContext) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `STAFFDESK_BASE_URL`, `STAFFDESK_TOKEN` and
    /// `STAFFDESK_TIMEOUT_SECS`. Only the timeout can fail to parse.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_url = lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let auth = AuthContext::from_option(lookup(ENV_TOKEN));
        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e| {
                    ApiError::Config(format!("{ENV_TIMEOUT_SECS}={raw:?} is not a number: {e}"))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };
        Ok(Self {
            base_url,
            auth,
            timeout,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
