//! Access-token handling.
//!
//! The token is supplied by the caller, either once when a client is built or
//! per call through `ResourceClient::with_auth`. Whether it is sent at all is
//! decided by the endpoint's `AuthPolicy`.

use std::fmt;

use crate::http::ACCESS_TOKEN_HEADER;

/// Optional access token attached to outgoing requests.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    token: Option<String>,
}

impl AuthContext {
    /// An empty token is treated as no token.
    pub fn new(token: impl Into<String>) -> Self {
        Self::from_option(Some(token.into()))
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// Empty strings count as no token.
    pub fn from_option(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.token.is_none()
    }
}

// Keep tokens out of logs.
impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = self.token.as_ref().map(|_| "<redacted>");
        f.debug_struct("AuthContext").field("token", &token).finish()
    }
}

/// Whether an endpoint sends the access-token header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthPolicy {
    #[default]
    Attach,
    Omit,
}

impl AuthPolicy {
    /// Header to add for `auth`, if any. An absent or empty token never yields one.
    pub fn header(self, auth: &AuthContext) -> Option<(String, String)> {
        match (self, auth.token()) {
            (AuthPolicy::Attach, Some(token)) if !token.is_empty() => {
                Some((ACCESS_TOKEN_HEADER.to_string(), token.to_string()))
            }
            _ => None,
        }
    }
}
