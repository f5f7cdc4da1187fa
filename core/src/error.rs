//! Error types for the staff directory client.
//!
//! # Design
//! Failures fall into three kinds. `Transport` means the request never
//! completed. `Remote` means the server answered, either with a non-2xx status
//! or with a body that does not decode into the requested type. `Local` covers
//! problems detected before anything is sent. Nothing is retried; every error
//! reaches the caller unchanged.

use thiserror::Error;

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Remote,
    Local,
}

/// Errors returned by `ResourceClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or its response could not be read.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The server answered 2xx but the body is not the expected JSON.
    #[error("undecodable response body (HTTP {status}): {source}")]
    Decode {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The server answered but the body is not valid UTF-8.
    #[error("response body is not UTF-8 (HTTP {status}): {source}")]
    NonUtf8Body {
        status: u16,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A header value (usually the access token) is not a legal HTTP header value.
    #[error("invalid value for header {name}")]
    InvalidHeader {
        name: String,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    /// reqwest rejected the request while building it; nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// `upload` was called on an endpoint without an upload URL.
    #[error("resource has no upload endpoint")]
    NoUploadEndpoint,

    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Status { .. } | ApiError::Decode { .. } | ApiError::NonUtf8Body { .. } => {
                ErrorKind::Remote
            }
            ApiError::Encode(_)
            | ApiError::InvalidHeader { .. }
            | ApiError::InvalidRequest(_)
            | ApiError::InvalidUrl { .. }
            | ApiError::NoUploadEndpoint
            | ApiError::Config(_) => ErrorKind::Local,
        }
    }

    /// Status code of the server response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. }
            | ApiError::Decode { status, .. }
            | ApiError::NonUtf8Body { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw body of the server response, when there was one.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } | ApiError::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::InvalidRequest(err)
        } else {
            ApiError::Transport(Box::new(err))
        }
    }
}
