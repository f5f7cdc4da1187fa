//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only I/O seam of the crate. It must hand back every
//! response it receives, 4xx and 5xx included, so that status interpretation
//! stays in `ResourceClient`. Redirects are not followed, so a 3xx reaches
//! the caller as a status error. Failures to complete the exchange are
//! `ApiError::Transport`. Header values that cannot go on the wire are
//! rejected as `ApiError::InvalidHeader` before anything is sent, and a body
//! that is not UTF-8 is `ApiError::NonUtf8Body`.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{redirect, Method};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs a single HTTP round-trip.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport. `timeout` of `None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .redirect(redirect::Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client, keeping whatever settings it was built with.
    ///
    /// Default headers, proxies and the redirect policy all come from
    /// `client`. Build it with `redirect::Policy::none()` to keep 3xx
    /// responses visible to the caller.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn to_header_map(headers: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::Config(format!("invalid header name {name:?}: {e}")))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|source| ApiError::InvalidHeader {
                name: name.clone(),
                source,
            })?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let headers = to_header_map(&request.headers)?;
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url)
            .headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let bytes = response.bytes().await?;
        let body = String::from_utf8(bytes.to_vec())
            .map_err(|source| ApiError::NonUtf8Body { status, source })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_map_one_to_one() {
        assert_eq!(to_reqwest_method(HttpMethod::Get), Method::GET);
        assert_eq!(to_reqwest_method(HttpMethod::Post), Method::POST);
        assert_eq!(to_reqwest_method(HttpMethod::Patch), Method::PATCH);
        assert_eq!(to_reqwest_method(HttpMethod::Delete), Method::DELETE);
    }

    #[test]
    fn header_values_are_validated_before_sending() {
        let ok = vec![("x-access-token".to_string(), "abc".to_string())];
        let map = to_header_map(&ok).unwrap();
        assert_eq!(map.get("x-access-token").unwrap(), "abc");

        let bad = vec![("x-access-token".to_string(), "abc\ndef".to_string())];
        let err = to_header_map(&bad).unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader { ref name, .. } if name == "x-access-token"));
        assert_eq!(err.kind(), crate::error::ErrorKind::Local);
    }

    #[test]
    fn builds_with_and_without_timeout() {
        assert!(ReqwestTransport::new(None).is_ok());
        assert!(ReqwestTransport::new(Some(Duration::from_secs(5))).is_ok());
    }
}
