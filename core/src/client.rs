//! Generic client for one REST collection.
//!
//! # Design
//! `ResourceClient` holds an immutable `Endpoint`, an `AuthContext` and a
//! shared `Transport`; it keeps no mutable state between calls. Every
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and the shared `parse_response` step that consumes an `HttpResponse`. The
//! async methods run the request through the transport in between, exactly
//! once.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::AuthContext;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};

/// Longest response body excerpt written to the log.
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Async client for a single collection (`/departments`, `/employees`, ...).
#[derive(Debug)]
pub struct ResourceClient<T = ReqwestTransport> {
    endpoint: Endpoint,
    auth: AuthContext,
    transport: Arc<T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            auth: self.auth.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> ResourceClient<T> {
    pub fn new(endpoint: Endpoint, auth: AuthContext, transport: T) -> Self {
        Self::with_shared_transport(endpoint, auth, Arc::new(transport))
    }

    /// Share one transport (and its connection pool) across several clients.
    pub fn with_shared_transport(endpoint: Endpoint, auth: AuthContext, transport: Arc<T>) -> Self {
        Self {
            endpoint,
            auth,
            transport,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Same endpoint and transport, different credentials.
    pub fn with_auth(&self, auth: AuthContext) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            auth,
            transport: Arc::clone(&self.transport),
        }
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(header) = self.endpoint.auth_policy().header(&self.auth) {
            headers.push(header);
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    fn json_request<P: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        url: String,
        payload: &P,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload).map_err(ApiError::Encode)?;
        Ok(self.request(method, url, Some(body)))
    }

    pub fn build_create<P: Serialize + ?Sized>(&self, payload: &P) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, self.endpoint.url().to_string(), payload)
    }

    pub fn build_list(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.endpoint.url().to_string(), None)
    }

    pub fn build_search(&self, query: &str) -> HttpRequest {
        self.request(HttpMethod::Get, self.endpoint.search_url(query), None)
    }

    pub fn build_upload<P: Serialize + ?Sized>(&self, payload: &P) -> Result<HttpRequest, ApiError> {
        let url = self
            .endpoint
            .upload_url()
            .ok_or(ApiError::NoUploadEndpoint)?
            .to_string();
        self.json_request(HttpMethod::Post, url, payload)
    }

    pub fn build_update<P: Serialize + ?Sized>(
        &self,
        id: &str,
        payload: &P,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Patch, self.endpoint.item_url(id), payload)
    }

    pub fn build_delete(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, self.endpoint.item_url(id), None)
    }
}

impl<T: Transport> ResourceClient<T> {
    /// POST `payload` to the collection.
    pub async fn create<P, R>(&self, payload: &P) -> Result<R, ApiError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.build_create(payload)?;
        self.send(request).await
    }

    /// GET the collection.
    pub async fn list<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        let listed = self.send(self.build_list()).await?;
        debug!(url = self.endpoint.url(), "listed collection");
        Ok(listed)
    }

    /// GET the collection filtered with `?search=`.
    pub async fn search<R: DeserializeOwned>(&self, query: &str) -> Result<R, ApiError> {
        self.send(self.build_search(query)).await
    }

    /// POST `payload` to the endpoint's upload URL.
    pub async fn upload<P, R>(&self, payload: &P) -> Result<R, ApiError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.build_upload(payload)?;
        self.send(request).await
    }

    /// PATCH the member `id` with `payload`.
    pub async fn update<P, R>(&self, id: &str, payload: &P) -> Result<R, ApiError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.build_update(id, payload)?;
        self.send(request).await
    }

    /// DELETE the member `id`.
    pub async fn delete<R: DeserializeOwned>(&self, id: &str) -> Result<R, ApiError> {
        self.send(self.build_delete(id)).await
    }

    async fn send<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "sending request");
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            warn!(
                %method,
                %url,
                status = response.status,
                body = %truncate_for_log(&response.body),
                "request failed"
            );
        }
        parse_response(response)
    }
}

/// Map a non-2xx response to `ApiError::Status`, otherwise decode the body.
///
/// An empty body decodes as JSON `null`, so `()`-like targets such as
/// `serde_json::Value` or `Option<_>` accept bodiless replies.
pub fn parse_response<R: DeserializeOwned>(response: HttpResponse) -> Result<R, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Status {
            status: response.status,
            body: response.body,
        });
    }
    let text = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(source) => Err(ApiError::Decode {
            status: response.status,
            body: response.body,
            source,
        }),
    }
}

fn truncate_for_log(body: &str) -> String {
    if body.len() <= MAX_LOG_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_LOG_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [{} bytes total]", &body[..end], body.len())
}
