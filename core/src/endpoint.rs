//! Immutable description of one REST collection.

use url::Url;

use crate::auth::AuthPolicy;
use crate::error::ApiError;

/// Collection URL, optional upload URL, and the auth policy for both.
///
/// URLs are validated once here and stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
    upload_url: Option<Url>,
    auth_policy: AuthPolicy,
}

fn parse_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|source| ApiError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl {
            url: raw.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }
    Ok(url)
}

fn join(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl Endpoint {
    /// Endpoint for an absolute collection URL.
    pub fn new(url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            url: parse_url(url)?,
            upload_url: None,
            auth_policy: AuthPolicy::default(),
        })
    }

    /// Endpoint for `path` under `base_url`, e.g. `("http://host:5002", "departments")`.
    pub fn collection(base_url: &str, path: &str) -> Result<Self, ApiError> {
        Self::new(&join(base_url, path))
    }

    pub fn with_upload_url(mut self, url: &str) -> Result<Self, ApiError> {
        self.upload_url = Some(parse_url(url)?);
        Ok(self)
    }

    /// Upload URL as `path` under `base_url`.
    pub fn with_upload_path(self, base_url: &str, path: &str) -> Result<Self, ApiError> {
        self.with_upload_url(&join(base_url, path))
    }

    pub fn with_auth_policy(mut self, policy: AuthPolicy) -> Self {
        self.auth_policy = policy;
        self
    }

    pub fn url(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    pub fn upload_url(&self) -> Option<&str> {
        self.upload_url
            .as_ref()
            .map(|u| u.as_str().trim_end_matches('/'))
    }

    pub fn auth_policy(&self) -> AuthPolicy {
        self.auth_policy
    }

    /// Collection URL with `?search=<query>` appended.
    pub fn search_url(&self, query: &str) -> String {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("search", query);
        url.to_string()
    }

    /// URL of a single member, `<collection>/<id>`, with `id` percent-encoded.
    pub fn item_url(&self, id: &str) -> String {
        let mut url = self.url.clone();
        // cannot_be_a_base was rejected in parse_url
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url.to_string()
    }
}
