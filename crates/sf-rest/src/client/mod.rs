//! Salesforce REST API client.
//!
//! Typed methods for describe, query and sObject Collections calls, made
//! directly with `reqwest` and a bearer token.

use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, instrument};

use busbar_sf_auth::{Session, DEFAULT_API_VERSION};

use crate::error::{Error, ErrorKind, Result};

mod collections;
mod describe;
mod query;

/// Salesforce REST API client.
///
/// The access token is redacted in Debug output.
///
/// # Example
///
/// ```rust,ignore
/// use busbar_sf_rest::SalesforceRestClient;
///
/// let client = SalesforceRestClient::from_session(&session);
/// let objects = client.describe_global().await?;
/// let contact = client.describe_sobject("Contact").await?;
/// ```
#[derive(Clone)]
pub struct SalesforceRestClient {
    http: reqwest::Client,
    instance_url: String,
    access_token: String,
    api_version: String,
}

impl std::fmt::Debug for SalesforceRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceRestClient")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl SalesforceRestClient {
    /// Create a new REST client with the given instance URL and access token.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Create a REST client for an established session.
    pub fn from_session(session: &Session) -> Self {
        Self::new(session.instance_url(), session.access_token())
            .with_api_version(session.api_version())
    }

    /// Reuse an existing HTTP client (and its connection pool).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Set the API version (e.g., "62.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Build the full URL for a path.
    ///
    /// If the path starts with `/`, it's appended to the instance URL.
    /// Full URLs are returned unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.instance_url, path)
        } else {
            format!("{}/{}", self.instance_url, path)
        }
    }

    /// Build the REST API URL for a path.
    ///
    /// Example: `rest_url("sobjects/Account")` -> `{instance}/services/data/v62.0/sobjects/Account`
    pub fn rest_url(&self, path: &str) -> String {
        format!(
            "{}/services/data/v{}/{}",
            self.instance_url,
            self.api_version,
            path.trim_start_matches('/')
        )
    }

    #[instrument(skip(self), fields(url = %url))]
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(url))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip(self, body), fields(url = %url))]
    pub(crate) async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let mut request = self
            .http
            .request(method, self.url(url))
            .bearer_auth(&self.access_token);
        if let Some(body) = body {
            request = request.json(body);
        }
        handle_response(request.send().await?).await
    }
}

/// Error entry in a REST error response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiError {
    error_code: String,
    message: String,
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "REST request failed");

    if let Ok(errors) = serde_json::from_str::<Vec<ApiError>>(&body) {
        if let Some(first) = errors.into_iter().next() {
            return Err(Error::new(ErrorKind::Salesforce {
                error_code: first.error_code,
                message: first.message,
            }));
        }
    }

    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body
    };
    Err(Error::new(ErrorKind::Http {
        status: status.as_u16(),
        message,
    }))
}
