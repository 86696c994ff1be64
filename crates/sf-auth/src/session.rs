//! Authenticated session handle.
//!
//! The session id is redacted in Debug output.

use chrono::{DateTime, Utc};

use crate::DEFAULT_API_VERSION;

/// Path on the instance that turns a session id into a browser session.
const FRONTDOOR_PATH: &str = "/secur/frontdoor.jsp?sid=";

/// An established Salesforce session.
///
/// Produced by a successful login; carries everything needed to issue REST
/// calls on behalf of the user.
#[derive(Clone)]
pub struct Session {
    instance_url: String,
    access_token: String,
    user_id: String,
    organization_id: Option<String>,
    server_url: Option<String>,
    api_version: String,
    established_at: DateTime<Utc>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("organization_id", &self.organization_id)
            .field("api_version", &self.api_version)
            .field("established_at", &self.established_at)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session from its instance URL, access token and user id.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            user_id: user_id.into(),
            organization_id: None,
            server_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            established_at: Utc::now(),
        }
    }

    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = Some(server_url.into());
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Base URL of the org instance, without a trailing slash.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Id of the logged-in user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }

    /// SOAP endpoint returned by the login call, if known.
    pub fn server_url(&self) -> Option<&str> {
        self.server_url.as_deref()
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }

    /// URL that opens the org in a browser using this session.
    pub fn frontdoor_url(&self) -> String {
        format!("{}{}{}", self.instance_url, FRONTDOOR_PATH, self.access_token)
    }
}
