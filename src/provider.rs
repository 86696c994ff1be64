//! The Salesforce calls the engine depends on.
//!
//! [`SessionProvider`] is the seam between the memoizing manager and the
//! network. [`SalesforceProvider`] implements it with the busbar-sf auth and
//! REST crates; tests substitute an in-memory provider.

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use busbar_sf_auth::{PasswordLogin, Session, UserCredentials, DEFAULT_API_VERSION};
use busbar_sf_rest::{
    DescribeGlobalResult, DescribeSObjectResult, QueryResult, SalesforceRestClient, SaveResult,
};

use crate::error::Result;

/// Authentication, describe, query and save operations against an org.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Log in at `login_url` and return the new session.
    async fn connect(&self, login_url: &str, credentials: &UserCredentials) -> Result<Session>;

    /// List every object visible to the session's user.
    async fn describe_global(&self, session: &Session) -> Result<DescribeGlobalResult>;

    /// Describe one object, fields included.
    async fn describe(&self, session: &Session, object_name: &str)
        -> Result<DescribeSObjectResult>;

    async fn query(&self, session: &Session, soql: &str) -> Result<QueryResult<Value>>;

    async fn query_more(
        &self,
        session: &Session,
        next_records_url: &str,
    ) -> Result<QueryResult<Value>>;

    async fn create(
        &self,
        session: &Session,
        object_name: &str,
        records: &[Value],
    ) -> Result<Vec<SaveResult>>;

    async fn update(
        &self,
        session: &Session,
        object_name: &str,
        records: &[Value],
    ) -> Result<Vec<SaveResult>>;

    async fn upsert(
        &self,
        session: &Session,
        object_name: &str,
        external_id_field: &str,
        records: &[Value],
    ) -> Result<Vec<SaveResult>>;

    /// Delete records by id.
    async fn destroy(
        &self,
        session: &Session,
        object_name: &str,
        ids: &[String],
    ) -> Result<Vec<SaveResult>>;
}

/// [`SessionProvider`] backed by the SOAP login and REST API.
///
/// One HTTP client (and connection pool) is shared by the login call and
/// every REST client built from a session. Collection saves are sent with
/// `allOrNone=false`.
#[derive(Debug, Clone)]
pub struct SalesforceProvider {
    login: PasswordLogin,
    http: reqwest::Client,
    api_version: String,
}

impl Default for SalesforceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesforceProvider {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Use an existing HTTP client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            login: PasswordLogin::with_client(http.clone()),
            http,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Set the API version used for login and REST calls (e.g., "62.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.login = self.login.with_api_version(version.clone());
        self.api_version = version;
        self
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn rest(&self, session: &Session) -> SalesforceRestClient {
        SalesforceRestClient::from_session(session).with_http_client(self.http.clone())
    }
}

#[async_trait]
impl SessionProvider for SalesforceProvider {
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    async fn connect(&self, login_url: &str, credentials: &UserCredentials) -> Result<Session> {
        Ok(self.login.login(login_url, credentials).await?)
    }

    async fn describe_global(&self, session: &Session) -> Result<DescribeGlobalResult> {
        Ok(self.rest(session).describe_global().await?)
    }

    async fn describe(
        &self,
        session: &Session,
        object_name: &str,
    ) -> Result<DescribeSObjectResult> {
        Ok(self.rest(session).describe_sobject(object_name).await?)
    }

    async fn query(&self, session: &Session, soql: &str) -> Result<QueryResult<Value>> {
        Ok(self.rest(session).query(soql).await?)
    }

    async fn query_more(
        &self,
        session: &Session,
        next_records_url: &str,
    ) -> Result<QueryResult<Value>> {
        Ok(self.rest(session).query_more(next_records_url).await?)
    }

    async fn create(
        &self,
        session: &Session,
        object_name: &str,
        records: &[Value],
    ) -> Result<Vec<SaveResult>> {
        Ok(self
            .rest(session)
            .create_multiple(object_name, records, false)
            .await?)
    }

    async fn update(
        &self,
        session: &Session,
        object_name: &str,
        records: &[Value],
    ) -> Result<Vec<SaveResult>> {
        Ok(self
            .rest(session)
            .update_multiple(object_name, records, false)
            .await?)
    }

    async fn upsert(
        &self,
        session: &Session,
        object_name: &str,
        external_id_field: &str,
        records: &[Value],
    ) -> Result<Vec<SaveResult>> {
        Ok(self
            .rest(session)
            .upsert_multiple(object_name, external_id_field, records, false)
            .await?)
    }

    // The collections delete endpoint is keyed by id alone.
    async fn destroy(
        &self,
        session: &Session,
        _object_name: &str,
        ids: &[String],
    ) -> Result<Vec<SaveResult>> {
        Ok(self.rest(session).delete_multiple(ids, false).await?)
    }
}
