//! Memoizing front end over a [`SessionProvider`].

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use busbar_sf_auth::{LoginEnvironment, Session, UserCredentials};
use busbar_sf_rest::{
    DescribeSObjectResult, FieldDescribe, QueryResult, SObjectBasicInfo, SaveResult,
};

use crate::cache::Cache;
use crate::config::EngineConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::keys;
use crate::provider::{SalesforceProvider, SessionProvider};

/// Logs in through a provider and memoizes sessions and describe metadata.
///
/// Sessions are cached per username and describe results per user id, in
/// the [`Cache`] handed to the constructor. Queries and saves always go to
/// the provider.
///
/// A session is keyed by username only. Once a username has a cached
/// session, later logins for it return that session whatever password they
/// carry. Call [`SessionManager::logout`] to force a fresh login, for
/// instance once an operation fails with [`Error::is_session_expired`].
///
/// # Example
///
/// ```rust,ignore
/// use busbar_sf_engine::{Cache, SalesforceProvider, SessionManager, UserCredentials};
///
/// let manager = SessionManager::new("sandbox", SalesforceProvider::new(), Cache::new())?;
/// manager.login(UserCredentials::new("me@example.com.dev", "passwordTOKEN")).await?;
///
/// for object in manager.all_objects().await?.iter() {
///     println!("{}", object.name);
/// }
/// ```
pub struct SessionManager<P> {
    environment: LoginEnvironment,
    provider: P,
    cache: Cache,
}

impl<P> std::fmt::Debug for SessionManager<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("environment", &self.environment)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<P: SessionProvider> SessionManager<P> {
    /// Create a manager for `"production"` or `"sandbox"` (any case).
    ///
    /// Any other environment fails with `InvalidConfiguration`.
    pub fn new(environment: &str, provider: P, cache: Cache) -> Result<Self> {
        let environment = environment.parse::<LoginEnvironment>().map_err(|e| {
            Error::with_source(
                ErrorKind::InvalidConfiguration(format!(
                    "unknown login environment '{}'",
                    environment
                )),
                e,
            )
        })?;
        Ok(Self::with_environment(environment, provider, cache))
    }

    pub fn with_environment(environment: LoginEnvironment, provider: P, cache: Cache) -> Self {
        Self {
            environment,
            provider,
            cache,
        }
    }

    pub fn environment(&self) -> LoginEnvironment {
        self.environment
    }

    /// Login endpoint used for every connect.
    pub fn login_endpoint(&self) -> &'static str {
        self.environment.login_url()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Make `credentials` current and return its session.
    ///
    /// Connects only if no session is cached for the username. Concurrent
    /// first logins for one username share a single connect. A failed
    /// connect is logged and returned; nothing is cached, so the next call
    /// tries again.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: UserCredentials) -> Result<Arc<Session>> {
        let credentials = Arc::new(credentials);
        self.cache
            .set_arc(keys::CURRENT_CREDENTIALS, Arc::clone(&credentials));
        self.session_for(&credentials).await
    }

    /// The credential set by the most recent login, if any.
    pub fn current_credentials(&self) -> Option<Arc<UserCredentials>> {
        self.cache.get(keys::CURRENT_CREDENTIALS)
    }

    /// Forget the cached session for `username`.
    ///
    /// Also clears the current credential if it belongs to that user.
    /// Describe results stay cached. Returns whether a session was cached.
    #[instrument(skip(self))]
    pub fn logout(&self, username: &str) -> bool {
        let key = keys::connection(username);
        let had_session = self.cache.has(&key);
        self.cache.delete(&key);

        if self
            .current_credentials()
            .is_some_and(|current| current.username() == username)
        {
            self.cache.delete(keys::CURRENT_CREDENTIALS);
        }
        debug!(had_session, "logged out");
        had_session
    }

    /// Browser URL that opens the org with the current session.
    pub async fn login_url(&self) -> Result<String> {
        let session = self.session().await?;
        Ok(session.frontdoor_url())
    }

    /// Every object visible to the current user. Memoized per user.
    #[instrument(skip(self))]
    pub async fn all_objects(&self) -> Result<Arc<Vec<SObjectBasicInfo>>> {
        let session = self.session().await?;
        let session = &session;
        let provider = &self.provider;
        let key = keys::object_list(session.user_id());

        self.cache
            .get_or_try_insert_with(&key, move || async move {
                debug!("describing global");
                let global = provider.describe_global(session).await?;
                Ok::<_, Error>(global.sobjects)
            })
            .await
    }

    /// Fields of `object_name`. Memoized per object and user.
    #[instrument(skip(self))]
    pub async fn all_fields(&self, object_name: &str) -> Result<Arc<Vec<FieldDescribe>>> {
        let session = self.session().await?;
        let session = &session;
        let provider = &self.provider;
        let key = keys::object_fields(object_name, session.user_id());

        self.cache
            .get_or_try_insert_with(&key, move || async move {
                debug!("describing for fields");
                let describe = provider.describe(session, object_name).await?;
                Ok::<_, Error>(describe.fields)
            })
            .await
    }

    /// Full describe of `object_name`. Memoized per object and user.
    #[instrument(skip(self))]
    pub async fn describe_object(&self, object_name: &str) -> Result<Arc<DescribeSObjectResult>> {
        let session = self.session().await?;
        let session = &session;
        let provider = &self.provider;
        let key = keys::object_info(object_name, session.user_id());

        self.cache
            .get_or_try_insert_with(&key, move || async move {
                debug!("describing object");
                provider.describe(session, object_name).await
            })
            .await
    }

    /// Run a SOQL query. Never cached.
    #[instrument(skip(self))]
    pub async fn query(&self, soql: &str) -> Result<QueryResult<Value>> {
        let session = self.session().await?;
        self.provider.query(&session, soql).await
    }

    /// Fetch the next page of a query. Never cached.
    #[instrument(skip(self))]
    pub async fn query_more(&self, next_records_url: &str) -> Result<QueryResult<Value>> {
        let session = self.session().await?;
        self.provider.query_more(&session, next_records_url).await
    }

    /// Create records. Fails if any record was not saved.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn insert(&self, records: &[Value], object_name: &str) -> Result<Vec<SaveResult>> {
        let session = self.session().await?;
        let results = self.provider.create(&session, object_name, records).await?;
        check_saved(object_name, results)
    }

    /// Update records by `Id`. Fails if any record was not saved.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn update(&self, records: &[Value], object_name: &str) -> Result<Vec<SaveResult>> {
        let session = self.session().await?;
        let results = self.provider.update(&session, object_name, records).await?;
        check_saved(object_name, results)
    }

    /// Insert or update records matched on `external_id_field`.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn upsert(
        &self,
        records: &[Value],
        object_name: &str,
        external_id_field: &str,
    ) -> Result<Vec<SaveResult>> {
        let session = self.session().await?;
        let results = self
            .provider
            .upsert(&session, object_name, external_id_field, records)
            .await?;
        check_saved(object_name, results)
    }

    /// Delete records by id. Fails if any record was not deleted.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn delete(&self, ids: &[String], object_name: &str) -> Result<Vec<SaveResult>> {
        let session = self.session().await?;
        let results = self.provider.destroy(&session, object_name, ids).await?;
        check_saved(object_name, results)
    }

    /// Session of the current credential.
    async fn session(&self) -> Result<Arc<Session>> {
        let credentials = self
            .current_credentials()
            .ok_or_else(|| Error::new(ErrorKind::Unauthenticated))?;
        self.session_for(&credentials).await
    }

    async fn session_for(&self, credentials: &UserCredentials) -> Result<Arc<Session>> {
        let key = keys::connection(credentials.username());
        let provider = &self.provider;
        let login_url = self.environment.login_url();

        self.cache
            .get_or_try_insert_with(&key, move || async move {
                debug!(login_url, "connecting");
                provider
                    .connect(login_url, credentials)
                    .await
                    .inspect_err(|e| warn!(error = %e, "login failed"))
            })
            .await
    }
}

impl SessionManager<SalesforceProvider> {
    /// Build a manager with a [`SalesforceProvider`] from configuration.
    pub fn from_config(config: &EngineConfig, cache: Cache) -> Self {
        let provider = SalesforceProvider::new().with_api_version(config.api_version());
        Self::with_environment(config.environment(), provider, cache)
    }
}

fn check_saved(object_name: &str, results: Vec<SaveResult>) -> Result<Vec<SaveResult>> {
    let failures: Vec<String> = results
        .iter()
        .filter(|r| !r.success)
        .map(SaveResult::error_message)
        .collect();
    if failures.is_empty() {
        return Ok(results);
    }

    debug!(object_name, failed = failures.len(), "save reported failures");
    Err(Error::new(ErrorKind::SaveFailed {
        object: object_name.to_string(),
        message: failures.join("; "),
        results,
    }))
}
