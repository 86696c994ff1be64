//! Engine configuration.

use busbar_sf_auth::{env, LoginEnvironment, UserCredentials, DEFAULT_API_VERSION};

use crate::error::{Error, ErrorKind, Result};

/// Settings needed to build a [`SessionManager`](crate::SessionManager)
/// backed by Salesforce.
///
/// # Example
///
/// ```rust,ignore
/// use busbar_sf_engine::EngineConfig;
///
/// // Reads SF_ENVIRONMENT, SF_USERNAME, SF_PASSWORD and SF_API_VERSION.
/// let config = EngineConfig::from_env()?;
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    environment: LoginEnvironment,
    credentials: Option<UserCredentials>,
    api_version: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            environment: LoginEnvironment::Production,
            credentials: None,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn new(environment: LoginEnvironment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `SF_ENVIRONMENT`: `production` (default) or `sandbox`
    /// - `SF_USERNAME` / `SF_PASSWORD` (or the `SALESFORCE_*` forms): optional,
    ///   both must be set to take effect
    /// - `SF_API_VERSION`: defaults to `62.0`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(environment) = env::var(&lookup, "ENVIRONMENT") {
            config.environment = environment.parse().map_err(|e| {
                Error::with_source(
                    ErrorKind::InvalidConfiguration(format!(
                        "SF_ENVIRONMENT must be 'production' or 'sandbox', got '{}'",
                        environment
                    )),
                    e,
                )
            })?;
        }

        config.credentials = UserCredentials::from_lookup(&lookup);

        if let Some(version) = env::var(&lookup, "API_VERSION") {
            config.api_version = version;
        }

        Ok(config)
    }

    pub fn with_environment(mut self, environment: LoginEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_credentials(mut self, credentials: UserCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the API version (e.g., "62.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn environment(&self) -> LoginEnvironment {
        self.environment
    }

    pub fn credentials(&self) -> Option<&UserCredentials> {
        self.credentials.as_ref()
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The configured credentials, or `InvalidConfiguration` if unset.
    pub fn require_credentials(&self) -> Result<&UserCredentials> {
        self.credentials.as_ref().ok_or_else(|| {
            Error::new(ErrorKind::InvalidConfiguration(
                "SF_USERNAME and SF_PASSWORD must be set".to_string(),
            ))
        })
    }
}
