//! Username/password credentials.
//!
//! The password is redacted in Debug output.

use crate::env;

/// A Salesforce username and password.
///
/// When the org enforces security tokens the token is appended to the
/// password, exactly as for the SOAP `login` call.
#[derive(Clone)]
pub struct UserCredentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl UserCredentials {
    /// Create credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Load credentials through a variable lookup.
    ///
    /// Reads `SF_USERNAME` / `SF_PASSWORD` (or the `SALESFORCE_*` forms).
    /// Returns `None` unless both are set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let username = env::var(&lookup, "USERNAME")?;
        let password = env::var(&lookup, "PASSWORD")?;
        Some(Self::new(username, password))
    }

    /// The login username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password (with security token appended, if any).
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns true if both username and password are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}
