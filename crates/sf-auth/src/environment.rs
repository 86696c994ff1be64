//! Production / sandbox login environments.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};
use crate::{PRODUCTION_LOGIN_URL, SANDBOX_LOGIN_URL};

/// The org type a login is aimed at.
///
/// Parsing is case-insensitive and only accepts `production` and `sandbox`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoginEnvironment {
    #[default]
    Production,
    Sandbox,
}

impl LoginEnvironment {
    /// Base URL of the login endpoint for this environment.
    pub fn login_url(&self) -> &'static str {
        match self {
            LoginEnvironment::Production => PRODUCTION_LOGIN_URL,
            LoginEnvironment::Sandbox => SANDBOX_LOGIN_URL,
        }
    }

    /// Lower-case name, as accepted by `FromStr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginEnvironment::Production => "production",
            LoginEnvironment::Sandbox => "sandbox",
        }
    }
}

impl FromStr for LoginEnvironment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("production") {
            Ok(LoginEnvironment::Production)
        } else if s.eq_ignore_ascii_case("sandbox") {
            Ok(LoginEnvironment::Sandbox)
        } else {
            Err(Error::new(ErrorKind::InvalidInput(format!(
                "unknown login environment '{}', expected 'production' or 'sandbox'",
                s
            ))))
        }
    }
}

impl fmt::Display for LoginEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
