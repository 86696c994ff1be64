//! # sf-auth
//!
//! Salesforce username/password authentication for the busbar-sf engine.
//!
//! ## Security
//!
//! - Passwords and session ids are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages never echo the submitted password
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_auth::{LoginEnvironment, PasswordLogin, UserCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_auth::Error> {
//!     let env: LoginEnvironment = "sandbox".parse()?;
//!     let creds = UserCredentials::new("me@example.com.dev", "passwordTOKEN");
//!
//!     let session = PasswordLogin::new().login(env.login_url(), &creds).await?;
//!     println!("{} as {}", session.instance_url(), session.user_id());
//!     Ok(())
//! }
//! ```

mod credentials;
pub mod env;
mod environment;
mod error;
mod password;
mod session;

pub use credentials::UserCredentials;
pub use environment::LoginEnvironment;
pub use error::{Error, ErrorKind, Result};
pub use password::PasswordLogin;
pub use session::Session;

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "62.0";
