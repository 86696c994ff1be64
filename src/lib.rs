//! # busbar-sf-engine
//!
//! Memoized Salesforce sessions and describe metadata.
//!
//! A [`SessionManager`] logs in through a [`SessionProvider`] and keeps the
//! resulting sessions, object lists and describe results in a [`Cache`], so
//! each is fetched once per user. Queries and record saves are passed
//! through uncached.
//!
//! ## Security
//!
//! - Passwords and session ids are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages never echo passwords or tokens
//!
//! ## Crates
//!
//! - **busbar-sf-auth** - Username/password login, login environments, sessions
//! - **busbar-sf-rest** - REST API: Describe, Query, Collections
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use busbar_sf_engine::{Cache, EngineConfig, SessionManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::from_env()?;
//!     let manager = SessionManager::from_config(&config, Cache::new());
//!
//!     manager.login(config.require_credentials()?.clone()).await?;
//!
//!     let result = manager.query("SELECT Id, Name FROM Account LIMIT 10").await?;
//!     for account in &result.records {
//!         println!("{}", account["Name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod cache;
mod config;
mod error;
pub mod keys;
mod manager;
mod provider;

pub use cache::Cache;
pub use config::EngineConfig;
pub use error::{Error, ErrorKind, Result};
pub use manager::SessionManager;
pub use provider::{SalesforceProvider, SessionProvider};

// Re-export the member crates for convenient access
pub use busbar_sf_auth as auth;
pub use busbar_sf_rest as rest;

// Re-export commonly used types at the top level
pub use busbar_sf_auth::{LoginEnvironment, Session, UserCredentials};
pub use busbar_sf_rest::{
    DescribeGlobalResult, DescribeSObjectResult, FieldDescribe, QueryResult, SObjectBasicInfo,
    SaveError, SaveResult,
};
