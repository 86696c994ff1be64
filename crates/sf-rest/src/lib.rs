//! # sf-rest
//!
//! The slice of the Salesforce REST API the busbar-sf engine forwards to.
//!
//! ## Features
//!
//! - **Describe** - List all objects, get object and field metadata
//! - **SOQL Query** - Execute queries and follow `nextRecordsUrl`
//! - **SObject Collections** - Create, update, upsert and delete up to 200
//!   records per request
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_rest::SalesforceRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_rest::Error> {
//!     let client = SalesforceRestClient::new(
//!         "https://myorg.my.salesforce.com",
//!         "access_token_here",
//!     );
//!
//!     let result = client
//!         .query::<serde_json::Value>("SELECT Id, Name FROM Account LIMIT 10")
//!         .await?;
//!
//!     let saved = client
//!         .create_multiple("Account", &[serde_json::json!({"Name": "New Account"})], false)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod collections;
mod describe;
mod error;
mod query;
pub mod security;

pub use client::SalesforceRestClient;
pub use collections::{CollectionRequest, SaveError, SaveResult};
pub use describe::{
    ChildRelationship, DescribeGlobalResult, DescribeSObjectResult, FieldDescribe,
    PicklistValue, SObjectBasicInfo,
};
pub use error::{Error, ErrorKind, Result};
pub use query::QueryResult;

/// Maximum number of records accepted by one sObject Collections request.
pub const MAX_COLLECTION_SIZE: usize = 200;
