use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use busbar_sf_engine::{
    DescribeGlobalResult, DescribeSObjectResult, Error, QueryResult, Result, SaveResult, Session,
    SessionProvider, UserCredentials,
};
use serde_json::{json, Value};

pub const INSTANCE_URL: &str = "https://na1.salesforce.com";

/// User id the provider assigns to `username`.
pub fn user_id_for(username: &str) -> String {
    format!("005{}", username)
}

/// In-memory provider that counts every call it receives.
#[derive(Default)]
pub struct CountingProvider {
    pub connects: AtomicUsize,
    pub describe_globals: AtomicUsize,
    pub describes: AtomicUsize,
    pub queries: AtomicUsize,
    pub saves: AtomicUsize,
    /// While set, `connect` fails.
    pub fail_connect: AtomicBool,
    /// While set, `describe_global` and `describe` fail.
    pub fail_describe: AtomicBool,
    /// While set, every save reports `success: false` for its last record.
    pub reject_saves: AtomicBool,
    /// Delay applied inside `connect`, to widen race windows.
    pub connect_delay: Option<Duration>,
}

impl CountingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_delay(delay: Duration) -> Self {
        Self {
            connect_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn save_results(&self, count: usize) -> Vec<SaveResult> {
        let reject = self.reject_saves.load(Ordering::SeqCst);
        (0..count)
            .map(|i| {
                let failed = reject && i + 1 == count;
                serde_json::from_value(if failed {
                    json!({
                        "success": false,
                        "errors": [{
                            "statusCode": "REQUIRED_FIELD_MISSING",
                            "message": "Required fields are missing: [Name]",
                            "fields": ["Name"]
                        }]
                    })
                } else {
                    json!({"id": format!("001xx00000{:07}", i), "success": true, "errors": []})
                })
                .expect("valid SaveResult")
            })
            .collect()
    }
}

#[async_trait]
impl SessionProvider for CountingProvider {
    async fn connect(&self, login_url: &str, credentials: &UserCredentials) -> Result<Session> {
        let n = self.connects.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(Error::provider(format!(
                "INVALID_LOGIN at {} for {}",
                login_url,
                credentials.username()
            )));
        }
        Ok(Session::new(
            INSTANCE_URL,
            format!("00Dxx!session{}", n),
            user_id_for(credentials.username()),
        )
        .with_server_url(login_url))
    }

    async fn describe_global(&self, _session: &Session) -> Result<DescribeGlobalResult> {
        self.describe_globals.fetch_add(1, Ordering::SeqCst);
        if self.fail_describe.load(Ordering::SeqCst) {
            return Err(Error::provider("REQUEST_LIMIT_EXCEEDED: TotalRequests Limit exceeded"));
        }
        Ok(serde_json::from_value(json!({
            "sobjects": [
                {"name": "Account", "label": "Account"},
                {"name": "Contact", "label": "Contact"}
            ]
        }))
        .expect("valid DescribeGlobalResult"))
    }

    async fn describe(
        &self,
        _session: &Session,
        object_name: &str,
    ) -> Result<DescribeSObjectResult> {
        self.describes.fetch_add(1, Ordering::SeqCst);
        if self.fail_describe.load(Ordering::SeqCst) {
            return Err(Error::provider(format!("NOT_FOUND: {} is not available", object_name)));
        }
        Ok(serde_json::from_value(json!({
            "name": object_name,
            "label": object_name,
            "fields": [
                {"name": "Id", "label": "Record ID", "type": "id"},
                {"name": "Name", "label": "Name", "type": "string"}
            ]
        }))
        .expect("valid DescribeSObjectResult"))
    }

    async fn query(&self, _session: &Session, soql: &str) -> Result<QueryResult<Value>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if !soql.to_ascii_uppercase().starts_with("SELECT") {
            return Err(Error::provider("MALFORMED_QUERY: unexpected token"));
        }
        Ok(QueryResult {
            total_size: 2,
            done: false,
            next_records_url: Some("/services/data/v62.0/query/01gxx-1".to_string()),
            records: vec![json!({"Id": "001xx0000000001"})],
        })
    }

    async fn query_more(
        &self,
        _session: &Session,
        _next_records_url: &str,
    ) -> Result<QueryResult<Value>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(QueryResult {
            total_size: 2,
            done: true,
            next_records_url: None,
            records: vec![json!({"Id": "001xx0000000002"})],
        })
    }

    async fn create(
        &self,
        _session: &Session,
        _object_name: &str,
        records: &[Value],
    ) -> Result<Vec<SaveResult>> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(self.save_results(records.len()))
    }

    async fn update(
        &self,
        _session: &Session,
        _object_name: &str,
        records: &[Value],
    ) -> Result<Vec<SaveResult>> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(self.save_results(records.len()))
    }

    async fn upsert(
        &self,
        _session: &Session,
        _object_name: &str,
        _external_id_field: &str,
        records: &[Value],
    ) -> Result<Vec<SaveResult>> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(self.save_results(records.len()))
    }

    async fn destroy(
        &self,
        _session: &Session,
        _object_name: &str,
        ids: &[String],
    ) -> Result<Vec<SaveResult>> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(self.save_results(ids.len()))
    }
}
