use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use crate::collections::{CollectionRequest, SaveResult};
use crate::error::{Error, ErrorKind, Result};
use crate::security::{is_safe_field_name, is_safe_sobject_name, is_valid_salesforce_id};
use crate::MAX_COLLECTION_SIZE;

impl super::SalesforceRestClient {
    /// Create multiple records in a single request (up to 200).
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn create_multiple(
        &self,
        sobject: &str,
        records: &[Value],
        all_or_none: bool,
    ) -> Result<Vec<SaveResult>> {
        let request = collection_request(sobject, records, all_or_none, |_| Ok(()))?;
        if request.records.is_empty() {
            return Ok(Vec::new());
        }
        self.send_json(
            Method::POST,
            &self.rest_url("composite/sobjects"),
            Some(&request),
        )
        .await
    }

    /// Update multiple records in a single request (up to 200).
    ///
    /// Every record must carry its `Id`.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn update_multiple(
        &self,
        sobject: &str,
        records: &[Value],
        all_or_none: bool,
    ) -> Result<Vec<SaveResult>> {
        let request = collection_request(sobject, records, all_or_none, |record| {
            match record.get("Id").and_then(Value::as_str) {
                Some(id) if is_valid_salesforce_id(id) => Ok(()),
                Some(_) => Err(invalid("Invalid Salesforce ID format")),
                None => Err(invalid("record is missing its Id")),
            }
        })?;
        if request.records.is_empty() {
            return Ok(Vec::new());
        }
        self.send_json(
            Method::PATCH,
            &self.rest_url("composite/sobjects"),
            Some(&request),
        )
        .await
    }

    /// Upsert multiple records keyed on an external ID field (up to 200).
    ///
    /// Every record must carry a value for `external_id_field`.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn upsert_multiple(
        &self,
        sobject: &str,
        external_id_field: &str,
        records: &[Value],
        all_or_none: bool,
    ) -> Result<Vec<SaveResult>> {
        if !is_safe_field_name(external_id_field) {
            return Err(invalid("Invalid external ID field name"));
        }
        let request = collection_request(sobject, records, all_or_none, |record| {
            match record.get(external_id_field) {
                Some(v) if !v.is_null() => Ok(()),
                _ => Err(invalid(&format!(
                    "record is missing external ID field {}",
                    external_id_field
                ))),
            }
        })?;
        if request.records.is_empty() {
            return Ok(Vec::new());
        }
        let path = format!("composite/sobjects/{}/{}", sobject, external_id_field);
        self.send_json(Method::PATCH, &self.rest_url(&path), Some(&request))
            .await
    }

    /// Delete multiple records in a single request (up to 200).
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn delete_multiple<S: AsRef<str>>(
        &self,
        ids: &[S],
        all_or_none: bool,
    ) -> Result<Vec<SaveResult>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if ids.len() > MAX_COLLECTION_SIZE {
            return Err(too_many(ids.len()));
        }
        if let Some(bad) = ids.iter().find(|id| !is_valid_salesforce_id(id.as_ref())) {
            return Err(invalid(&format!(
                "Invalid Salesforce ID format: {}",
                bad.as_ref()
            )));
        }
        let ids_param = ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        let url = format!(
            "{}?ids={}&allOrNone={}",
            self.rest_url("composite/sobjects"),
            ids_param,
            all_or_none
        );
        self.send_json::<_, ()>(Method::DELETE, &url, None).await
    }
}

/// Validate records and tag each with `attributes.type`.
fn collection_request(
    sobject: &str,
    records: &[Value],
    all_or_none: bool,
    check: impl Fn(&Value) -> Result<()>,
) -> Result<CollectionRequest> {
    if !is_safe_sobject_name(sobject) {
        return Err(invalid(&format!("invalid SObject name '{}'", sobject)));
    }
    if records.len() > MAX_COLLECTION_SIZE {
        return Err(too_many(records.len()));
    }

    let mut tagged = Vec::with_capacity(records.len());
    for record in records {
        let Value::Object(map) = record else {
            return Err(invalid("records must be JSON objects"));
        };
        check(record)?;
        let mut map = map.clone();
        map.insert(
            "attributes".to_string(),
            serde_json::json!({ "type": sobject }),
        );
        tagged.push(Value::Object(map));
    }

    Ok(CollectionRequest {
        all_or_none,
        records: tagged,
    })
}

fn invalid(message: &str) -> Error {
    Error::new(ErrorKind::InvalidInput(message.to_string()))
}

fn too_many(count: usize) -> Error {
    invalid(&format!(
        "{} records exceed the collection limit of {}",
        count, MAX_COLLECTION_SIZE
    ))
}
