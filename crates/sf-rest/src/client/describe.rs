use tracing::instrument;

use crate::describe::{DescribeGlobalResult, DescribeSObjectResult};
use crate::error::{Error, ErrorKind, Result};
use crate::security::is_safe_sobject_name;

impl super::SalesforceRestClient {
    /// Get a list of all SObjects available in the org.
    ///
    /// This is equivalent to calling `/services/data/vXX.0/sobjects/`.
    #[instrument(skip(self))]
    pub async fn describe_global(&self) -> Result<DescribeGlobalResult> {
        self.get_json(&self.rest_url("sobjects")).await
    }

    /// Get detailed metadata for a specific SObject.
    ///
    /// This is equivalent to calling `/services/data/vXX.0/sobjects/{sobject}/describe`.
    #[instrument(skip(self))]
    pub async fn describe_sobject(&self, sobject: &str) -> Result<DescribeSObjectResult> {
        if !is_safe_sobject_name(sobject) {
            return Err(Error::new(ErrorKind::InvalidInput(format!(
                "invalid SObject name '{}'",
                sobject
            ))));
        }
        let path = format!("sobjects/{}/describe", sobject);
        self.get_json(&self.rest_url(&path)).await
    }
}
