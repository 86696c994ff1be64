//! Username/password login over the SOAP partner API.
//!
//! Salesforce only offers the plain username/password exchange through the
//! SOAP `login` call, so the request envelope is built by hand and the few
//! fields we need are pulled out of the response.

use tracing::{debug, instrument};

use crate::credentials::UserCredentials;
use crate::error::{Error, ErrorKind, Result};
use crate::session::Session;
use crate::DEFAULT_API_VERSION;

/// Client for the SOAP `login` call.
#[derive(Debug, Clone)]
pub struct PasswordLogin {
    http_client: reqwest::Client,
    api_version: String,
}

impl Default for PasswordLogin {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordLogin {
    /// Create a login client using the default API version.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a login client that reuses an existing HTTP client.
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Set the API version used for the login endpoint (e.g. "62.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// SOAP endpoint for a login URL.
    pub fn endpoint(&self, login_url: &str) -> String {
        format!(
            "{}/services/Soap/u/{}",
            login_url.trim_end_matches('/'),
            self.api_version
        )
    }

    /// Log in with a username and password.
    ///
    /// The password is not logged.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, login_url: &str, credentials: &UserCredentials) -> Result<Session> {
        if !credentials.is_valid() {
            return Err(Error::new(ErrorKind::InvalidInput(
                "username and password must not be empty".to_string(),
            )));
        }

        let response = self
            .http_client
            .post(self.endpoint(login_url))
            .header("Content-Type", "text/xml; charset=UTF-8")
            .header("SOAPAction", "\"\"")
            .body(login_envelope(credentials))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if let Some((code, message)) = parse_soap_fault(&body) {
            return Err(Error::new(ErrorKind::Login { code, message }));
        }
        if !status.is_success() {
            return Err(Error::new(ErrorKind::Http(format!(
                "login endpoint returned {}",
                status
            ))));
        }

        let session = self.parse_login_result(&body)?;
        debug!(user_id = %session.user_id(), instance_url = %session.instance_url(), "logged in");
        Ok(session)
    }

    fn parse_login_result(&self, xml: &str) -> Result<Session> {
        let missing =
            |field: &str| Error::new(ErrorKind::InvalidResponse(format!("missing {}", field)));

        let session_id = extract_element(xml, "sessionId").ok_or_else(|| missing("sessionId"))?;
        let server_url = extract_element(xml, "serverUrl").ok_or_else(|| missing("serverUrl"))?;
        let user_id = extract_element(xml, "userId").ok_or_else(|| missing("userId"))?;

        let parsed = url::Url::parse(&server_url).map_err(|e| {
            Error::with_source(
                ErrorKind::InvalidResponse(format!("invalid serverUrl: {}", e)),
                e,
            )
        })?;
        let instance_url = parsed.origin().ascii_serialization();

        let mut session = Session::new(instance_url, session_id, user_id)
            .with_server_url(server_url)
            .with_api_version(&self.api_version);
        if let Some(org_id) = extract_element(xml, "organizationId") {
            session = session.with_organization_id(org_id);
        }
        Ok(session)
    }
}

fn login_envelope(credentials: &UserCredentials) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<env:Envelope xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:env="http://schemas.xmlsoap.org/soap/envelope/">
  <env:Body>
    <n1:login xmlns:n1="urn:partner.soap.sforce.com">
      <n1:username>{}</n1:username>
      <n1:password>{}</n1:password>
    </n1:login>
  </env:Body>
</env:Envelope>"#,
        escape_xml(credentials.username()),
        escape_xml(credentials.password())
    )
}

/// Fault code and message, if the body is a SOAP fault.
fn parse_soap_fault(xml: &str) -> Option<(String, String)> {
    if !xml.contains("faultcode") {
        return None;
    }
    let code = extract_element(xml, "faultcode")?;
    let message =
        extract_element(xml, "faultstring").unwrap_or_else(|| "Unknown error".to_string());
    Some((code, message))
}

/// Text of the first `<tag>` (optionally namespace-prefixed) element.
fn extract_element(xml: &str, tag: &str) -> Option<String> {
    for prefix in ["", "sf:", "soapenv:", "n1:"] {
        let start = format!("<{}{}>", prefix, tag);
        let end = format!("</{}{}>", prefix, tag);
        if let Some(start_idx) = xml.find(&start) {
            let rest = &xml[start_idx + start.len()..];
            if let Some(end_idx) = rest.find(&end) {
                return Some(unescape_xml(&rest[..end_idx]));
            }
        }
    }
    None
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
