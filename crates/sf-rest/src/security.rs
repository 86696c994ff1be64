//! Validation of identifiers that end up in request paths.
//!
//! Object and field names are interpolated into URLs, so anything that is
//! not a plain API name is rejected before a request is built.

/// Validate that a field name contains only safe characters.
///
/// Field names must start with a letter and contain only ASCII
/// alphanumerics and underscores (which covers `__c` / `__r` suffixes).
///
/// ```rust
/// use busbar_sf_rest::security::is_safe_field_name;
///
/// assert!(is_safe_field_name("External_Id__c"));
/// assert!(!is_safe_field_name("Bad'; DROP TABLE--"));
/// ```
#[must_use]
pub fn is_safe_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Validate an SObject API name. Same rules as field names.
#[must_use]
pub fn is_safe_sobject_name(name: &str) -> bool {
    is_safe_field_name(name)
}

/// Validate a 15 or 18 character Salesforce record id.
#[must_use]
pub fn is_valid_salesforce_id(id: &str) -> bool {
    (id.len() == 15 || id.len() == 18) && id.chars().all(|ch| ch.is_ascii_alphanumeric())
}
