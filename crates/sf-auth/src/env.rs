//! Environment variable names shared by every busbar-sf consumer.
//!
//! Each setting is read from `SF_<NAME>` and falls back to
//! `SALESFORCE_<NAME>`. Empty values count as unset.

/// Read setting `name` through `lookup`.
///
/// `lookup` is usually `|k| std::env::var(k).ok()`; tests pass a map.
pub fn var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(&format!("SF_{}", name))
        .filter(|value| !value.is_empty())
        .or_else(|| lookup(&format!("SALESFORCE_{}", name)))
        .filter(|value| !value.is_empty())
}
