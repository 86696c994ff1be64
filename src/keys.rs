//! Cache key construction.
//!
//! The cache does not namespace keys itself; every key the engine uses is
//! built here so prefixes stay collision-free.

/// Key holding the credential used by the most recent login.
pub const CURRENT_CREDENTIALS: &str = "currentCredentials";

/// Session memoized for a username.
pub fn connection(username: &str) -> String {
    format!("con:{}", username)
}

/// describeGlobal object list for a user.
pub fn object_list(user_id: &str) -> String {
    format!("objectList:{}", user_id)
}

/// Field list of an object, as seen by a user.
pub fn object_fields(object_name: &str, user_id: &str) -> String {
    format!("objectFields:{}:{}", object_name, user_id)
}

/// Full describe of an object, as seen by a user.
pub fn object_info(object_name: &str, user_id: &str) -> String {
    format!("objectInfo:{}:{}", object_name, user_id)
}
