//! Cache key generators.
//!
//! Single-field lookups are keyed by the bare lookup value, so a username and
//! an email address that happen to be equal share one entry. Keys stay
//! compatible with entries written by earlier deployments of the service.

/// Key under which the full record collection is cached.
pub const ALL_USERS: &str = "allUsers";

/// Generate the cache key for a single-field lookup.
#[must_use]
pub fn user_by_value(value: &str) -> String {
    value.to_string()
}
