//! Helpers for partial-update (PATCH) payloads.

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable field so that an explicit `null` is distinguishable
/// from an absent one. Use with `#[serde(default, deserialize_with = ...)]`:
///
/// - field absent: `None` (keep the stored value)
/// - `null`: `Some(None)` (clear it)
/// - a value: `Some(Some(v))`
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Borrow the inner value of a nullable patch field.
pub fn as_deref_patch(field: &Option<Option<String>>) -> Option<Option<&str>> {
    field.as_ref().map(|inner| inner.as_deref())
}
