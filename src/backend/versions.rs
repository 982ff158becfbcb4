//! Version map returned by the primary backend.
//!
//! The endpoint has used both zero-padded and unpadded keys for the same
//! book. Lookup tries the padded key, then the unpadded key, then falls back
//! to version 1.

use std::collections::HashMap;

use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::book::BookId;

/// Version used when the map has no usable entry for a book.
pub const DEFAULT_VERSION: u32 = 1;

/// Raw value of one map entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum VersionEntry {
    Number(u64),
    Text(String),
    Other(IgnoredAny),
}

impl VersionEntry {
    fn as_version(&self) -> Option<u32> {
        let value = match self {
            Self::Number(n) => u32::try_from(*n).ok()?,
            Self::Text(text) => text.trim().parse::<u32>().ok()?,
            Self::Other(_) => return None,
        };
        (value > 0).then_some(value)
    }
}

/// Body of `GET {primary}/download/versions/`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct VersionMapResponse {
    entries: HashMap<String, VersionEntry>,
}

/// Book id to current version.
#[derive(Debug, Clone, Default)]
pub struct VersionMap {
    entries: HashMap<String, VersionEntry>,
}

impl From<VersionMapResponse> for VersionMap {
    fn from(response: VersionMapResponse) -> Self {
        Self {
            entries: response.entries,
        }
    }
}

impl VersionMap {
    /// Number of raw entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Version for `id`, or `None` if neither key form has a usable value.
    #[must_use]
    pub fn get(&self, id: BookId) -> Option<u32> {
        [id.file_id(), id.unpadded()]
            .iter()
            .find_map(|key| self.entries.get(key).and_then(VersionEntry::as_version))
    }

    /// Version for `id`, defaulting to [`DEFAULT_VERSION`].
    #[must_use]
    pub fn version_for(&self, id: BookId) -> u32 {
        self.get(id).unwrap_or(DEFAULT_VERSION)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn map(json: &str) -> VersionMap {
        serde_json::from_str::<VersionMapResponse>(json)
            .unwrap()
            .into()
    }

    fn id(value: u32) -> BookId {
        BookId::new(value).unwrap()
    }

    #[test]
    fn test_padded_key() {
        assert_eq!(map(r#"{"09550": 2}"#).version_for(id(9550)), 2);
    }

    #[test]
    fn test_unpadded_key() {
        assert_eq!(map(r#"{"9550": 3}"#).version_for(id(9550)), 3);
    }

    #[test]
    fn test_padded_key_wins_over_unpadded() {
        assert_eq!(map(r#"{"9550": 3, "09550": 4}"#).version_for(id(9550)), 4);
    }

    #[test]
    fn test_absent_defaults_to_one() {
        let versions = map(r#"{"12345": 9}"#);
        assert_eq!(versions.get(id(9550)), None);
        assert_eq!(versions.version_for(id(9550)), DEFAULT_VERSION);
    }

    #[test]
    fn test_numeric_string_values_are_accepted() {
        assert_eq!(map(r#"{"42": "5"}"#).version_for(id(42)), 5);
    }

    #[test]
    fn test_unusable_padded_value_falls_through_to_unpadded() {
        assert_eq!(map(r#"{"00042": null, "42": 6}"#).version_for(id(42)), 6);
    }

    #[test]
    fn test_zero_negative_and_garbage_default_to_one() {
        assert_eq!(map(r#"{"42": 0}"#).version_for(id(42)), 1);
        assert_eq!(map(r#"{"42": -3}"#).version_for(id(42)), 1);
        assert_eq!(map(r#"{"42": "abc"}"#).version_for(id(42)), 1);
        assert_eq!(map(r#"{"42": {"version": 2}}"#).version_for(id(42)), 1);
    }

    #[test]
    fn test_five_digit_id_has_single_key_form() {
        let versions = map(r#"{"12345": 7}"#);
        assert_eq!(versions.version_for(id(12_345)), 7);
        assert_eq!(versions.len(), 1);
        assert!(!versions.is_empty());
    }
}
