//! Format-agnostic tag set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical field names understood by every tag bridge.
///
/// Any other lower-case field name is carried through as-is; bridges map it
/// onto the container's own key when the container can hold it.
pub mod keys {
    pub const TITLE: &str = "title";
    pub const ARTIST: &str = "artist";
    pub const ALBUM: &str = "album";
    pub const ALBUM_ARTIST: &str = "albumartist";
    pub const TRACK_NUMBER: &str = "tracknumber";
    pub const TRACK_TOTAL: &str = "tracktotal";
    pub const DISC_NUMBER: &str = "discnumber";
    pub const DISC_TOTAL: &str = "disctotal";
    pub const DATE: &str = "date";
    pub const GENRE: &str = "genre";
    pub const COMMENT: &str = "comment";
    pub const COMPOSER: &str = "composer";
}

/// Mapping from lower-case field name to one or more text values.
///
/// A `TagSet` is always an owned copy: reading tags from a source file and
/// writing them to a destination never shares state between the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeMap<String, Vec<String>>);

impl TagSet {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field to a single value, normalising the key to lower case.
    ///
    /// Returns the previous values for the key, if any.
    pub fn insert(
        &mut self,
        key: impl AsRef<str>,
        value: impl Into<String>,
    ) -> Option<Vec<String>> {
        self.0.insert(key.as_ref().to_lowercase(), vec![value.into()])
    }

    /// Adds another value to a field, keeping the existing ones.
    pub fn append(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.0
            .entry(key.as_ref().to_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style [`append`](Self::append).
    pub fn and(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    /// First value of a field, looked up by (case-insensitive) name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Every value of a field, in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.0
            .get(&key.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Removes a field with all its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.remove(&key.to_lowercase())
    }

    /// Overwrites this set's fields with every field of `other`.
    pub fn update(&mut self, other: &TagSet) {
        for (key, values) in other.fields() {
            self.0.insert(key.to_string(), values.to_vec());
        }
    }

    /// Whether every field of `other` is present here with the same values.
    pub fn contains_all(&self, other: &TagSet) -> bool {
        other
            .fields()
            .all(|(key, values)| self.get_all(key) == values)
    }

    /// Iterates over fields and their values in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Iterates over every `(key, value)` pair, repeating the key for
    /// multi-valued fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collects pairs, appending repeated keys as extra values.
impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for (key, value) in iter {
            set.append(key, value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut tags = TagSet::new();
        tags.insert("TITLE", "Blue in Green");

        assert_eq!(tags.get("title"), Some("Blue in Green"));
        assert_eq!(tags.get("Title"), Some("Blue in Green"));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_multiple_values_per_field() {
        let mut tags = TagSet::new()
            .with(keys::ARTIST, "Miles Davis")
            .and("ARTIST", "John Coltrane");

        assert_eq!(tags.get(keys::ARTIST), Some("Miles Davis"));
        assert_eq!(tags.get_all(keys::ARTIST), ["Miles Davis", "John Coltrane"]);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.iter().count(), 2);

        tags.insert(keys::ARTIST, "Bill Evans");
        assert_eq!(tags.get_all(keys::ARTIST), ["Bill Evans"]);
        assert!(tags.get_all("missing").is_empty());
    }

    #[test]
    fn test_update_overwrites_and_keeps_existing() {
        let mut existing = TagSet::new()
            .with(keys::TITLE, "Old Title")
            .with(keys::GENRE, "Jazz")
            .and(keys::ARTIST, "Someone")
            .and(keys::ARTIST, "Someone Else");
        let incoming = TagSet::new()
            .with(keys::TITLE, "So What")
            .with(keys::ARTIST, "Miles Davis");

        existing.update(&incoming);

        assert_eq!(existing.get(keys::TITLE), Some("So What"));
        assert_eq!(existing.get_all(keys::ARTIST), ["Miles Davis"]);
        assert_eq!(existing.get(keys::GENRE), Some("Jazz"));
        assert!(existing.contains_all(&incoming));
    }

    #[test]
    fn test_contains_all_detects_mismatch() {
        let a = TagSet::new().with(keys::ALBUM, "Kind of Blue");
        let b = TagSet::new().with(keys::ALBUM, "Sketches of Spain");
        assert!(!a.contains_all(&b));
        assert!(a.contains_all(&TagSet::new()));

        let both = a.clone().and(keys::ALBUM, "Sketches of Spain");
        assert!(!both.contains_all(&a));
    }

    #[test]
    fn test_from_iterator_and_json() {
        let tags: TagSet = [("Artist", "Bill Evans"), ("date", "1959"), ("artist", "Scott LaFaro")]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(
            json,
            r#"{"artist":["Bill Evans","Scott LaFaro"],"date":["1959"]}"#
        );

        let parsed: TagSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tags);
    }
}
