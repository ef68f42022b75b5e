// Feed data model.
// Category labels, photo items and cached page entries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FramesError, Result};

/// Characters that may never appear in a category label.
/// `-` separates key segments; the rest are unsafe in file names.
const RESERVED_CHARS: &[char] = &['-', '/', '\\', ':', '*', '?', '"', '<', '>', '|'];

const MAX_CATEGORY_LEN: usize = 64;

/// Categories offered when no closed set is configured.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "All",
    "Animals",
    "Nature",
    "Technology",
    "Travel",
    "Food",
    "Architecture",
];

/// A validated category label.
///
/// Labels are case-insensitive: each word is stored capitalized, so "animals"
/// and "ANIMALS" are the same category and share one store key, even on
/// case-insensitive filesystems.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Label of the universal category that matches every photo.
    pub const ALL: &'static str = "All";

    pub fn new(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let valid = !label.is_empty()
            && label.chars().count() <= MAX_CATEGORY_LEN
            && !label
                .chars()
                .any(|c| c.is_control() || RESERVED_CHARS.contains(&c));
        if valid {
            Ok(Self(canonical_case(&label)))
        } else {
            Err(FramesError::InvalidCategory(label))
        }
    }

    /// The universal "All" category.
    pub fn all() -> Self {
        Self(Self::ALL.to_string())
    }

    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The built-in closed set, "All" first.
    pub fn defaults() -> Vec<Category> {
        DEFAULT_CATEGORIES
            .iter()
            .map(|label| Self(label.to_string()))
            .collect()
    }
}

/// Capitalize the first letter of each word and lowercase the rest.
/// Letters without a single-char uppercase form are lowercased instead, so
/// applying this twice gives the same label.
fn canonical_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut word_start = true;
    for c in label.chars() {
        if word_start {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => out.push(u),
                _ => out.extend(c.to_lowercase()),
            }
        } else {
            out.extend(c.to_lowercase());
        }
        word_start = c.is_whitespace();
    }
    out
}

impl Default for Category {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Category {
    type Err = FramesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Category {
    type Error = FramesError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

/// One photo in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    /// Locator of the displayed image.
    #[serde(rename = "url_s")]
    pub image_ref: String,
}

impl Item {
    pub fn new(id: impl Into<String>, image_ref: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_ref: image_ref.into(),
        }
    }
}

/// A cached page: its items in display order and when they were fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub items: Vec<Item>,
    pub fetched_at: DateTime<Utc>,
}

impl PageEntry {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            fetched_at: Utc::now(),
        }
    }

    /// Serialized form written to the store. Only the items are persisted;
    /// the timestamp comes back from the store's write time.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.items)?)
    }

    pub fn from_bytes(
        key: &str,
        bytes: &[u8],
        fetched_at: DateTime<Utc>,
    ) -> Result<Self> {
        let items = serde_json::from_slice(bytes).map_err(|source| FramesError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        Ok(Self { items, fetched_at })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_validation() {
        assert!(Category::new("Animals").is_ok());
        assert!(Category::new("Street Art").is_ok());
        assert!(Category::new("").is_err());
        assert!(Category::new("black-and-white").is_err());
        assert!(Category::new("a/b").is_err());
        assert!(Category::new("tab\there").is_err());
        assert!(Category::new("x".repeat(65)).is_err());
    }

    #[test]
    fn test_category_identity_ignores_case() {
        let animals = Category::new("Animals").unwrap();
        assert_eq!(Category::new("animals").unwrap(), animals);
        assert_eq!(Category::new("ANIMALS").unwrap(), animals);
        assert_eq!(Category::new("aNiMaLs").unwrap().as_str(), "Animals");
        assert_eq!(Category::new("street ART").unwrap().as_str(), "Street Art");
        assert_eq!(Category::new("all").unwrap(), Category::all());
        assert!(Category::new("all").unwrap().is_all());

        let parsed: Category = serde_json::from_str("\"travel\"").unwrap();
        assert_eq!(parsed.as_str(), "Travel");
    }

    #[test]
    fn test_defaults_are_canonical() {
        for category in Category::defaults() {
            assert_eq!(Category::new(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn test_category_all() {
        assert!(Category::all().is_all());
        assert!(Category::default().is_all());
        assert!(!Category::new("Nature").unwrap().is_all());
        assert_eq!(Category::defaults()[0], Category::all());
    }

    #[test]
    fn test_category_serde_rejects_reserved() {
        let ok: Category = serde_json::from_str("\"Travel\"").unwrap();
        assert_eq!(ok.as_str(), "Travel");
        assert!(serde_json::from_str::<Category>("\"a-b\"").is_err());
    }

    #[test]
    fn test_item_uses_legacy_field_name() {
        let item = Item::new("42", "https://live.staticflickr.com/1/42_s.jpg");
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"id":"42","url_s":"https://live.staticflickr.com/1/42_s.jpg"}"#
        );
    }

    #[test]
    fn test_entry_round_trip_preserves_order() {
        let entry = PageEntry::new(vec![
            Item::new("3", "c"),
            Item::new("1", "a"),
            Item::new("2", "b"),
        ]);
        let bytes = entry.to_bytes().unwrap();
        let back = PageEntry::from_bytes("k", &bytes, entry.fetched_at).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_entry_reads_records_with_extra_fields() {
        let legacy = br#"[{"id":"9","owner":"x","secret":"s","title":"t","url_s":"u"}]"#;
        let entry = PageEntry::from_bytes("k", legacy, Utc::now()).unwrap();
        assert_eq!(entry.items, vec![Item::new("9", "u")]);
    }

    #[test]
    fn test_entry_corrupt_value() {
        let err = PageEntry::from_bytes("k", b"not json", Utc::now()).unwrap_err();
        assert!(err.is_storage());
    }
}
