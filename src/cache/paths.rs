// Cache keys and path utilities.
// Builds the persisted key scheme and maps keys onto files in the cache directory.

use std::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{FramesError, Result};
use crate::model::Category;

const KEY_PREFIX: &str = "cachedPhotos-";
const PAGE_MARKER: &str = "-page-";
const ENTRY_EXTENSION: &str = "json";

/// Get the base cache directory (~/.cache/frames on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "frames").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory holding one file per cached page.
pub fn pages_dir(base: &Path) -> PathBuf {
    base.join("pages")
}

/// Path of the file backing a store key.
pub fn entry_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.{}", key, ENTRY_EXTENSION))
}

/// Key of one cached page: `cachedPhotos-<category>-page-<page>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    category: Category,
    page: u32,
}

impl CacheKey {
    pub fn new(category: Category, page: u32) -> Result<Self> {
        if page == 0 {
            return Err(FramesError::InvalidKey(format!(
                "{}{}{}0",
                KEY_PREFIX, category, PAGE_MARKER
            )));
        }
        Ok(Self { category, page })
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Recover category and page from a rendered key.
    pub fn parse(key: &str) -> Result<Self> {
        let invalid = || FramesError::InvalidKey(key.to_string());

        let rest = key.strip_prefix(KEY_PREFIX).ok_or_else(invalid)?;
        let (category, page) = rest.split_once(PAGE_MARKER).ok_or_else(invalid)?;
        let category = Category::new(category).map_err(|_| invalid())?;
        let page = page.parse::<u32>().map_err(|_| invalid())?;

        Self::new(category, page).map_err(|_| invalid())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            KEY_PREFIX, self.category, PAGE_MARKER, self.page
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(category: &str, page: u32) -> CacheKey {
        CacheKey::new(Category::new(category).unwrap(), page).unwrap()
    }

    #[test]
    fn test_key_format() {
        assert_eq!(key("Animals", 3).to_string(), "cachedPhotos-Animals-page-3");
        assert_eq!(key("All", 1).to_string(), "cachedPhotos-All-page-1");
    }

    #[test]
    fn test_key_parse() {
        let parsed = CacheKey::parse("cachedPhotos-Street Art-page-12").unwrap();
        assert_eq!(parsed.category().as_str(), "Street Art");
        assert_eq!(parsed.page(), 12);
        assert_eq!(parsed, key("Street Art", 12));
    }

    #[test]
    fn test_key_parse_rejects_garbage() {
        assert!(CacheKey::parse("cachedPhotos").is_err());
        assert!(CacheKey::parse("photos-Animals-page-1").is_err());
        assert!(CacheKey::parse("cachedPhotos-Animals-page-0").is_err());
        assert!(CacheKey::parse("cachedPhotos-Animals-page-x").is_err());
        assert!(CacheKey::parse("cachedPhotos-a-b-page-1").is_err());
    }

    #[test]
    fn test_key_ignores_category_case() {
        assert_eq!(key("animals", 1).to_string(), "cachedPhotos-Animals-page-1");
        assert_eq!(key("ANIMALS", 1), key("Animals", 1));
        assert_eq!(
            CacheKey::parse("cachedPhotos-animals-page-1").unwrap(),
            key("Animals", 1)
        );
    }

    #[test]
    fn test_distinct_keys_never_collide() {
        assert_ne!(key("Food", 11).to_string(), key("Food", 1).to_string());
        assert_ne!(key("Food", 1).to_string(), key("Travel", 1).to_string());
    }

    #[test]
    fn test_zero_page_rejected() {
        assert!(CacheKey::new(Category::all(), 0).is_err());
    }

    #[test]
    fn test_entry_path() {
        let dir = Path::new("/tmp/frames/pages");
        let path = entry_path(dir, &key("Nature", 2).to_string());
        assert!(path.ends_with("pages/cachedPhotos-Nature-page-2.json"));
    }
}
