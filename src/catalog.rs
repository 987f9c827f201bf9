// catalog.rs - Image Catalog
//
// Flat map of lookup key -> image path (relative to the image root), read once
// at startup from `image/image_map.json`. Source order is kept; it drives the
// suggestion list.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use indexmap::IndexMap;
use log::{info, warn};

use crate::error::CatalogError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCatalog {
    entries: IndexMap<String, String>,
}

impl ImageCatalog {
    /// Read the image map at `path`.
    ///
    /// A missing file is an empty catalog, not an error. The file may contain
    /// comments and trailing commas. A duplicated key keeps its first position
    /// and its last value.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No image map at {:?}, starting with an empty catalog", path);
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CatalogError {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        let catalog = Self::parse(&text).map_err(|reason| CatalogError {
            path: path.to_path_buf(),
            reason,
        })?;
        info!("Loaded {} image map entries from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Like [`ImageCatalog::load`], but a broken file degrades to an empty
    /// catalog. The error is handed back so the caller can tell the user.
    pub fn load_or_empty(path: &Path) -> (Self, Option<CatalogError>) {
        match Self::load(path) {
            Ok(catalog) => (catalog, None),
            Err(e) => {
                warn!("{}", e);
                (Self::default(), Some(e))
            }
        }
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        let entries: IndexMap<String, String> =
            json5::from_str(text).map_err(|e| e.to_string())?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in source order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn path_of(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for ImageCatalog {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_source_order() {
        let catalog = ImageCatalog::parse(r#"{"B": "b.png", "A": "a.png", "C": "c.png"}"#).unwrap();
        assert_eq!(catalog.keys().collect::<Vec<_>>(), ["B", "A", "C"]);
        assert_eq!(catalog.path_of("A"), Some("a.png"));
    }

    #[test]
    fn parse_tolerates_comments_and_trailing_commas() {
        let text = r#"
            // local trains
            {
                "1234M": "local/1234M.png", /* weekday */
                "5678": "rapid/5678.png",
            }
        "#;
        let catalog = ImageCatalog::parse(text).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.path_of("5678"), Some("rapid/5678.png"));
    }

    #[test]
    fn duplicate_key_keeps_last_value() {
        let catalog = ImageCatalog::parse(r#"{"A": "old.png", "B": "b.png", "A": "new.png"}"#).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.path_of("A"), Some("new.png"));
    }

    #[test]
    fn parse_rejects_non_string_values() {
        assert!(ImageCatalog::parse(r#"{"A": 12}"#).is_err());
        assert!(ImageCatalog::parse("[1, 2]").is_err());
    }

    #[test]
    fn missing_file_is_an_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ImageCatalog::load(&dir.path().join("image_map.json")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn broken_file_degrades_to_empty_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image_map.json");
        fs::write(&path, "{ not json").unwrap();

        let (catalog, error) = ImageCatalog::load_or_empty(&path);
        assert!(catalog.is_empty());
        let error = error.expect("parse failure should be reported");
        assert_eq!(error.path, path);
    }
}
