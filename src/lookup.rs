// lookup.rs - Lookup Resolver
//
// Turns what the user typed into an image file. Two strategies exist:
// the image map (catalog) and the bare `<input>.png` file name convention.

use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::ImageCatalog;
use crate::constants::layout;
use crate::error::LookupError;
use crate::paths::AppPaths;

/// How search input is mapped to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    /// Keyed lookup through `image_map.json`
    #[default]
    Catalog,
    /// `image/<input>.png`, no image map involved
    FileName,
}

/// A successful lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Catalog key or typed file name
    pub key: String,
    /// Path as written in the image map (or `<input>.png`)
    pub relative_path: String,
    pub path: PathBuf,
}

/// Case-insensitive equality, Unicode aware
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// First catalog key equal (ignoring case) to either input.
///
/// Inputs are trimmed; a blank input never matches.
pub fn resolve_key<'a>(catalog: &'a ImageCatalog, primary: &str, secondary: &str) -> Option<&'a str> {
    let primary = primary.trim();
    let secondary = secondary.trim();
    catalog.keys().find(|key| {
        (!primary.is_empty() && eq_ignore_case(key, primary))
            || (!secondary.is_empty() && eq_ignore_case(key, secondary))
    })
}

/// Keys containing `needle` (ignoring case), in catalog order.
/// An empty needle returns every key.
pub fn filter(catalog: &ImageCatalog, needle: &str) -> Vec<String> {
    let needle = needle.to_lowercase();
    catalog
        .keys()
        .filter(|key| needle.is_empty() || key.to_lowercase().contains(&needle))
        .map(str::to_owned)
        .collect()
}

impl LookupMode {
    /// Resolve the two search fields to an existing image file
    pub fn resolve(
        &self,
        catalog: &ImageCatalog,
        paths: &AppPaths,
        primary: &str,
        secondary: &str,
    ) -> Result<ResolvedImage, LookupError> {
        let primary = primary.trim();
        let secondary = secondary.trim();
        if primary.is_empty() && secondary.is_empty() {
            return Err(LookupError::EmptyInput);
        }

        let resolved = match self {
            Self::Catalog => resolve_in_catalog(catalog, paths, primary, secondary),
            Self::FileName => resolve_file_name(paths, primary, secondary),
        };
        debug!("Lookup {:?} / {:?} via {:?}: {:?}", primary, secondary, self, resolved);
        resolved
    }
}

fn resolve_in_catalog(
    catalog: &ImageCatalog,
    paths: &AppPaths,
    primary: &str,
    secondary: &str,
) -> Result<ResolvedImage, LookupError> {
    let key = resolve_key(catalog, primary, secondary).ok_or_else(|| LookupError::NotFound {
        primary: primary.to_owned(),
        secondary: secondary.to_owned(),
    })?;

    let relative_path = match catalog.path_of(key) {
        Some(relative) if !relative.trim().is_empty() => relative,
        _ => {
            return Err(LookupError::NoImageForKey {
                key: key.to_owned(),
            })
        }
    };

    let path = paths.resolve(relative_path);
    if !path.is_file() {
        return Err(LookupError::ImageMissing {
            relative_path: relative_path.to_owned(),
        });
    }

    Ok(ResolvedImage {
        key: key.to_owned(),
        relative_path: relative_path.to_owned(),
        path,
    })
}

fn resolve_file_name(
    paths: &AppPaths,
    primary: &str,
    secondary: &str,
) -> Result<ResolvedImage, LookupError> {
    // The file name variant only has one text box; the second field is a fallback
    let name = if primary.is_empty() { secondary } else { primary };
    let relative_path = format!("{name}.{}", layout::FILE_NAME_EXTENSION);
    let path = paths.resolve(&relative_path);
    if !path.is_file() {
        return Err(LookupError::ImageMissing { relative_path });
    }

    Ok(ResolvedImage {
        key: name.to_owned(),
        relative_path,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn catalog(entries: &[(&str, &str)]) -> ImageCatalog {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolve_key_ignores_case_of_every_variant() {
        let catalog = catalog(&[("1234M", "a.png"), ("5678", "b.png")]);
        for input in ["1234M", "1234m", " 1234m ", "1234M\t"] {
            assert_eq!(resolve_key(&catalog, input, ""), Some("1234M"));
        }
    }

    #[test]
    fn resolve_key_takes_first_match_in_catalog_order() {
        let catalog = catalog(&[("B", "b.png"), ("A", "a.png")]);
        // both inputs match something; catalog order decides
        assert_eq!(resolve_key(&catalog, "a", "b"), Some("B"));
    }

    #[test]
    fn resolve_key_uses_secondary_when_primary_misses() {
        let catalog = catalog(&[("1234M", "a.png")]);
        assert_eq!(resolve_key(&catalog, "9999", "1234m"), Some("1234M"));
        assert_eq!(resolve_key(&catalog, "9999", ""), None);
    }

    #[test]
    fn blank_inputs_are_empty_input() {
        let paths = AppPaths::new("unused");
        let catalog = catalog(&[("", "a.png")]);
        for (a, b) in [("", ""), ("  ", "\t"), ("\n", " ")] {
            for mode in [LookupMode::Catalog, LookupMode::FileName] {
                assert_eq!(
                    mode.resolve(&catalog, &paths, a, b),
                    Err(LookupError::EmptyInput)
                );
            }
        }
    }

    #[test]
    fn filter_empty_returns_all_in_order() {
        let catalog = catalog(&[("9", "x"), ("1", "y"), ("5", "z")]);
        assert_eq!(filter(&catalog, ""), ["9", "1", "5"]);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let catalog = catalog(&[("1234M", "x"), ("234", "y"), ("5678", "z"), ("M12", "w")]);
        assert_eq!(filter(&catalog, "34"), ["1234M", "234"]);
        assert_eq!(filter(&catalog, "m"), ["1234M", "M12"]);
        assert!(filter(&catalog, "zz").is_empty());
    }

    #[test]
    fn catalog_lookup_distinguishes_failures() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::new(dir.path());
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a").join("b.png"), b"png").unwrap();
        let catalog = catalog(&[("1234M", "a/b.png"), ("EMPTY", ""), ("GONE", "a/c.png")]);

        let found = LookupMode::Catalog.resolve(&catalog, &paths, "1234m", "").unwrap();
        assert_eq!(found.key, "1234M");
        assert_eq!(found.path, dir.path().join("a").join("b.png"));

        assert_eq!(
            LookupMode::Catalog.resolve(&catalog, &paths, "9999", ""),
            Err(LookupError::NotFound {
                primary: "9999".into(),
                secondary: String::new()
            })
        );
        assert_eq!(
            LookupMode::Catalog.resolve(&catalog, &paths, "empty", ""),
            Err(LookupError::NoImageForKey { key: "EMPTY".into() })
        );
        assert_eq!(
            LookupMode::Catalog.resolve(&catalog, &paths, "gone", ""),
            Err(LookupError::ImageMissing {
                relative_path: "a/c.png".into()
            })
        );
    }

    #[test]
    fn file_name_lookup_appends_png() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::new(dir.path());
        fs::write(dir.path().join("4321.png"), b"png").unwrap();
        let empty = ImageCatalog::default();

        let found = LookupMode::FileName.resolve(&empty, &paths, " 4321 ", "").unwrap();
        assert_eq!(found.relative_path, "4321.png");

        assert_eq!(
            LookupMode::FileName.resolve(&empty, &paths, "9999", ""),
            Err(LookupError::ImageMissing {
                relative_path: "9999.png".into()
            })
        );
    }
}
