// error.rs - User-facing Error Kinds
//
// Every failure here ends the current user action only. The panel turns them
// into an inline status line (or a message box in file name mode).

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Failure to resolve search input to an image file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Both search fields were blank
    EmptyInput,
    /// No catalog key (or file name) matched either input
    NotFound { primary: String, secondary: String },
    /// The key matched but maps to an empty path
    NoImageForKey { key: String },
    /// The key matched but its image is not on disk
    ImageMissing { relative_path: String },
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "Please enter a train number."),
            Self::NotFound { primary, secondary } => {
                if secondary.is_empty() || primary == secondary {
                    write!(f, "No staff chart found for {primary}.")
                } else if primary.is_empty() {
                    write!(f, "No staff chart found for {secondary}.")
                } else {
                    write!(f, "No staff chart found for {primary} or {secondary}.")
                }
            }
            Self::NoImageForKey { key } => write!(f, "No staff chart found for {key}."),
            Self::ImageMissing { relative_path } => write!(f, "{relative_path} was not found."),
        }
    }
}

impl std::error::Error for LookupError {}

/// The image map exists but could not be read or parsed
#[derive(Debug)]
pub struct CatalogError {
    pub path: PathBuf,
    pub reason: String,
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to load the image map {}: {}",
            self.path.display(),
            self.reason
        )
    }
}

impl std::error::Error for CatalogError {}
