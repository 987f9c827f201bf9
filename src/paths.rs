// paths.rs - Install Layout
//
// All staff charts resolve below one image root, normally `image/` next to
// the executable. Image map paths always use `/` and are joined component by
// component so the host separator ends up in the final path.

use std::path::{Path, PathBuf};

use crate::constants::layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    image_root: PathBuf,
}

impl AppPaths {
    /// Layout rooted at `<startup dir>/image`
    pub fn from_startup_dir() -> Self {
        Self::new(startup_dir().join(layout::IMAGE_DIR))
    }

    pub fn new(image_root: impl Into<PathBuf>) -> Self {
        Self {
            image_root: image_root.into(),
        }
    }

    pub fn image_root(&self) -> &Path {
        &self.image_root
    }

    pub fn image_map(&self) -> PathBuf {
        self.image_root.join(layout::IMAGE_MAP_FILE)
    }

    pub fn slider_dir(&self) -> PathBuf {
        self.image_root.join(layout::SLIDER_DIR)
    }

    pub fn default_slider(&self) -> PathBuf {
        self.slider_dir().join(layout::DEFAULT_SLIDER_FILE)
    }

    /// Join a `/`-separated image map path onto the image root
    pub fn resolve(&self, relative: &str) -> PathBuf {
        relative
            .split(['/', '\\'])
            .filter(|part| !part.is_empty())
            .fold(self.image_root.clone(), |path, part| path.join(part))
    }
}

/// Directory of the running executable, or the working directory if that
/// cannot be determined
pub fn startup_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
