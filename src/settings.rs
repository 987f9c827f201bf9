// settings.rs - User Settings
//
// Optional JSON file in the platform config directory. Every field has a
// default, so a missing or partial file is fine. Nothing is written back at
// runtime.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::constants::{overlay, zoom};
use crate::lookup::LookupMode;
use crate::paths::AppPaths;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Image map lookup or `<input>.png`
    pub lookup: LookupMode,
    /// Zoom the slider starts at
    pub initial_zoom: u8,
    /// Color keyed out of staff charts, `null` to keep every pixel
    pub chroma_key: Option<[u8; 3]>,
    /// Passed to every staff chart window; currently has no effect
    pub overlay_enabled: bool,
    /// Use this directory instead of `image/` next to the executable
    pub image_root: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lookup: LookupMode::Catalog,
            initial_zoom: zoom::DEFAULT,
            chroma_key: Some(overlay::CHROMA_KEY),
            overlay_enabled: false,
            image_root: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("StaffChart")
            .join("settings.json")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file at {:?}, using defaults", path);
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Settings>(&contents) {
                Ok(settings) => {
                    info!("Settings loaded from {:?}", path);
                    return settings.sanitized();
                }
                Err(e) => {
                    error!("Failed to parse settings: {}", e);
                }
            },
            Err(e) => {
                error!("Failed to read settings file: {}", e);
            }
        }
        Self::default()
    }

    fn sanitized(mut self) -> Self {
        self.initial_zoom = self.initial_zoom.clamp(zoom::MIN, zoom::MAX);
        self
    }

    /// Install layout, honouring `image_root`
    pub fn paths(&self) -> AppPaths {
        match &self.image_root {
            Some(root) => AppPaths::new(root.clone()),
            None => AppPaths::from_startup_dir(),
        }
    }
}
