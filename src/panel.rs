// panel.rs - Search Panel State
//
// Everything the main window does, minus the widgets: search input, the
// filtered suggestion list, the zoom level, and the two overlay slots.
// Handlers mutate state and return `PanelCommand`s, which the app turns into
// window tasks. At most one primary and one slider overlay exist; a new
// primary always closes the old one first.

use std::path::PathBuf;

use iced::Size;
use log::{info, warn};

use crate::catalog::ImageCatalog;
use crate::constants::zoom;
use crate::error::LookupError;
use crate::lookup::{self, LookupMode};
use crate::overlay::{OverlayConfig, OverlayWindow};
use crate::paths::AppPaths;
use crate::render;
use crate::settings::Settings;

/// Which overlay slot a command refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverlayRole {
    /// The staff chart found by the last search
    Primary,
    /// The reference slider image
    Slider,
}

/// Window-level work the panel needs done
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    /// Open a window for the overlay now in this slot
    Open(OverlayRole),
    /// Close the window of this slot
    Close(OverlayRole),
    /// Resize the window of this slot (zoom changed)
    Resize(OverlayRole, Size),
    /// Show a modal error (file name mode)
    ShowDialog(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Error(String),
    Info(String),
}

pub struct SearchPanel {
    catalog: ImageCatalog,
    paths: AppPaths,
    lookup: LookupMode,
    chroma_key: Option<[u8; 3]>,
    overlay_enabled: bool,

    search_text: String,
    suggestions: Vec<String>,
    selected: Option<String>,
    zoom: u8,
    status: Option<Status>,
    /// Replaced through the file picker; not persisted
    slider_path: Option<PathBuf>,

    primary: Option<OverlayWindow>,
    slider: Option<OverlayWindow>,
}

impl SearchPanel {
    pub fn new(catalog: ImageCatalog, paths: AppPaths, settings: &Settings) -> Self {
        let suggestions = lookup::filter(&catalog, "");
        let selected = suggestions.first().cloned();
        Self {
            catalog,
            paths,
            lookup: settings.lookup,
            chroma_key: settings.chroma_key,
            overlay_enabled: settings.overlay_enabled,
            search_text: String::new(),
            suggestions,
            selected,
            zoom: settings.initial_zoom.min(zoom::MAX),
            status: None,
            slider_path: None,
            primary: None,
            slider: None,
        }
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Text box edited: re-filter the suggestion list and select its first
    /// entry. An empty list clears the selection so a stale key is never
    /// looked up.
    pub fn set_search_text(&mut self, text: String) {
        self.suggestions = lookup::filter(&self.catalog, &text);
        self.selected = self.suggestions.first().cloned();
        self.search_text = text;
    }

    pub fn select_suggestion(&mut self, key: String) {
        self.selected = Some(key);
    }

    /// Look up the current input and open its staff chart
    pub fn submit(&mut self) -> Vec<PanelCommand> {
        self.status = None;
        let secondary = self.selected.clone().unwrap_or_default();

        let resolved = match self
            .lookup
            .resolve(&self.catalog, &self.paths, &self.search_text, &secondary)
        {
            Ok(resolved) => resolved,
            Err(e) => return self.report(e),
        };

        let image = match render::load_rgba(&resolved.path) {
            Ok(image) => image,
            Err(e) => {
                warn!("{:#}", e);
                self.status = Some(Status::Error(format!("{:#}", e)));
                return Vec::new();
            }
        };
        info!("Showing {} ({})", resolved.key, resolved.relative_path);

        let mut commands = self.close_primary();
        let config = OverlayConfig::primary(self.chroma_key, self.overlay_enabled, self.zoom);
        self.primary = Some(OverlayWindow::new(image, config));
        commands.push(PanelCommand::Open(OverlayRole::Primary));
        commands
    }

    fn report(&mut self, error: LookupError) -> Vec<PanelCommand> {
        info!("Lookup failed: {}", error);
        match self.lookup {
            LookupMode::Catalog => {
                self.status = Some(Status::Error(error.to_string()));
                Vec::new()
            }
            LookupMode::FileName => vec![PanelCommand::ShowDialog(error.to_string())],
        }
    }

    // ------------------------------------------------------------------
    // Zoom
    // ------------------------------------------------------------------

    /// Apply a new zoom to every open overlay
    pub fn set_zoom(&mut self, percent: u8) -> Vec<PanelCommand> {
        let percent = percent.min(zoom::MAX);
        self.zoom = percent;
        let mut commands = Vec::new();
        for role in [OverlayRole::Primary, OverlayRole::Slider] {
            if let Some(overlay) = self.open_overlay_mut(role) {
                if let Some(size) = overlay.set_scale_percent(percent) {
                    commands.push(PanelCommand::Resize(role, size));
                }
            }
        }
        commands
    }

    /// Page Up / Page Down
    pub fn step_zoom(&mut self, up: bool) -> Vec<PanelCommand> {
        let next = if up {
            self.zoom.saturating_add(zoom::LARGE_STEP).min(zoom::MAX)
        } else {
            self.zoom.saturating_sub(zoom::LARGE_STEP).max(zoom::MIN)
        };
        if next == self.zoom {
            return Vec::new();
        }
        self.set_zoom(next)
    }

    // ------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------

    /// "Close staff chart": tear down both overlays
    pub fn close_all(&mut self) -> Vec<PanelCommand> {
        let mut commands = self.close_primary();
        commands.extend(self.close_slider());
        commands
    }

    fn close_primary(&mut self) -> Vec<PanelCommand> {
        close_slot(&mut self.primary, OverlayRole::Primary)
    }

    fn close_slider(&mut self) -> Vec<PanelCommand> {
        close_slot(&mut self.slider, OverlayRole::Slider)
    }

    /// Show the slider, or hide it if it is already up
    pub fn toggle_slider(&mut self) -> Vec<PanelCommand> {
        if self.overlay(OverlayRole::Slider).is_some() {
            return self.close_slider();
        }

        let path = self.slider_path();
        if !path.is_file() {
            warn!("Slider image not found at {:?}", path);
            self.status = Some(Status::Error(format!(
                "Slider image not found: {}",
                path.display()
            )));
            return Vec::new();
        }

        match render::load_rgba(&path) {
            Ok(image) => {
                self.slider = Some(OverlayWindow::new(image, OverlayConfig::slider(self.zoom)));
                vec![PanelCommand::Open(OverlayRole::Slider)]
            }
            Err(e) => {
                warn!("{:#}", e);
                self.status = Some(Status::Error(format!("{:#}", e)));
                Vec::new()
            }
        }
    }

    /// Slider image picked in the file dialog
    pub fn set_slider_path(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("Slider image changed to {:?}", path);
        self.status = Some(Status::Info(format!("Slider image changed: {name}")));
        self.slider_path = Some(path);
    }

    /// The slider's window went away without the panel asking
    pub fn overlay_closed(&mut self, role: OverlayRole) {
        let slot = match role {
            OverlayRole::Primary => &mut self.primary,
            OverlayRole::Slider => &mut self.slider,
        };
        if let Some(mut overlay) = slot.take() {
            overlay.close();
        }
    }

    pub fn overlay(&self, role: OverlayRole) -> Option<&OverlayWindow> {
        match role {
            OverlayRole::Primary => self.primary.as_ref(),
            OverlayRole::Slider => self.slider.as_ref(),
        }
        .filter(|overlay| !overlay.is_closed())
    }

    pub fn open_overlay_mut(&mut self, role: OverlayRole) -> Option<&mut OverlayWindow> {
        match role {
            OverlayRole::Primary => self.primary.as_mut(),
            OverlayRole::Slider => self.slider.as_mut(),
        }
        .filter(|overlay| !overlay.is_closed())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn zoom_label(&self) -> String {
        format!("{}%", self.zoom)
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    pub fn slider_path(&self) -> PathBuf {
        self.slider_path
            .clone()
            .unwrap_or_else(|| self.paths.default_slider())
    }

    pub fn slider_dir(&self) -> PathBuf {
        self.paths.slider_dir()
    }

    pub fn lookup_mode(&self) -> LookupMode {
        self.lookup
    }
}

/// Close and empty one overlay slot
fn close_slot(slot: &mut Option<OverlayWindow>, role: OverlayRole) -> Vec<PanelCommand> {
    let Some(mut overlay) = slot.take() else {
        return Vec::new();
    };
    if overlay.close() {
        vec![PanelCommand::Close(role)]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_png(path: &Path, w: u32, h: u32) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255])).save(path).unwrap();
    }

    fn panel(entries: &[(&str, &str)]) -> (TempDir, SearchPanel) {
        let dir = tempfile::tempdir().unwrap();
        let catalog = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let panel = SearchPanel::new(catalog, AppPaths::new(dir.path()), &Settings::default());
        (dir, panel)
    }

    #[test]
    fn suggestions_start_with_every_key_and_first_selected() {
        let (_dir, panel) = panel(&[("B", "b.png"), ("A", "a.png")]);
        assert_eq!(panel.suggestions(), ["B", "A"]);
        assert_eq!(panel.selected(), Some("B"));
        assert_eq!(panel.zoom_label(), "100%");
    }

    #[test]
    fn typing_filters_and_reselects() {
        let (_dir, mut panel) = panel(&[("1234M", "a.png"), ("5678", "b.png"), ("1299", "c.png")]);
        panel.set_search_text("12".into());
        assert_eq!(panel.suggestions(), ["1234M", "1299"]);
        assert_eq!(panel.selected(), Some("1234M"));

        panel.set_search_text("99".into());
        assert_eq!(panel.selected(), Some("1299"));

        // nothing left: nothing selected
        panel.set_search_text("zzz".into());
        assert!(panel.suggestions().is_empty());
        assert_eq!(panel.selected(), None);
    }

    #[test]
    fn unmatched_input_does_not_fall_back_to_previous_key() {
        let (dir, mut panel) = panel(&[("1234M", "a/b.png")]);
        write_png(&dir.path().join("a/b.png"), 8, 8);

        panel.set_search_text("9999".into());
        assert!(panel.submit().is_empty());
        assert!(panel.overlay(OverlayRole::Primary).is_none());
        assert_eq!(
            panel.status(),
            Some(&Status::Error(
                LookupError::NotFound {
                    primary: "9999".into(),
                    secondary: String::new(),
                }
                .to_string()
            ))
        );
    }

    #[test]
    fn blank_submit_asks_for_input() {
        let (_dir, mut panel) = panel(&[]);
        assert!(panel.submit().is_empty());
        assert_eq!(
            panel.status(),
            Some(&Status::Error(LookupError::EmptyInput.to_string()))
        );
    }

    #[test]
    fn second_search_closes_first_window_before_opening() {
        let (dir, mut panel) = panel(&[("1234M", "a/b.png"), ("5678", "c.png")]);
        write_png(&dir.path().join("a/b.png"), 40, 20);
        write_png(&dir.path().join("c.png"), 10, 10);

        panel.set_search_text("1234m".into());
        assert_eq!(panel.submit(), vec![PanelCommand::Open(OverlayRole::Primary)]);

        panel.set_search_text("5678".into());
        assert_eq!(
            panel.submit(),
            vec![
                PanelCommand::Close(OverlayRole::Primary),
                PanelCommand::Open(OverlayRole::Primary)
            ]
        );
        assert_eq!(panel.overlay(OverlayRole::Primary).unwrap().source_size(), (10, 10));
    }

    #[test]
    fn zoom_resizes_open_overlays_only() {
        let (dir, mut panel) = panel(&[("1234M", "a/b.png")]);
        write_png(&dir.path().join("a/b.png"), 101, 51);

        assert!(panel.set_zoom(80).is_empty());

        panel.set_search_text("1234M".into());
        panel.submit();
        assert_eq!(
            panel.set_zoom(50),
            vec![PanelCommand::Resize(OverlayRole::Primary, Size::new(50.0, 25.0))]
        );
        assert_eq!(panel.zoom_label(), "50%");

        // 0% clears the bitmap; no resize is requested
        assert!(panel.set_zoom(0).is_empty());
        assert!(panel.overlay(OverlayRole::Primary).unwrap().handle().is_none());
    }

    #[test]
    fn page_keys_step_by_ten_and_clamp() {
        let (_dir, mut panel) = panel(&[]);
        panel.step_zoom(true);
        assert_eq!(panel.zoom(), 100);
        panel.set_zoom(5);
        panel.step_zoom(false);
        assert_eq!(panel.zoom(), 0);
        panel.step_zoom(true);
        assert_eq!(panel.zoom(), 10);
    }

    #[test]
    fn slider_toggles_and_reports_missing_image() {
        let (dir, mut panel) = panel(&[]);
        assert!(panel.toggle_slider().is_empty());
        assert!(matches!(panel.status(), Some(Status::Error(msg)) if msg.contains("slider1.png")));

        write_png(&dir.path().join("slider/slider1.png"), 30, 30);
        assert_eq!(panel.toggle_slider(), vec![PanelCommand::Open(OverlayRole::Slider)]);
        assert_eq!(panel.toggle_slider(), vec![PanelCommand::Close(OverlayRole::Slider)]);
        assert!(panel.overlay(OverlayRole::Slider).is_none());
    }

    #[test]
    fn picked_slider_path_replaces_default() {
        let (dir, mut panel) = panel(&[]);
        let custom = dir.path().join("slider/custom.png");
        write_png(&custom, 8, 8);

        panel.set_slider_path(custom.clone());
        assert_eq!(panel.slider_path(), custom);
        assert_eq!(
            panel.status(),
            Some(&Status::Info("Slider image changed: custom.png".into()))
        );
        assert_eq!(panel.toggle_slider(), vec![PanelCommand::Open(OverlayRole::Slider)]);
    }

    #[test]
    fn close_all_closes_both_and_is_idempotent() {
        let (dir, mut panel) = panel(&[("K", "k.png")]);
        write_png(&dir.path().join("k.png"), 4, 4);
        write_png(&dir.path().join("slider/slider1.png"), 4, 4);

        panel.set_search_text("k".into());
        panel.submit();
        panel.toggle_slider();
        assert_eq!(
            panel.close_all(),
            vec![
                PanelCommand::Close(OverlayRole::Primary),
                PanelCommand::Close(OverlayRole::Slider)
            ]
        );
        assert!(panel.close_all().is_empty());
    }

    #[test]
    fn file_name_mode_reports_through_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            lookup: LookupMode::FileName,
            ..Default::default()
        };
        let mut panel = SearchPanel::new(ImageCatalog::default(), AppPaths::new(dir.path()), &settings);
        panel.set_search_text("4321".into());
        assert_eq!(
            panel.submit(),
            vec![PanelCommand::ShowDialog("4321.png was not found.".into())]
        );
        assert!(panel.status().is_none());
    }

    #[test]
    fn externally_closed_slider_can_be_reopened() {
        let (dir, mut panel) = panel(&[]);
        write_png(&dir.path().join("slider/slider1.png"), 4, 4);
        panel.toggle_slider();
        panel.overlay_closed(OverlayRole::Slider);
        assert_eq!(panel.toggle_slider(), vec![PanelCommand::Open(OverlayRole::Slider)]);
    }
}
