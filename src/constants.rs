// constants.rs - Application-wide Constants
//
// Centralized constants for paths, zoom limits, colors and window dimensions.

/// Install layout, relative to the executable's directory
pub mod layout {
    /// Directory holding every staff chart image and the image map
    pub const IMAGE_DIR: &str = "image";
    /// Image map file name inside `IMAGE_DIR`
    pub const IMAGE_MAP_FILE: &str = "image_map.json";
    /// Slider images live here, below `IMAGE_DIR`
    pub const SLIDER_DIR: &str = "slider";
    /// Slider image used until the user picks another one
    pub const DEFAULT_SLIDER_FILE: &str = "slider1.png";
    /// Extension appended by the file name lookup
    pub const FILE_NAME_EXTENSION: &str = "png";
    /// Extensions offered by the slider file picker
    pub const SLIDER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];
}

/// Zoom slider limits (percent)
pub mod zoom {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;
    pub const DEFAULT: u8 = 100;
    /// Arrow keys / dragging
    pub const SMALL_STEP: u8 = 1;
    /// Page Up / Page Down
    pub const LARGE_STEP: u8 = 10;
}

/// Overlay window behaviour
pub mod overlay {
    /// Width of the resize band along every edge, in logical pixels
    pub const RESIZE_MARGIN: f32 = 10.0;
    /// Default transparency key for staff charts (magenta)
    pub const CHROMA_KEY: [u8; 3] = [255, 0, 255];
    /// Slider images are drawn on white paper; white becomes transparent
    pub const SLIDER_KEY: [u8; 3] = [255, 255, 255];
    /// Title of the primary staff chart window
    pub const PRIMARY_TITLE: &str = "Staff Chart";
    /// Window size while the zoom is 0% and nothing is drawn
    pub const EMPTY_SIZE: f32 = 100.0;
    /// Title of the slider window
    pub const SLIDER_TITLE: &str = "Slider";
}

/// Search panel (main window) dimensions
pub mod panel {
    pub const WIDTH: f32 = 340.0;
    pub const HEIGHT: f32 = 260.0;
    pub const TITLE: &str = "Staff Chart Search";
}
