//! Staff Chart - train staff chart lookup and overlay viewer
//!
//! A search panel resolves a train number to a chart image through the
//! image map, then shows it as a borderless, draggable, zoomable window.

pub mod app;
pub mod catalog;
pub mod constants;
pub mod error;
pub mod lookup;
pub mod overlay;
pub mod panel;
pub mod paths;
pub mod render;
pub mod settings;

pub use app::StaffChartApp;
pub use catalog::ImageCatalog;
pub use panel::SearchPanel;
pub use settings::Settings;
