// main.rs - Staff Chart Entry Point
//
// Loads settings and the image map, then hands the search panel to the
// iced daemon. Overlay windows come and go; the process ends with the panel.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use iced::{daemon, Color};
use log::{info, warn};

use staffchart::lookup::LookupMode;
use staffchart::panel::Status;
use staffchart::{ImageCatalog, SearchPanel, Settings, StaffChartApp};

fn main() -> iced::Result {
    // Initialize logger with renderer noise filtered out
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .filter_module("wgpu_core", log::LevelFilter::Error)
        .filter_module("naga", log::LevelFilter::Error)
        .filter_module("cosmic_text", log::LevelFilter::Error)
        .init();
    info!("Staff Chart starting...");

    let settings = Settings::load();
    let paths = settings.paths();
    info!("Image root: {:?}", paths.image_root());

    let (catalog, load_error) = match settings.lookup {
        LookupMode::Catalog => ImageCatalog::load_or_empty(&paths.image_map()),
        LookupMode::FileName => (ImageCatalog::default(), None),
    };

    let mut panel = SearchPanel::new(catalog, paths, &settings);

    if let Some(err) = load_error {
        warn!("{}", err);
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Staff Chart")
            .set_description(err.to_string())
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
        panel.set_status(Status::Error(err.to_string()));
    }

    daemon(StaffChartApp::title, StaffChartApp::update, StaffChartApp::view)
        .subscription(StaffChartApp::subscription)
        .theme(StaffChartApp::theme)
        // Overlays rely on a see-through surface; the panel paints its own background
        .style(|_state, theme| daemon::Appearance {
            background_color: Color::TRANSPARENT,
            text_color: theme.palette().text,
        })
        .run_with(move || StaffChartApp::new(panel))
}
