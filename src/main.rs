mod app;
mod config;
mod data;
mod error;
mod peaks;
mod state;
mod store;
mod ui;

use app::PeakPickerApp;
use config::PickerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = PickerConfig::from_env();
    log::debug!("Using config {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "NMR Peak Picker",
        options,
        Box::new(|_cc| Ok(Box::new(PeakPickerApp::new(config)))),
    )
}
