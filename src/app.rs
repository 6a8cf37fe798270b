use eframe::egui;

use crate::config::PickerConfig;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PeakPickerApp {
    pub state: AppState,
}

impl PeakPickerApp {
    pub fn new(config: PickerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for PeakPickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: tools, peak table, report ----
        egui::SidePanel::left("peak_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: spectrum plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::spectrum_plot(ui, &mut self.state);
        });
    }
}
