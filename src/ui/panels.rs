use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::{AppState, PickTool};

// ---------------------------------------------------------------------------
// Left side panel – pick tools, peak table, report
// ---------------------------------------------------------------------------

/// Render the left peak-picking panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Peak Picking");
    ui.separator();

    if state.picker.is_none() {
        ui.label("No spectrum loaded.");
        return;
    }

    // ---- Tool selector ----
    ui.strong("Tool");
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tool, PickTool::Navigate, "Navigate");
        ui.selectable_value(&mut state.tool, PickTool::BoxPick, "Box pick");
        ui.selectable_value(&mut state.tool, PickTool::PointPick, "Point pick");
    });
    ui.separator();

    // ---- Actions ----
    let pick_button = egui::Button::new(RichText::new("Manual Peaks").color(Color32::WHITE))
        .fill(Color32::from_rgb(0x00, 0x99, 0x33));
    if ui.add(pick_button).clicked() {
        state.pick_in_region();
    }

    let point_label = match state.clicked_point {
        Some(x) => format!("Peak By Peak ({x:.2} ppm)"),
        None => "Peak By Peak".to_string(),
    };
    if ui.button(point_label).clicked() {
        state.add_clicked_peak();
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Clear Selected Area").clicked() {
            state.clear_region();
        }
        if ui.button("Deselect all peaks").clicked() {
            state.deselect_all();
        }
    });

    let delete_button = egui::Button::new(RichText::new("Delete selected peaks").color(Color32::WHITE))
        .fill(Color32::from_rgb(0xc9, 0x30, 0x2c));
    if ui.add(delete_button).clicked() {
        state.delete_selected();
    }
    ui.separator();

    peak_table(ui, state);
    ui.separator();

    chemical_shift_report(ui, state);
}

/// Peak table; click selects a row, Ctrl/Shift-click toggles it.
fn peak_table(ui: &mut Ui, state: &mut AppState) {
    let Some(picker) = &state.picker else {
        return;
    };
    // Copy out so the state can be mutated after the table is drawn.
    let rows = picker.table_rows().to_vec();
    let selected = picker.selected_rows().clone();
    let additive = ui.input(|i| i.modifiers.command || i.modifiers.shift);
    let mut clicked_row = None;

    ui.strong(format!("Peaks ({})", rows.len()));
    TableBuilder::new(ui)
        .striped(true)
        .sense(egui::Sense::click())
        .max_scroll_height(320.0)
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("ppm");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("y");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let i = row.index();
                row.set_selected(selected.contains(&i));
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.2}", rows[i].position));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.2}", rows[i].intensity));
                });
                if row.response().clicked() {
                    clicked_row = Some(i);
                }
            });
        });

    if let Some(i) = clicked_row {
        state.toggle_row(i, additive);
    }
}

fn chemical_shift_report(ui: &mut Ui, state: &AppState) {
    let Some(picker) = &state.picker else {
        return;
    };
    if !picker.is_reportable() {
        return;
    }
    ui.strong("Chemical Shift Report");
    ui.label(picker.report());
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(picker) = &state.picker {
            let spectrum = picker.spectrum();
            ui.label(format!(
                "{} ({}), {} points, {} peaks",
                spectrum.id,
                spectrum.isotope_label(),
                spectrum.len(),
                picker.peaks().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open spectrum")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(spectrum) => {
                log::info!(
                    "Loaded spectrum {} ({}) with {} points",
                    spectrum.id,
                    spectrum.isotope_label(),
                    spectrum.len()
                );
                state.set_spectrum(spectrum);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
