use eframe::egui::{Color32, PointerButton, Pos2, Stroke, Ui};
use egui_plot::{Line, Plot, PlotPoints, Points, Polygon, VLine};

use crate::peaks::orientation::SelectionRegion;
use crate::state::{AppState, PickTool};

const PEAK_COLOR: Color32 = Color32::from_rgb(0x00, 0x99, 0x33);
const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(0xff, 0x00, 0x00);

// ---------------------------------------------------------------------------
// Spectrum plot (central panel)
// ---------------------------------------------------------------------------

/// Render the spectrum with picked/highlighted peaks and feed plot
/// interactions back into the pick tools.
pub fn spectrum_plot(ui: &mut Ui, state: &mut AppState) {
    let Some(picker) = &state.picker else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a spectrum to pick peaks  (File → Open…)");
        });
        return;
    };

    let spectrum = picker.spectrum();
    let navigating = state.tool == PickTool::Navigate;

    let trace: PlotPoints = spectrum
        .shift_axis
        .iter()
        .zip(&spectrum.intensities)
        .map(|(&x, &y)| [x, y])
        .collect();
    let peaks: Vec<[f64; 2]> = picker
        .table_rows()
        .iter()
        .map(|p| [p.position, p.intensity])
        .collect();
    let highlighted = picker.highlight().points();
    let region = state.pending_region;
    let clicked = state.clicked_point;

    let plot_response = Plot::new("spectrum_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("δ (ppm)")
        .y_axis_label("Intensity")
        .height((ui.available_height() - 24.0).max(100.0))
        .allow_boxed_zoom(navigating)
        .allow_drag(navigating)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(trace)
                    .name(spectrum.id.to_string())
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );

            if let Some(r) = region {
                let corners = vec![[r.x0, r.y0], [r.x1, r.y0], [r.x1, r.y1], [r.x0, r.y1]];
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(corners))
                        .stroke(Stroke::new(1.5, PEAK_COLOR))
                        .fill_color(PEAK_COLOR.gamma_multiply(0.15)),
                );
            }
            if let Some(x) = clicked {
                plot_ui.vline(VLine::new(x).color(Color32::GOLD));
            }

            plot_ui.points(Points::new(peaks).radius(4.0).color(PEAK_COLOR).name("Peaks"));
            plot_ui.points(
                Points::new(highlighted)
                    .radius(6.0)
                    .color(HIGHLIGHT_COLOR)
                    .name("Selected"),
            );

            let bounds = plot_ui.plot_bounds();
            picker
                .peaks()
                .positions_in_range(bounds.max()[0], bounds.min()[0])
                .len()
        });

    ui.label(format!("{} peaks in view", plot_response.inner));

    // ---- Pick-tool interaction ----
    let response = &plot_response.response;
    let transform = &plot_response.transform;
    let to_plot = |pos: Pos2| {
        let p = transform.value_from_position(pos);
        [p.x, p.y]
    };

    match state.tool {
        PickTool::BoxPick => {
            if response.drag_started_by(PointerButton::Primary) {
                state.drag_start = response.interact_pointer_pos().map(to_plot);
                state.pending_region = None;
            }
            if response.dragged_by(PointerButton::Primary) {
                if let (Some(start), Some(pos)) = (state.drag_start, response.interact_pointer_pos()) {
                    state.pending_region = Some(SelectionRegion::from_corners(start, to_plot(pos)));
                }
            }
            if response.drag_stopped() {
                state.drag_start = None;
            }
        }
        PickTool::PointPick => {
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    state.clicked_point = Some(to_plot(pos)[0]);
                }
            }
        }
        PickTool::Navigate => {}
    }
}
