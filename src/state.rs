use std::collections::BTreeSet;
use std::rc::Rc;

use crate::config::PickerConfig;
use crate::data::model::SpectrumContext;
use crate::error::PickError;
use crate::peaks::controller::{PeakPickingController, PickOutcome};
use crate::peaks::detect::ThresholdDetector;
use crate::peaks::orientation::SelectionRegion;
use crate::store::{JsonPeakStore, MemoryPeakStore, PeakStore};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// What a primary drag / click on the plot does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTool {
    Navigate,
    BoxPick,
    PointPick,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: PickerConfig,

    /// Peak picker for the loaded spectrum (None until user loads a file).
    pub picker: Option<PeakPickingController>,

    pub tool: PickTool,

    /// Corner where the current box drag started.
    pub drag_start: Option<[f64; 2]>,

    /// Box drawn with the box-pick tool, waiting for "Pick peaks in area".
    pub pending_region: Option<SelectionRegion>,

    /// Shift clicked with the point-pick tool.
    pub clicked_point: Option<f64>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PickerConfig::default())
    }
}

impl AppState {
    pub fn new(config: PickerConfig) -> Self {
        Self {
            config,
            picker: None,
            tool: PickTool::Navigate,
            drag_start: None,
            pending_region: None,
            clicked_point: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded spectrum and start an empty peak table.
    pub fn set_spectrum(&mut self, spectrum: SpectrumContext) {
        let picker = PeakPickingController::new(
            Rc::new(spectrum),
            &self.config,
            Box::new(ThresholdDetector),
            self.open_store(),
        );

        self.picker = Some(picker);
        self.drag_start = None;
        self.pending_region = None;
        self.clicked_point = None;
        self.status_message = None;
    }

    fn open_store(&self) -> Box<dyn PeakStore> {
        let Some(path) = &self.config.store_path else {
            return Box::new(MemoryPeakStore::new());
        };
        match JsonPeakStore::open(path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::error!("Falling back to in-memory peak store: {e:#}");
                Box::new(MemoryPeakStore::new())
            }
        }
    }

    fn show_error(&mut self, e: PickError) {
        log::warn!("{e}");
        self.status_message = Some(e.to_string());
    }

    /// Run detection inside the pending box and highlight what was found.
    pub fn pick_in_region(&mut self) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        // The drawn box is consumed by the pick.
        let Some(region) = self.pending_region.take() else {
            self.show_error(PickError::NoRegionSelected);
            return;
        };

        let result = picker
            .pick_region(region)
            .and_then(|outcome| match outcome {
                PickOutcome::Merged(indices) => {
                    picker.highlight_candidates(&indices)?;
                    Ok(Some(indices.len()))
                }
                PickOutcome::NoPeaks => Ok(None),
            });

        match result {
            Ok(Some(n)) => self.status_message = Some(format!("Picked {n} peaks")),
            Ok(None) => self.status_message = Some("No peaks found in the selected area.".into()),
            Err(e) => self.show_error(e),
        }
    }

    /// Add the clicked shift as a peak.
    pub fn add_clicked_peak(&mut self) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let Some(x) = self.clicked_point else {
            self.show_error(PickError::NoPointSelected);
            return;
        };
        match picker.pick_point(x) {
            Ok(()) => self.status_message = None,
            Err(e) => self.show_error(e),
        }
    }

    pub fn clear_region(&mut self) {
        self.drag_start = None;
        self.pending_region = None;
    }

    pub fn deselect_all(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.deselect_all();
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            let rows = picker.selected_rows().clone();
            picker.delete_selected(&rows);
        }
    }

    /// Ctrl/shift-click toggles `row`; a plain click selects only `row`, or
    /// clears the selection when `row` was the only selected one.
    pub fn toggle_row(&mut self, row: usize, additive: bool) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let current = picker.selected_rows();
        let rows = if additive {
            let mut rows = current.clone();
            if !rows.remove(&row) {
                rows.insert(row);
            }
            rows
        } else if current.len() == 1 && current.contains(&row) {
            BTreeSet::new()
        } else {
            BTreeSet::from([row])
        };
        if let Err(e) = picker.on_row_selection_changed(rows) {
            self.show_error(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::data::model::SpectrumMetadata;

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.set_spectrum(SpectrumContext::new(
            "s".into(),
            vec![5.0, 4.0, 3.0, 2.0, 1.0],
            vec![0.0, 3.0, 0.0, 5.0, 0.0],
            SpectrumMetadata::default(),
        ));
        state
    }

    /// Counts peak-table notifications from the loaded picker.
    fn table_changes(state: &mut AppState) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        if let Some(picker) = state.picker.as_mut() {
            picker.add_observer(move || counter.set(counter.get() + 1));
        }
        count
    }

    fn selected(state: &AppState) -> BTreeSet<usize> {
        state.picker.as_ref().unwrap().selected_rows().clone()
    }

    fn with_two_peaks() -> AppState {
        let mut state = loaded_state();
        state.clicked_point = Some(4.1);
        state.add_clicked_peak();
        state.clicked_point = Some(1.9);
        state.add_clicked_peak();
        state
    }

    #[test]
    fn picking_without_region_reports_error() {
        let mut state = loaded_state();
        let changes = table_changes(&mut state);
        state.pick_in_region();
        assert_eq!(
            state.status_message.as_deref(),
            Some("Please select area using the peak picking tool.")
        );
        assert_eq!(changes.get(), 0);
    }

    #[test]
    fn region_pick_consumes_box_and_highlights_candidates() {
        let mut state = loaded_state();
        let changes = table_changes(&mut state);
        state.pending_region = Some(SelectionRegion::new(5.0, 1.0, 1.0, 10.0));
        state.pick_in_region();

        let picker = state.picker.as_ref().unwrap();
        assert_eq!(picker.peaks().positions(), vec![4.0, 2.0]);
        assert_eq!(picker.highlight().positions, vec![4.0, 2.0]);
        assert!(state.pending_region.is_none());
        assert_eq!(changes.get(), 1);
    }

    #[test]
    fn empty_region_pick_sets_status_only() {
        let mut state = loaded_state();
        let changes = table_changes(&mut state);
        state.pending_region = Some(SelectionRegion::new(5.0, 1.0, 6.0, 10.0));
        state.pick_in_region();
        assert!(state.picker.as_ref().unwrap().peaks().is_empty());
        assert_eq!(changes.get(), 0);
        assert!(state.status_message.is_some());
    }

    #[test]
    fn toggling_rows_updates_selection() {
        let mut state = with_two_peaks();
        let changes = table_changes(&mut state);

        state.toggle_row(0, false);
        state.toggle_row(1, true);
        assert_eq!(selected(&state), BTreeSet::from([0, 1]));

        state.toggle_row(1, true);
        assert_eq!(selected(&state), BTreeSet::from([0]));

        state.delete_selected();
        let picker = state.picker.as_ref().unwrap();
        assert_eq!(picker.peaks().positions(), vec![1.9]);
        assert_eq!(changes.get(), 1);
    }

    #[test]
    fn plain_click_inside_multi_selection_keeps_only_that_row() {
        let mut state = with_two_peaks();
        state.toggle_row(0, true);
        state.toggle_row(1, true);

        state.toggle_row(1, false);
        assert_eq!(selected(&state), BTreeSet::from([1]));
        assert_eq!(
            state.picker.as_ref().unwrap().highlight().positions,
            vec![1.9]
        );

        state.toggle_row(1, false);
        assert!(selected(&state).is_empty());
    }

    #[test]
    fn point_pick_requires_click() {
        let mut state = loaded_state();
        state.add_clicked_peak();
        assert!(state.status_message.is_some());
        assert!(state.picker.as_ref().unwrap().peaks().is_empty());
    }
}
