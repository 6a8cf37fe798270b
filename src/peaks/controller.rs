use std::collections::BTreeSet;
use std::rc::Rc;

use crate::config::PickerConfig;
use crate::data::model::{Peak, SpectrumContext};
use crate::error::PickError;

use super::detect::{DetectionMode, PeakDetector};
use super::filter::filter_candidates;
use super::highlight::{highlight, highlight_from_raw_indices, HighlightSet};
use super::orientation::{self, SelectionRegion};
use super::peak_set::{diff, PeakSet};
use super::report::ReportFormatter;
use crate::store::PeakStore;

/// Handle returned by [`PeakPickingController::add_observer`].
pub type ObserverId = usize;

/// Where a pick currently is. Always `Idle` between operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickPhase {
    Idle,
    RegionSelected,
    Detecting,
    Filtered,
    PointPicked,
}

/// Result of a region pick.
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    /// Nothing was detected inside the box; the table is untouched.
    NoPeaks,
    /// Spectrum sample indices that were merged into the table.
    Merged(Vec<usize>),
}

/// Owns the peak table of one spectrum view and keeps the table, the row
/// selection and the highlighted points consistent.
pub struct PeakPickingController {
    spectrum: Rc<SpectrumContext>,
    detector: Box<dyn PeakDetector>,
    detection_mode: DetectionMode,
    store: Box<dyn PeakStore>,
    formatter: Box<dyn ReportFormatter>,

    peaks: PeakSet,
    selected_rows: BTreeSet<usize>,
    /// Peaks behind `selected_rows` while a merge re-sorts the table.
    selected_peaks: Vec<Peak>,
    highlight: HighlightSet,
    report: String,
    phase: PickPhase,

    observers: Vec<(ObserverId, Box<dyn FnMut()>)>,
    next_observer: ObserverId,
}

impl PeakPickingController {
    pub fn new(
        spectrum: Rc<SpectrumContext>,
        config: &PickerConfig,
        detector: Box<dyn PeakDetector>,
        store: Box<dyn PeakStore>,
    ) -> Self {
        let formatter = Box::new(config.report_formatter());
        let report = formatter.format(&spectrum.metadata, &[]);
        Self {
            spectrum,
            detector,
            detection_mode: config.detection_mode,
            store,
            formatter,
            peaks: PeakSet::new(),
            selected_rows: BTreeSet::new(),
            selected_peaks: Vec::new(),
            highlight: HighlightSet::default(),
            report,
            phase: PickPhase::Idle,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    // -- accessors --

    pub fn spectrum(&self) -> &SpectrumContext {
        &self.spectrum
    }

    pub fn peaks(&self) -> &PeakSet {
        &self.peaks
    }

    /// Table rows, in the order any renderer must show them.
    pub fn table_rows(&self) -> &[Peak] {
        self.peaks.rows()
    }

    pub fn selected_rows(&self) -> &BTreeSet<usize> {
        &self.selected_rows
    }

    pub fn highlight(&self) -> &HighlightSet {
        &self.highlight
    }

    pub fn report(&self) -> &str {
        &self.report
    }

    pub fn is_reportable(&self) -> bool {
        self.formatter.is_reportable(&self.spectrum.metadata)
    }

    pub fn phase(&self) -> PickPhase {
        self.phase
    }

    // -- observers --

    /// Register a callback run after every peak-table mutation.
    pub fn add_observer<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut() + 'static,
    {
        let id = self.next_observer;
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    fn notify_observers(&mut self) {
        for (_, observer) in self.observers.iter_mut() {
            observer();
        }
    }

    // -- picking --

    /// Detect peaks inside `region` and merge them into the table.
    ///
    /// Stored positions are the axis samples of the detected indices.
    /// Detection errors propagate and leave the table untouched.
    pub fn pick_region(&mut self, region: SelectionRegion) -> Result<PickOutcome, PickError> {
        self.phase = PickPhase::RegionSelected;
        let spectrum = Rc::clone(&self.spectrum);
        let (orientation, region) = orientation::resolve(&region);
        log::debug!("Region pick {region:?} on {orientation:?} trace");

        self.phase = PickPhase::Detecting;
        let data = orientation.intensities(&spectrum);
        let candidates = match self.detector.detect(&data, region.y0, self.detection_mode) {
            Ok(candidates) => candidates,
            Err(e) => {
                self.phase = PickPhase::Idle;
                return Err(e);
            }
        };

        self.phase = PickPhase::Filtered;
        let kept = filter_candidates(
            &candidates,
            &region,
            &spectrum.intensities,
            &spectrum.shift_axis,
        );
        log::debug!("{} candidates, {} inside region", candidates.len(), kept.len());

        if kept.is_empty() {
            self.phase = PickPhase::Idle;
            return Ok(PickOutcome::NoPeaks);
        }

        let positions: Vec<f64> = kept.iter().map(|&i| spectrum.shift_axis[i]).collect();
        let intensities: Vec<f64> = kept.iter().map(|&i| spectrum.intensities[i]).collect();

        let old = self.peaks.positions();
        self.remember_selection();
        self.peaks.merge(&positions, &intensities);
        self.commit(&old);
        Ok(PickOutcome::Merged(kept))
    }

    /// Record a peak at the clicked shift `x`.
    ///
    /// The intensity is read at the nearest axis sample but the stored
    /// position is `x` itself, unlike [`Self::pick_region`].
    pub fn pick_point(&mut self, x: f64) -> Result<(), PickError> {
        self.phase = PickPhase::PointPicked;
        let intensity = match self.spectrum.nearest_index(x) {
            None => Err(PickError::EmptyAxis),
            Some(index) => self.spectrum.intensities.get(index).copied().ok_or(
                PickError::IndexOutOfRange {
                    index,
                    len: self.spectrum.intensities.len(),
                },
            ),
        };
        let intensity = match intensity {
            Ok(y) => y,
            Err(e) => {
                self.phase = PickPhase::Idle;
                return Err(e);
            }
        };
        log::debug!("Point pick at {x:.4} ppm (y = {intensity:.4})");

        let old = self.peaks.positions();
        self.remember_selection();
        self.peaks.merge(&[x], &[intensity]);
        self.commit(&old);
        Ok(())
    }

    // -- table maintenance --

    /// Delete the given table rows. Rows past the end of the table are skipped.
    pub fn delete_selected(&mut self, rows: &BTreeSet<usize>) {
        self.highlight.clear();
        let old = self.peaks.positions();
        let removed = self.peaks.remove_by_indices(rows);
        log::info!("Deleted {removed} of {} selected peaks", rows.len());
        self.selected_rows.clear();
        self.commit(&old);
    }

    /// Drop the row selection and highlighted points. The table is untouched.
    pub fn deselect_all(&mut self) {
        self.highlight.clear();
        self.selected_rows.clear();
    }

    /// Replace the row selection and highlight the selected rows.
    ///
    /// On a stale row the previous selection is kept.
    pub fn on_row_selection_changed(&mut self, rows: BTreeSet<usize>) -> Result<(), PickError> {
        self.highlight = highlight(&self.peaks, rows.iter().copied())?;
        self.selected_rows = rows;
        Ok(())
    }

    /// Highlight raw spectrum samples, e.g. the candidates of the last pick.
    pub fn highlight_candidates(&mut self, indices: &[usize]) -> Result<(), PickError> {
        self.highlight = highlight_from_raw_indices(&self.spectrum, indices.iter().copied())?;
        Ok(())
    }

    /// Push a table change to the store and rebuild the report.
    pub fn on_peak_table_data_changed(&mut self, old: &[f64], new: &[f64]) {
        let changes = diff(old, new);
        if !changes.is_empty() {
            log::info!(
                "Peak table of {}: +{} / -{}",
                self.spectrum.id,
                changes.added.len(),
                changes.removed.len()
            );
        }
        self.store.add_peaks(&self.spectrum.id, &changes.added);
        self.store.remove_peaks(&self.spectrum.id, &changes.removed);

        self.report = self
            .formatter
            .format(&self.spectrum.metadata, &self.peaks.positions());
    }

    fn remember_selection(&mut self) {
        self.selected_peaks = self
            .selected_rows
            .iter()
            .filter_map(|&i| self.peaks.get(i).copied())
            .collect();
    }

    /// Point the row selection back at the same peaks after a re-sort.
    fn reselect_after_sort(&mut self) {
        let peaks = std::mem::take(&mut self.selected_peaks);
        if self.selected_rows.is_empty() {
            return;
        }
        let rows: BTreeSet<usize> = peaks
            .iter()
            .filter_map(|sel| self.peaks.rows().iter().position(|p| p.same_pair(sel)))
            .collect();
        // rows come straight from the current table
        self.highlight = highlight(&self.peaks, rows.iter().copied()).unwrap_or_default();
        self.selected_rows = rows;
    }

    fn commit(&mut self, old: &[f64]) {
        self.reselect_after_sort();
        let new = self.peaks.positions();
        self.on_peak_table_data_changed(old, &new);
        self.phase = PickPhase::Idle;
        self.notify_observers();
    }
}
