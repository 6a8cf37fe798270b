use std::collections::BTreeSet;

use crate::data::model::{same_value, Peak};

// ---------------------------------------------------------------------------
// PeakSet – the authoritative peak table
// ---------------------------------------------------------------------------

/// Ordered, de-duplicated list of picked peaks.
///
/// After every mutation the rows are sorted descending by position (then by
/// intensity) and no `(position, intensity)` pair appears twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakSet {
    peaks: Vec<Peak>,
}

impl PeakSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Peak> {
        self.peaks.get(index)
    }

    /// Rows in table order.
    pub fn rows(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn positions(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.position).collect()
    }

    pub fn intensities(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.intensity).collect()
    }

    /// Union the current rows with the new `(position, intensity)` pairs.
    ///
    /// Duplicates are dropped keeping the first occurrence, then the whole
    /// table is re-sorted. Surplus entries of the longer input are ignored.
    pub fn merge(&mut self, positions: &[f64], intensities: &[f64]) {
        let incoming = positions
            .iter()
            .zip(intensities)
            .map(|(&x, &y)| Peak::new(x, y));

        let mut merged: Vec<Peak> = Vec::with_capacity(self.peaks.len() + positions.len());
        for peak in self.peaks.iter().copied().chain(incoming) {
            if !merged.iter().any(|p| p.same_pair(&peak)) {
                merged.push(peak);
            }
        }

        merged.sort_by(|a, b| b.total_cmp(a));
        self.peaks = merged;
    }

    /// Remove the rows at `indices`, highest first.
    ///
    /// Indices past the end of the table are skipped. Returns how many rows
    /// were actually removed.
    pub fn remove_by_indices(&mut self, indices: &BTreeSet<usize>) -> usize {
        let mut removed = 0;
        for &i in indices.iter().rev() {
            if i < self.peaks.len() {
                self.peaks.remove(i);
                removed += 1;
            } else {
                log::warn!(
                    "Ignoring stale peak row {i} (table has {} rows)",
                    self.peaks.len()
                );
            }
        }
        removed
    }

    /// Positions with `stop <= position <= start`, in table order.
    pub fn positions_in_range(&self, start: f64, stop: f64) -> Vec<f64> {
        self.in_range(start, stop).map(|p| p.position).collect()
    }

    /// Intensities of the peaks with `stop <= position <= start`.
    pub fn intensities_in_range(&self, start: f64, stop: f64) -> Vec<f64> {
        self.in_range(start, stop).map(|p| p.intensity).collect()
    }

    fn in_range(&self, start: f64, stop: f64) -> impl Iterator<Item = &Peak> {
        self.peaks
            .iter()
            .filter(move |p| p.position <= start && p.position >= stop)
    }
}

// ---------------------------------------------------------------------------
// Diff between two table snapshots
// ---------------------------------------------------------------------------

/// Positions that appeared in / disappeared from the table.
///
/// Both lists are unique and sorted descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakDiff {
    pub added: Vec<f64>,
    pub removed: Vec<f64>,
}

impl PeakDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Set difference of two position snapshots in both directions.
pub fn diff(old: &[f64], new: &[f64]) -> PeakDiff {
    PeakDiff {
        added: difference(new, old),
        removed: difference(old, new),
    }
}

fn difference(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::new();
    for &x in a {
        if !b.iter().any(|&y| same_value(x, y)) && !out.iter().any(|&y| same_value(x, y)) {
            out.push(x);
        }
    }
    out.sort_by(|x, y| y.total_cmp(x));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_sorted_descending(set: &PeakSet) -> bool {
        set.rows()
            .windows(2)
            .all(|w| w[0].total_cmp(&w[1]) == std::cmp::Ordering::Greater)
    }

    fn three_rows() -> PeakSet {
        let mut set = PeakSet::new();
        set.merge(&[1.0, 3.0, 2.0], &[10.0, 30.0, 20.0]);
        set
    }

    #[test]
    fn merge_sorts_descending() {
        let set = three_rows();
        assert_eq!(set.positions(), vec![3.0, 2.0, 1.0]);
        assert_eq!(set.intensities(), vec![30.0, 20.0, 10.0]);
    }

    #[test]
    fn repeated_merges_keep_order_and_uniqueness() {
        let mut set = PeakSet::new();
        let batches: [(&[f64], &[f64]); 4] = [
            (&[5.0, 1.0], &[0.5, 0.1]),
            (&[3.0, 5.0], &[0.3, 0.5]),
            (&[7.5, -1.0, 3.0], &[0.7, -0.1, 0.3]),
            (&[], &[]),
        ];
        for (x, y) in batches {
            set.merge(x, y);
            assert!(is_sorted_descending(&set));
        }
        assert_eq!(set.positions(), vec![7.5, 5.0, 3.0, 1.0, -1.0]);
    }

    #[test]
    fn merging_same_pair_twice_is_idempotent() {
        let mut set = PeakSet::new();
        set.merge(&[4.2], &[1.0]);
        let snapshot = set.clone();
        set.merge(&[4.2], &[1.0]);
        assert_eq!(set, snapshot);
    }

    #[test]
    fn same_position_with_other_intensity_is_a_new_pair() {
        let mut set = PeakSet::new();
        set.merge(&[4.2, 4.2], &[1.0, 2.0]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.intensities(), vec![2.0, 1.0]);
    }

    #[test]
    fn out_of_range_removal_is_ignored() {
        let mut set = three_rows();
        let before = set.clone();
        assert_eq!(set.remove_by_indices(&BTreeSet::from([5])), 0);
        assert_eq!(set, before);
    }

    #[test]
    fn removal_runs_from_highest_index() {
        let mut set = three_rows();
        assert_eq!(set.remove_by_indices(&BTreeSet::from([2, 0])), 2);
        assert_eq!(set.positions(), vec![2.0]);
    }

    #[test]
    fn removal_mixes_valid_and_stale_indices() {
        let mut set = three_rows();
        assert_eq!(set.remove_by_indices(&BTreeSet::from([1, 9])), 1);
        assert_eq!(set.positions(), vec![3.0, 1.0]);
    }

    #[test]
    fn diff_reports_both_directions() {
        let d = diff(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]);
        assert_eq!(d.added, vec![4.0]);
        assert_eq!(d.removed, vec![1.0]);
        assert!(!d.is_empty());
    }

    #[test]
    fn diff_of_equal_snapshots_is_empty() {
        assert!(diff(&[2.0, 1.0], &[1.0, 2.0]).is_empty());
    }

    #[test]
    fn diff_collapses_duplicate_positions() {
        let d = diff(&[], &[4.2, 4.2, 1.0]);
        assert_eq!(d.added, vec![4.2, 1.0]);
    }

    #[test]
    fn signed_zero_is_one_position() {
        let mut set = PeakSet::new();
        set.merge(&[0.0], &[1.0]);
        set.merge(&[-0.0], &[1.0]);
        assert_eq!(set.len(), 1);

        let d = diff(&[], &[0.0, -0.0]);
        assert_eq!(d.added.len(), 1);
        assert!(diff(&[0.0], &[-0.0]).is_empty());
    }

    #[test]
    fn nan_pairs_deduplicate() {
        let mut set = PeakSet::new();
        set.merge(&[f64::NAN, 2.0], &[1.0, 1.0]);
        set.merge(&[f64::NAN], &[1.0]);
        assert_eq!(set.len(), 2);
        assert!(diff(&[f64::NAN], &[f64::NAN]).is_empty());
    }

    #[test]
    fn range_queries_use_left_greater_than_right_bounds() {
        let set = three_rows();
        assert_eq!(set.positions_in_range(3.0, 2.0), vec![3.0, 2.0]);
        assert_eq!(set.intensities_in_range(2.5, 0.0), vec![20.0, 10.0]);
        assert!(set.positions_in_range(0.0, 2.5).is_empty());
    }
}
