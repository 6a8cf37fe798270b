use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::SpectrumId;

// ---------------------------------------------------------------------------
// Persistence of picked peak positions
// ---------------------------------------------------------------------------

/// Receives incremental peak-table changes. Calls are fire-and-forget.
pub trait PeakStore {
    fn add_peaks(&mut self, spectrum_id: &SpectrumId, positions: &[f64]);
    fn remove_peaks(&mut self, spectrum_id: &SpectrumId, positions: &[f64]);
}

/// Stored positions per spectrum, kept unique and sorted descending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryPeakStore {
    spectra: BTreeMap<SpectrumId, Vec<f64>>,
}

impl MemoryPeakStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peaks(&self, spectrum_id: &SpectrumId) -> &[f64] {
        self.spectra
            .get(spectrum_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl PeakStore for MemoryPeakStore {
    fn add_peaks(&mut self, spectrum_id: &SpectrumId, positions: &[f64]) {
        if positions.is_empty() {
            return;
        }
        let stored = self.spectra.entry(spectrum_id.clone()).or_default();
        for &x in positions {
            if !stored.contains(&x) {
                stored.push(x);
            }
        }
        stored.sort_by(|a, b| b.total_cmp(a));
    }

    fn remove_peaks(&mut self, spectrum_id: &SpectrumId, positions: &[f64]) {
        if let Some(stored) = self.spectra.get_mut(spectrum_id) {
            stored.retain(|x| !positions.contains(x));
        }
    }
}

/// [`MemoryPeakStore`] mirrored to a JSON file after every change.
#[derive(Debug)]
pub struct JsonPeakStore {
    path: PathBuf,
    inner: MemoryPeakStore,
}

impl JsonPeakStore {
    /// Open the store at `path`; a missing file starts empty.
    pub fn open(path: &Path) -> Result<Self> {
        let inner = if path.exists() {
            let text = std::fs::read_to_string(path).context("reading peak store")?;
            serde_json::from_str(&text).context("parsing peak store")?
        } else {
            MemoryPeakStore::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn peaks(&self, spectrum_id: &SpectrumId) -> &[f64] {
        self.inner.peaks(spectrum_id)
    }

    fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.inner).context("serialising peak store")?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("writing {}", self.path.display()))
    }

    fn save_or_log(&self) {
        if let Err(e) = self.save() {
            log::error!("Failed to persist peaks: {e:#}");
        }
    }
}

impl PeakStore for JsonPeakStore {
    fn add_peaks(&mut self, spectrum_id: &SpectrumId, positions: &[f64]) {
        self.inner.add_peaks(spectrum_id, positions);
        self.save_or_log();
    }

    fn remove_peaks(&mut self, spectrum_id: &SpectrumId, positions: &[f64]) {
        self.inner.remove_peaks(spectrum_id, positions);
        self.save_or_log();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_tracks_adds_and_removes() {
        let id = SpectrumId::from("cholesterol-13c");
        let mut store = MemoryPeakStore::new();
        store.add_peaks(&id, &[29.8, 140.7, 29.8]);
        store.add_peaks(&id, &[71.8]);
        assert_eq!(store.peaks(&id), &[140.7, 71.8, 29.8]);

        store.remove_peaks(&id, &[71.8, 12.0]);
        assert_eq!(store.peaks(&id), &[140.7, 29.8]);
        assert!(store.peaks(&SpectrumId::from("other")).is_empty());
    }

    #[test]
    fn json_store_round_trips_through_file() {
        let path = std::env::temp_dir().join(format!(
            "nmr-peak-picker-store-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let id = SpectrumId::from("s1");

        let mut store = JsonPeakStore::open(&path).unwrap();
        store.add_peaks(&id, &[1.5, 3.25]);
        store.remove_peaks(&id, &[1.5]);

        let reopened = JsonPeakStore::open(&path).unwrap();
        assert_eq!(reopened.peaks(&id), &[3.25]);
        std::fs::remove_file(&path).unwrap();
    }
}
