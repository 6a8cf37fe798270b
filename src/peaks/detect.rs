use serde::{Deserialize, Serialize};

use crate::error::PickError;

/// Peak detection algorithm variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// One peak per contiguous run of samples above the threshold.
    #[default]
    Downward,
    /// Every local maximum above the threshold.
    LocalMaxima,
}

/// Black-box peak finder: returns candidate indices into `data`.
pub trait PeakDetector {
    fn detect(&self, data: &[f64], threshold: f64, mode: DetectionMode)
        -> Result<Vec<usize>, PickError>;
}

/// Threshold-based detector used by the viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdDetector;

impl PeakDetector for ThresholdDetector {
    fn detect(
        &self,
        data: &[f64],
        threshold: f64,
        mode: DetectionMode,
    ) -> Result<Vec<usize>, PickError> {
        if threshold.is_nan() {
            return Err(PickError::Detection("threshold is NaN".to_string()));
        }
        Ok(match mode {
            DetectionMode::Downward => run_maxima(data, threshold),
            DetectionMode::LocalMaxima => local_maxima(data, threshold),
        })
    }
}

fn run_maxima(data: &[f64], threshold: f64) -> Vec<usize> {
    let mut peaks = Vec::new();
    // (index, value) of the best sample in the current run
    let mut current: Option<(usize, f64)> = None;

    for (i, &y) in data.iter().enumerate() {
        if y > threshold {
            match current {
                Some((_, best)) if y <= best => {}
                _ => current = Some((i, y)),
            }
        } else if let Some((best_idx, _)) = current.take() {
            peaks.push(best_idx);
        }
    }
    if let Some((best_idx, _)) = current {
        peaks.push(best_idx);
    }
    peaks
}

fn local_maxima(data: &[f64], threshold: f64) -> Vec<usize> {
    if data.len() < 3 {
        return Vec::new();
    }
    (1..data.len() - 1)
        .filter(|&i| {
            let y = data[i];
            y > threshold && y > data[i - 1] && y >= data[i + 1]
        })
        .collect()
}
