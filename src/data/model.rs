use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Peak – one row of the peak table
// ---------------------------------------------------------------------------

/// A picked peak: chemical shift (ppm) and the signal value there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub position: f64,
    pub intensity: f64,
}

impl Peak {
    pub fn new(position: f64, intensity: f64) -> Self {
        Self {
            position,
            intensity,
        }
    }

    /// Tuple-style ordering on `(position, intensity)`, total over NaN.
    pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.position
            .total_cmp(&other.position)
            .then_with(|| self.intensity.total_cmp(&other.intensity))
    }

    /// Pair identity: `0.0` equals `-0.0`, NaN equals NaN.
    pub fn same_pair(&self, other: &Self) -> bool {
        same_value(self.position, other.position) && same_value(self.intensity, other.intensity)
    }
}

/// Float equality used for peak identity.
pub fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

// ---------------------------------------------------------------------------
// SpectrumId / SpectrumMetadata
// ---------------------------------------------------------------------------

/// Opaque identifier of a spectrum, used as the persistence key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpectrumId(pub String);

impl fmt::Display for SpectrumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SpectrumId {
    fn from(s: &str) -> Self {
        SpectrumId(s.to_string())
    }
}

/// Acquisition metadata; only used to build the chemical-shift report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectrumMetadata {
    /// Observed nucleus, e.g. `13C` or `1H`.
    pub isotope_label: String,
    /// Spectrometer frequency for the observed nucleus, in MHz.
    pub frequency_mhz: Option<f64>,
    pub solvent: Option<String>,
}

// ---------------------------------------------------------------------------
// SpectrumContext – the spectrum the picker works on
// ---------------------------------------------------------------------------

/// Read-only view of a processed 1-D spectrum.
///
/// `intensities[i]` is the signal at `shift_axis[i]`. The axis is normally
/// descending (ppm is drawn left-greater-than-right) but nothing here relies
/// on it.
#[derive(Debug, Clone)]
pub struct SpectrumContext {
    pub id: SpectrumId,
    pub intensities: Vec<f64>,
    pub shift_axis: Vec<f64>,
    pub metadata: SpectrumMetadata,
}

impl SpectrumContext {
    pub fn new(
        id: SpectrumId,
        shift_axis: Vec<f64>,
        intensities: Vec<f64>,
        metadata: SpectrumMetadata,
    ) -> Self {
        Self {
            id,
            intensities,
            shift_axis,
            metadata,
        }
    }

    /// The mirrored trace, computed on demand so it never goes stale.
    pub fn inverted_intensities(&self) -> Vec<f64> {
        self.intensities.iter().map(|&y| -y).collect()
    }

    pub fn isotope_label(&self) -> &str {
        &self.metadata.isotope_label
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.shift_axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shift_axis.is_empty()
    }

    /// Index of the axis sample closest to `x`; the first one wins on ties.
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &s) in self.shift_axis.iter().enumerate() {
            let d = (s - x).abs();
            if d.is_nan() {
                continue;
            }
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(axis: Vec<f64>) -> SpectrumContext {
        let y = vec![0.0; axis.len()];
        SpectrumContext::new("s".into(), axis, y, SpectrumMetadata::default())
    }

    #[test]
    fn nearest_index_prefers_first_on_tie() {
        let c = ctx(vec![3.0, 2.0, 1.0]);
        assert_eq!(c.nearest_index(2.5), Some(0));
        assert_eq!(c.nearest_index(1.9), Some(1));
        assert_eq!(c.nearest_index(-4.0), Some(2));
    }

    #[test]
    fn nearest_index_on_empty_axis() {
        assert_eq!(ctx(Vec::new()).nearest_index(1.0), None);
    }

    #[test]
    fn inverted_trace_is_negated() {
        let c = SpectrumContext::new(
            "s".into(),
            vec![2.0, 1.0],
            vec![1.5, -0.5],
            SpectrumMetadata::default(),
        );
        assert_eq!(c.inverted_intensities(), vec![-1.5, 0.5]);
    }
}
