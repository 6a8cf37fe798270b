use crate::data::model::SpectrumContext;
use crate::error::PickError;

use super::peak_set::PeakSet;

/// Points currently emphasised on the plot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightSet {
    pub positions: Vec<f64>,
    pub intensities: Vec<f64>,
}

impl HighlightSet {
    pub fn clear(&mut self) {
        self.positions.clear();
        self.intensities.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// `[x, y]` pairs for plotting.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.positions
            .iter()
            .zip(&self.intensities)
            .map(|(&x, &y)| [x, y])
            .collect()
    }
}

/// Project table rows into a highlight set.
///
/// Every index must address an existing row.
pub fn highlight<I>(peaks: &PeakSet, indices: I) -> Result<HighlightSet, PickError>
where
    I: IntoIterator<Item = usize>,
{
    let mut out = HighlightSet::default();
    for index in indices {
        let peak = peaks.get(index).ok_or(PickError::IndexOutOfRange {
            index,
            len: peaks.len(),
        })?;
        out.positions.push(peak.position);
        out.intensities.push(peak.intensity);
    }
    Ok(out)
}

/// Project raw spectrum samples (e.g. detection candidates) into a highlight set.
pub fn highlight_from_raw_indices<I>(
    spectrum: &SpectrumContext,
    indices: I,
) -> Result<HighlightSet, PickError>
where
    I: IntoIterator<Item = usize>,
{
    let len = spectrum.len().min(spectrum.intensities.len());
    let mut out = HighlightSet::default();
    for index in indices {
        if index >= len {
            return Err(PickError::IndexOutOfRange { index, len });
        }
        out.positions.push(spectrum.shift_axis[index]);
        out.intensities.push(spectrum.intensities[index]);
    }
    Ok(out)
}
