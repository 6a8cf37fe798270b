use std::borrow::Cow;

use crate::data::model::SpectrumContext;

// ---------------------------------------------------------------------------
// SelectionRegion – a user-drawn box on the spectrum plot
// ---------------------------------------------------------------------------

/// Rectangle drawn with the box-pick tool.
///
/// `x0` is the left (larger ppm) bound and `x1` the right one. `y0`/`y1` are
/// the vertical bounds; which of them is larger in magnitude tells which
/// polarity of the trace the box was drawn on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRegion {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl SelectionRegion {
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self { x0, x1, y0, y1 }
    }

    /// Build a region from two opposite corners in plot coordinates.
    pub fn from_corners(a: [f64; 2], b: [f64; 2]) -> Self {
        Self {
            x0: a[0].max(b[0]),
            x1: a[0].min(b[0]),
            y0: a[1].min(b[1]),
            y1: a[1].max(b[1]),
        }
    }
}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// Which copy of the trace a detection pass runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Original,
    Inverted,
}

impl Orientation {
    /// Materialise the intensity array for this orientation.
    pub fn intensities<'a>(&self, spectrum: &'a SpectrumContext) -> Cow<'a, [f64]> {
        match self {
            Orientation::Original => Cow::Borrowed(&spectrum.intensities),
            Orientation::Inverted => Cow::Owned(spectrum.inverted_intensities()),
        }
    }
}

/// Decide the trace polarity for `region` and normalise its vertical bounds.
///
/// A box whose lower bound is larger in magnitude than its upper bound was
/// drawn on the mirrored trace: the y-bounds are swapped and negated so that
/// `y0` is again the detection threshold and `y1` the filtering cap.
pub fn resolve(region: &SelectionRegion) -> (Orientation, SelectionRegion) {
    if region.y0.abs() > region.y1.abs() {
        let normalized = SelectionRegion {
            y0: -region.y1,
            y1: -region.y0,
            ..*region
        };
        (Orientation::Inverted, normalized)
    } else {
        (Orientation::Original, *region)
    }
}
