use thiserror::Error;

/// Failures surfaced by peak-picking operations.
///
/// Empty picks and stale delete indices are not represented here: both are
/// ordinary outcomes that leave the peak table untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PickError {
    #[error("row {index} is out of range for a table of {len} peaks")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Please select area using the peak picking tool.")]
    NoRegionSelected,

    #[error("Please select a point using the peak by peak tool.")]
    NoPointSelected,

    #[error("spectrum has an empty chemical-shift axis")]
    EmptyAxis,

    #[error("peak detection failed: {0}")]
    Detection(String),
}
