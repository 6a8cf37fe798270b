use super::orientation::SelectionRegion;

// ---------------------------------------------------------------------------
// Candidate filter: keep detections that fall inside the drawn box
// ---------------------------------------------------------------------------

/// Return the candidates that lie inside `region`, in input order.
///
/// A candidate `i` passes when:
/// * `intensities[i] <= region.y1` → below the cap (the `y0` threshold was
///   already applied by detection)
/// * `shift_axis[i] <= region.x0` → not left of the box
/// * `shift_axis[i] >= region.x1` → not right of the box
///
/// Bounds are hard cutoffs. Indices outside either array are dropped. An
/// empty result means "no peak in the box", not a failure.
pub fn filter_candidates(
    candidates: &[usize],
    region: &SelectionRegion,
    intensities: &[f64],
    shift_axis: &[f64],
) -> Vec<usize> {
    candidates
        .iter()
        .copied()
        .filter(|&i| {
            let (Some(&y), Some(&x)) = (intensities.get(i), shift_axis.get(i)) else {
                return false;
            };
            // Filter top
            if y > region.y1 || y.is_nan() {
                return false;
            }
            // Filter left / right
            x <= region.x0 && x >= region.x1
        })
        .collect()
}
