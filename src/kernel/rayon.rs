//! Rayon-parallel scans (feature-gated).
//!
//! Rows of placements are distributed across the thread pool. Each row is
//! scored independently and the per-row peak lists are concatenated in row
//! order, so the output is identical to the sequential scan.

use crate::cancel::CancelToken;
use crate::candidate::Peak;
use crate::kernel::{placement_range, Kernel, ScanParams, WindowStats};
use crate::template::TemplatePlan;
use crate::util::{SymScanError, SymScanResult};
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel full scan for any kernel.
pub fn scan_full_par<K: Kernel>(
    image: ImageView<'_>,
    stats: &WindowStats,
    plan: &TemplatePlan,
    params: ScanParams,
    cancel: &CancelToken,
) -> SymScanResult<Vec<Peak>> {
    let Some((max_x, max_y)) = placement_range(image, plan) else {
        return Ok(Vec::new());
    };

    let row_results: Vec<Vec<Peak>> = (0..=max_y)
        .into_par_iter()
        .map(|y| {
            if cancel.is_cancelled() {
                return Err(SymScanError::Cancelled);
            }
            let mut row_peaks = Vec::new();
            K::scan_row(image, stats, plan, y, max_x, params, &mut row_peaks);
            Ok(row_peaks)
        })
        .collect::<SymScanResult<_>>()?;

    Ok(row_results.into_iter().flatten().collect())
}
