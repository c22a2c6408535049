//! Correlation kernel implementations.
//!
//! A kernel supplies the per-placement dot product between the zero-mean
//! template and an image window. Window sums come from [`WindowStats`], so the
//! normalization and the row scan are shared by every kernel.

use crate::cancel::CancelToken;
use crate::candidate::Peak;
use crate::template::TemplatePlan;
use crate::util::{SymScanError, SymScanResult};
use crate::ImageView;

pub mod integral;
pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;

pub use integral::WindowStats;

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Windows whose variance is at or below this value are skipped.
    pub min_var_i: f32,
    /// Minimum score threshold (discard below this value).
    pub min_score: f32,
}

/// Returns the inclusive placement range `(max_x, max_y)`, or `None` when the
/// template does not fit inside the image.
pub fn placement_range(image: ImageView<'_>, plan: &TemplatePlan) -> Option<(usize, usize)> {
    let max_x = image.width().checked_sub(plan.width())?;
    let max_y = image.height().checked_sub(plan.height())?;
    Some((max_x, max_y))
}

/// Kernel trait for scoring and scan operations.
pub trait Kernel {
    /// Dot product of the zero-mean template with the window at `(x, y)`.
    ///
    /// Callers guarantee the window lies inside the image.
    fn dot_at(image: ImageView<'_>, plan: &TemplatePlan, x: usize, y: usize) -> f64;

    /// Computes the ZNCC score at a single placement (top-left coordinates).
    ///
    /// Returns `NEG_INFINITY` for flat windows or placements outside the
    /// valid range; finite scores are clamped to `[-1, 1]`.
    fn score_at(
        image: ImageView<'_>,
        stats: &WindowStats,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        min_var_i: f32,
    ) -> f32 {
        let Some((max_x, max_y)) = placement_range(image, plan) else {
            return f32::NEG_INFINITY;
        };
        if x > max_x || y > max_y {
            return f32::NEG_INFINITY;
        }

        let n = (plan.width() * plan.height()) as f64;
        let (sum_i, sum_i2) = stats.window(x, y, plan.width(), plan.height());
        let var_i = sum_i2 - (sum_i * sum_i) / n;
        if var_i <= f64::from(min_var_i) {
            return f32::NEG_INFINITY;
        }

        let dot = Self::dot_at(image, plan, x, y);
        let denom = (plan.var_t() * var_i).sqrt();
        let score = dot / denom;
        if score.is_finite() {
            score.clamp(-1.0, 1.0) as f32
        } else {
            f32::NEG_INFINITY
        }
    }

    /// Scores one placement row and appends the passing peaks.
    fn scan_row(
        image: ImageView<'_>,
        stats: &WindowStats,
        plan: &TemplatePlan,
        y: usize,
        max_x: usize,
        params: ScanParams,
        out: &mut Vec<Peak>,
    ) {
        for x in 0..=max_x {
            let score = Self::score_at(image, stats, plan, x, y, params.min_var_i);
            if score >= params.min_score {
                out.push(Peak { x, y, score });
            }
        }
    }

    /// Scans every valid placement and returns the passing peaks in
    /// row-major order.
    fn scan_full(
        image: ImageView<'_>,
        stats: &WindowStats,
        plan: &TemplatePlan,
        params: ScanParams,
        cancel: &CancelToken,
    ) -> SymScanResult<Vec<Peak>> {
        let Some((max_x, max_y)) = placement_range(image, plan) else {
            return Ok(Vec::new());
        };
        let mut peaks = Vec::new();
        for y in 0..=max_y {
            if cancel.is_cancelled() {
                return Err(SymScanError::Cancelled);
            }
            Self::scan_row(image, stats, plan, y, max_x, params, &mut peaks);
        }
        Ok(peaks)
    }
}
