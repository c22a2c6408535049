//! Per-template correlation search.
//!
//! A [`Matcher`] owns the read-only target mask statistics for one request and
//! scores each template against it independently. Every placement whose ZNCC
//! score reaches the threshold becomes a candidate [`Detection`]; overlap
//! resolution is left to [`crate::suppress`].

use crate::cancel::CancelToken;
use crate::candidate::{Detection, DetectionId};
use crate::geometry::Rect;
#[cfg(feature = "rayon")]
use crate::kernel::rayon::scan_full_par;
use crate::kernel::{Kernel, ScanParams, WindowStats};
use crate::normalize::BinaryMask;
use crate::request::validate_threshold;
use crate::template::{Template, TemplatePlan};
use crate::trace::{trace_event, trace_span};
use crate::util::{MatchFailure, SymScanError, SymScanResult};

#[cfg(not(feature = "simd"))]
use crate::kernel::scalar::ZnccScalar as Zncc;
#[cfg(feature = "simd")]
use crate::kernel::simd::ZnccSimd as Zncc;

/// Default minimum correlation for a placement to count as a match.
pub const DEFAULT_THRESHOLD: f32 = 0.8;

/// Configuration for template scoring.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Minimum ZNCC score, in `(0, 1]`.
    pub threshold: f32,
    /// Windows whose variance is at or below this value never match.
    pub min_var_i: f32,
    /// Scan rows in parallel when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_var_i: 1e-3,
            parallel: false,
        }
    }
}

/// Scores templates against one normalized target.
pub struct Matcher<'a> {
    target: &'a BinaryMask,
    stats: WindowStats,
    cfg: MatchConfig,
}

impl<'a> Matcher<'a> {
    /// Precomputes window statistics for the target mask.
    pub fn new(target: &'a BinaryMask) -> Self {
        Self {
            target,
            stats: WindowStats::from_view(target.view()),
            cfg: MatchConfig::default(),
        }
    }

    /// Replaces the scoring configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Returns every placement of `template` scoring at least the threshold,
    /// in row-major order.
    ///
    /// Fails with a `Match` error when the template is larger than the target
    /// or its mask is flat, and with `Cancelled` when `cancel` fires mid-scan.
    pub fn match_template(
        &self,
        template: &Template,
        cancel: &CancelToken,
    ) -> SymScanResult<Vec<Detection>> {
        validate_threshold(self.cfg.threshold)?;
        let image = self.target.view();
        let _span = trace_span!(
            "match_template",
            template = template.id().index(),
            width = template.width(),
            height = template.height()
        )
        .entered();

        if template.width() > image.width() || template.height() > image.height() {
            return Err(SymScanError::Match {
                template: template.id(),
                reason: MatchFailure::TemplateLargerThanTarget {
                    tpl_width: template.width(),
                    tpl_height: template.height(),
                    img_width: image.width(),
                    img_height: image.height(),
                },
            });
        }

        let plan = TemplatePlan::from_template(template)?;
        let params = ScanParams {
            min_var_i: self.cfg.min_var_i,
            min_score: self.cfg.threshold,
        };

        #[cfg(feature = "rayon")]
        let peaks = if self.cfg.parallel {
            scan_full_par::<Zncc>(image, &self.stats, &plan, params, cancel)?
        } else {
            Zncc::scan_full(image, &self.stats, &plan, params, cancel)?
        };
        #[cfg(not(feature = "rayon"))]
        let peaks = Zncc::scan_full(image, &self.stats, &plan, params, cancel)?;

        let color = template.display_color();
        let mut out = Vec::with_capacity(peaks.len());
        for (idx, peak) in peaks.into_iter().enumerate() {
            out.push(Detection {
                id: DetectionId(idx),
                template: template.id(),
                confidence: peak.score,
                bbox: Rect::from_placement(peak.x, peak.y, template.width(), template.height())?,
                color,
            });
        }

        trace_event!("template_candidates", count = out.len());
        Ok(out)
    }
}
