//! End-to-end detection pipeline.
//!
//! One call to [`Pipeline::run`] handles one request and shares nothing with
//! other calls: decode and normalize the target and every template, score each
//! template independently into a shared pool, suppress overlaps across the
//! whole pool, then render the accepted boxes on the original target.

use image::DynamicImage;

use crate::annotate::{AnnotateConfig, Annotator};
use crate::cancel::CancelToken;
use crate::candidate::nms::suppress;
use crate::candidate::{Detection, DetectionId, DetectionPool};
use crate::geometry::Rect;
use crate::image::io::decode_image;
use crate::normalize::{NormalizeConfig, Normalizer};
use crate::request::{DetectionRequest, TemplateSource};
use crate::search::{MatchConfig, Matcher};
use crate::template::{Template, TemplateId};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{ImageId, MatchFailure, SymScanError, SymScanResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Where detection colors come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorSource {
    /// Use the template's explicit color, falling back to the palette.
    #[default]
    TemplateColor,
    /// Always use the palette, ignoring explicit colors.
    Palette,
}

/// Configuration for every pipeline stage.
///
/// `matching.threshold` is overridden by the request threshold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineConfig {
    pub normalize: NormalizeConfig,
    pub matching: MatchConfig,
    pub annotate: AnnotateConfig,
    pub color_source: ColorSource,
}

/// A template whose contribution was dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedTemplate {
    pub template: TemplateId,
    pub label: Option<String>,
    pub reason: MatchFailure,
}

/// Result of one request.
#[derive(Clone, Debug)]
pub struct DetectionReport {
    /// Annotated target, PNG encoded.
    pub annotated_png: Vec<u8>,
    /// Accepted detections in acceptance order, ids `0..n`.
    pub detections: Vec<Detection>,
    /// Templates that could not be matched.
    pub skipped: Vec<SkippedTemplate>,
}

impl DetectionReport {
    pub fn symbol_count(&self) -> usize {
        self.detections.len()
    }
}

/// Stateless detection pipeline.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    cfg: PipelineConfig,
    normalizer: Normalizer,
    annotator: Annotator,
}

impl Pipeline {
    /// Validates the configuration.
    pub fn new(cfg: PipelineConfig) -> SymScanResult<Self> {
        let normalizer = Normalizer::new(cfg.normalize.clone())?;
        let annotator = Annotator::new(cfg.annotate.clone())?;
        Ok(Self {
            cfg,
            normalizer,
            annotator,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Runs one request.
    ///
    /// Decode failures and cancellation fail the whole request. Templates
    /// that cannot be matched are skipped and listed in the report.
    pub fn run(
        &self,
        request: &DetectionRequest,
        cancel: &CancelToken,
    ) -> SymScanResult<DetectionReport> {
        let _span = trace_span!("detect", templates = request.templates().len()).entered();

        let target = decode_image(request.target(), ImageId::Target).inspect_err(log_failure)?;
        let target_mask = self
            .normalizer
            .normalize_image(&target)
            .inspect_err(log_failure)?;
        trace_event!(
            "target_normalized",
            width = target_mask.width(),
            height = target_mask.height()
        );

        let templates = self
            .load_templates(request, &target)
            .inspect_err(log_failure)?;
        if cancel.is_cancelled() {
            return Err(SymScanError::Cancelled);
        }

        let matcher = Matcher::new(&target_mask).with_config(MatchConfig {
            threshold: request.threshold(),
            ..self.cfg.matching.clone()
        });
        let (pool, skipped) = self.match_all(&matcher, &templates, cancel)?;
        trace_event!("candidate_pool", count = pool.len());

        let mut detections = suppress(pool.into_vec());
        for (idx, det) in detections.iter_mut().enumerate() {
            det.id = DetectionId(idx);
        }
        trace_event!("accepted", count = detections.len(), skipped = skipped.len());

        if cancel.is_cancelled() {
            return Err(SymScanError::Cancelled);
        }
        let annotated_png = self
            .annotator
            .annotate(&target, &detections)
            .inspect_err(log_failure)?;

        Ok(DetectionReport {
            annotated_png,
            detections,
            skipped,
        })
    }

    fn load_templates(
        &self,
        request: &DetectionRequest,
        target: &DynamicImage,
    ) -> SymScanResult<Vec<Template>> {
        let mut templates = Vec::with_capacity(request.templates().len());
        for (idx, desc) in request.templates().iter().enumerate() {
            let id = TemplateId(idx);
            let pixels = match desc.source() {
                TemplateSource::Image(bytes) => decode_image(bytes, ImageId::Template(id))?,
                TemplateSource::Region(region) => crop_region(target, *region, id)?,
            };
            let mask = self.normalizer.normalize_image(&pixels)?;
            let mut template = Template::new(id, mask);
            if let Some(label) = desc.label() {
                template = template.with_label(label);
            }
            if let (ColorSource::TemplateColor, Some(color)) = (self.cfg.color_source, desc.color())
            {
                template = template.with_color(color);
            }
            templates.push(template);
        }
        Ok(templates)
    }

    fn match_all(
        &self,
        matcher: &Matcher<'_>,
        templates: &[Template],
        cancel: &CancelToken,
    ) -> SymScanResult<(DetectionPool, Vec<SkippedTemplate>)> {
        #[cfg(feature = "rayon")]
        let results: Vec<_> = if self.cfg.matching.parallel {
            templates
                .par_iter()
                .map(|tpl| matcher.match_template(tpl, cancel))
                .collect()
        } else {
            templates
                .iter()
                .map(|tpl| matcher.match_template(tpl, cancel))
                .collect()
        };
        #[cfg(not(feature = "rayon"))]
        let results: Vec<_> = templates
            .iter()
            .map(|tpl| matcher.match_template(tpl, cancel))
            .collect();

        let mut pool = DetectionPool::new();
        let mut skipped = Vec::new();
        for (tpl, result) in templates.iter().zip(results) {
            match result {
                Ok(detections) => pool.extend(detections),
                Err(SymScanError::Match { template, reason }) => {
                    let message = reason.to_string();
                    trace_warn!(
                        "template_skipped",
                        template = template.index(),
                        reason = message.as_str()
                    );
                    skipped.push(SkippedTemplate {
                        template,
                        label: tpl.label().map(str::to_owned),
                        reason,
                    });
                }
                Err(err) => {
                    log_failure(&err);
                    return Err(err);
                }
            }
        }
        Ok((pool, skipped))
    }
}

/// Cuts a template out of the target; the box must lie inside the image.
fn crop_region(target: &DynamicImage, region: Rect, id: TemplateId) -> SymScanResult<DynamicImage> {
    let (right, bottom) = region.bottom_right();
    if right > target.width() || bottom > target.height() {
        return Err(SymScanError::validation(format!(
            "{id} region {:?} lies outside the {}x{} target",
            <[u32; 4]>::from(region),
            target.width(),
            target.height()
        )));
    }
    trace_event!("template_cropped", template = id.index());
    Ok(target.crop_imm(region.x(), region.y(), region.width(), region.height()))
}

fn log_failure(err: &SymScanError) {
    let message = err.to_string();
    trace_warn!(
        "detection_failed",
        kind = err.kind(),
        message = message.as_str()
    );
}
