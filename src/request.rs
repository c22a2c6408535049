//! Validated request types.
//!
//! Everything here is checked at construction, so the pipeline never looks
//! for missing fields at run time.

use crate::color::Color;
use crate::geometry::Rect;
use crate::search::DEFAULT_THRESHOLD;
use crate::trace::trace_warn;
use crate::util::{SymScanError, SymScanResult};

/// Checks that a match threshold lies in `(0, 1]`.
pub fn validate_threshold(threshold: f32) -> SymScanResult<f32> {
    if threshold.is_finite() && threshold > 0.0 && threshold <= 1.0 {
        Ok(threshold)
    } else {
        Err(SymScanError::validation(format!(
            "threshold must be in (0, 1], got {threshold}"
        )))
    }
}

/// Where a template's pixels come from.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateSource {
    /// Encoded image bytes.
    Image(Vec<u8>),
    /// A box cut out of the target drawing itself.
    Region(Rect),
}

/// One template as supplied by the caller: its pixel source plus optional
/// label and display color.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateDescriptor {
    source: TemplateSource,
    label: Option<String>,
    color: Option<Color>,
}

impl TemplateDescriptor {
    /// Creates a descriptor; the image payload must not be empty.
    pub fn new(image: Vec<u8>) -> SymScanResult<Self> {
        if image.is_empty() {
            return Err(SymScanError::validation("template image is empty"));
        }
        Ok(Self::with_source(TemplateSource::Image(image)))
    }

    /// Creates a descriptor that crops `region` from the target.
    ///
    /// The box must have a non-zero area. Whether it fits inside the target
    /// is checked once the target is decoded.
    pub fn from_region(region: Rect) -> SymScanResult<Self> {
        if region.area() == 0 {
            return Err(SymScanError::validation(format!(
                "template region {:?} is empty",
                <[u32; 4]>::from(region)
            )));
        }
        Ok(Self::with_source(TemplateSource::Region(region)))
    }

    fn with_source(source: TemplateSource) -> Self {
        Self {
            source,
            label: None,
            color: None,
        }
    }

    /// Sets a label; blank labels are treated as absent.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        let trimmed = label.trim();
        self.label = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the color from a hex string.
    ///
    /// Unparseable values are dropped so the template falls back to the
    /// palette; the request itself is not rejected.
    pub fn with_color_hex(mut self, hex: &str) -> Self {
        match Color::from_hex(hex) {
            Ok(color) => self.color = Some(color),
            Err(err) => {
                let reason = err.to_string();
                trace_warn!("template_color_ignored", reason = reason.as_str());
                self.color = None;
            }
        }
        self
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }
}

/// A complete detection request.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionRequest {
    target: Vec<u8>,
    templates: Vec<TemplateDescriptor>,
    threshold: f32,
}

impl DetectionRequest {
    /// Validates the request. A missing threshold uses [`DEFAULT_THRESHOLD`].
    pub fn new(
        target: Vec<u8>,
        templates: Vec<TemplateDescriptor>,
        threshold: Option<f32>,
    ) -> SymScanResult<Self> {
        if target.is_empty() {
            return Err(SymScanError::validation("target image is missing"));
        }
        if templates.is_empty() {
            return Err(SymScanError::validation("template list is empty"));
        }
        let threshold = validate_threshold(threshold.unwrap_or(DEFAULT_THRESHOLD))?;
        Ok(Self {
            target,
            templates,
            threshold,
        })
    }

    pub fn target(&self) -> &[u8] {
        &self.target
    }

    pub fn templates(&self) -> &[TemplateDescriptor] {
        &self.templates
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}
