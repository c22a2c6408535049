//! Template identity, masks and correlation plans.

use std::fmt;

use crate::color::Color;
use crate::normalize::BinaryMask;

mod plan;

pub use plan::TemplatePlan;

/// Position of a template within its request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(pub usize);

impl TemplateId {
    /// Zero-based request index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template_{}", self.0)
    }
}

/// A normalized reference symbol. Immutable once built.
#[derive(Clone, Debug)]
pub struct Template {
    id: TemplateId,
    label: Option<String>,
    mask: BinaryMask,
    color: Option<Color>,
}

impl Template {
    /// Creates a template without label or explicit color.
    pub fn new(id: TemplateId, mask: BinaryMask) -> Self {
        Self {
            id,
            label: None,
            mask,
            color: None,
        }
    }

    /// Attaches a caller-facing label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attaches an explicit display color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn id(&self) -> TemplateId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn mask(&self) -> &BinaryMask {
        &self.mask
    }

    /// Explicit color, if one was supplied.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Color used for this template's detections: the explicit color, or the
    /// palette entry for its index.
    pub fn display_color(&self) -> Color {
        self.color
            .unwrap_or_else(|| Color::palette(self.id.index()))
    }

    pub fn width(&self) -> usize {
        self.mask.width()
    }

    pub fn height(&self) -> usize {
        self.mask.height()
    }
}
