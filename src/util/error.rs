//! Error types for symscan.

use std::fmt;

use thiserror::Error;

use crate::template::TemplateId;

/// Result alias for symscan operations.
pub type SymScanResult<T> = std::result::Result<T, SymScanError>;

/// Identifies which input image an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageId {
    /// The blueprint being scanned.
    Target,
    /// One of the request templates.
    Template(TemplateId),
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageId::Target => f.write_str("target"),
            ImageId::Template(id) => write!(f, "{id}"),
        }
    }
}

/// Why a template could not contribute candidates.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatchFailure {
    /// No valid placement exists.
    #[error("template {tpl_width}x{tpl_height} exceeds target {img_width}x{img_height}")]
    TemplateLargerThanTarget {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The normalized template mask is flat, so correlation is undefined.
    #[error("template mask has zero variance")]
    DegenerateTemplate,
}

/// Errors that can occur while running the detection pipeline.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SymScanError {
    /// The request or a configuration value was rejected before any work ran.
    #[error("invalid request: {reason}")]
    Validation { reason: String },
    /// Image bytes could not be decoded into a pixel grid.
    #[error("failed to decode {image} image: {reason}")]
    Decode { image: ImageId, reason: String },
    /// A template could not be matched against the target.
    #[error("{template} cannot be matched: {reason}")]
    Match {
        template: TemplateId,
        reason: MatchFailure,
    },
    /// The caller cancelled the request or its deadline passed.
    #[error("detection cancelled")]
    Cancelled,
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A pixel buffer is shorter than its declared shape.
    #[error("buffer too small: need {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The annotated image could not be encoded.
    #[error("failed to encode annotated image: {reason}")]
    Encode { reason: String },
}

impl SymScanError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Returns the coarse error class reported to callers.
    ///
    /// Anything that is not a caller mistake collapses into `"internal"`.
    pub fn kind(&self) -> &'static str {
        match self {
            SymScanError::Validation { .. } => "validation",
            SymScanError::Decode { .. } => "decode",
            SymScanError::Match { .. } => "match",
            SymScanError::Cancelled => "cancelled",
            SymScanError::InvalidDimensions { .. }
            | SymScanError::BufferTooSmall { .. }
            | SymScanError::Encode { .. } => "internal",
        }
    }
}
