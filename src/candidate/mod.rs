//! Candidate detections and overlap pruning.
//!
//! Kernels emit [`Peak`]s; the matcher turns them into [`Detection`]s that are
//! collected in a [`DetectionPool`] and pruned by greedy IoU suppression.

use std::fmt;

use crate::color::Color;
use crate::geometry::Rect;
use crate::template::TemplateId;

pub(crate) mod nms;

/// Score at a placement in image space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate (column) of the top-left placement.
    pub x: usize,
    /// Y coordinate (row) of the top-left placement.
    pub y: usize,
    /// ZNCC score at the placement.
    pub score: f32,
}

/// Identifier of a detection, unique within one pool or response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DetectionId(pub usize);

impl fmt::Display for DetectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol_{}", self.0)
    }
}

/// One template occurrence in the target.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub id: DetectionId,
    /// Template that produced this detection.
    pub template: TemplateId,
    /// Correlation score in `[-1, 1]`.
    pub confidence: f32,
    /// Placement; always the size of the template.
    pub bbox: Rect,
    pub color: Color,
}

/// Raw candidates merged from every template for one request.
///
/// Ids are assigned in insertion order, which is also the tie-break order
/// used by suppression.
#[derive(Debug, Default)]
pub struct DetectionPool {
    items: Vec<Detection>,
}

impl DetectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends candidates, re-keying them with pool-wide ids.
    pub fn extend(&mut self, detections: impl IntoIterator<Item = Detection>) {
        for mut det in detections {
            det.id = DetectionId(self.items.len());
            self.items.push(det);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Detection] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Detection> {
        self.items
    }
}
