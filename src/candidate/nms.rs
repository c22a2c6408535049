//! Greedy IoU non-maximum suppression.

use crate::candidate::Detection;

/// Candidates overlapping an accepted detection at or above this IoU are
/// dropped.
pub const IOU_SUPPRESSION_LIMIT: f64 = 0.5;

/// Suppresses overlapping detections with the default IoU limit.
pub fn suppress(detections: Vec<Detection>) -> Vec<Detection> {
    suppress_with_limit(detections, IOU_SUPPRESSION_LIMIT)
}

/// Greedy suppression over the whole pool, regardless of template.
///
/// Candidates are ordered by descending confidence, ties keeping their input
/// order. The best remaining candidate is accepted and every remaining
/// candidate with `iou >= limit` against it is discarded, until none remain.
/// Accepted detections are returned in acceptance order and are pairwise
/// below `limit`.
pub fn suppress_with_limit(mut detections: Vec<Detection>, limit: f64) -> Vec<Detection> {
    // stable: equal confidences stay first-seen-first
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut remaining: Vec<Option<Detection>> = detections.into_iter().map(Some).collect();
    let mut kept = Vec::new();
    for idx in 0..remaining.len() {
        let Some(current) = remaining[idx].take() else {
            continue;
        };
        for slot in remaining[idx + 1..].iter_mut() {
            if slot
                .as_ref()
                .is_some_and(|other| current.bbox.iou(&other.bbox) >= limit)
            {
                *slot = None;
            }
        }
        kept.push(current);
    }
    kept
}
