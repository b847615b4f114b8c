//! Non-maximum suppression.
//!
//! Policy: class-aware. A candidate only suppresses lower-scoring
//! candidates of the same class. The greedy exact algorithm is kept as-is
//! (O(n²) over the post-filter candidate set) so output is deterministic.

use crate::types::{BBox, Candidate};

/// Intersection over union of two corner-form boxes. Zero-area inputs
/// yield 0 rather than dividing by a degenerate denominator.
pub fn iou(a: &BBox, b: &BBox) -> f32 {
    let inter_x1 = a.x1.max(b.x1);
    let inter_y1 = a.y1.max(b.y1);
    let inter_x2 = a.x2.min(b.x2);
    let inter_y2 = a.y2.min(b.y2);

    let inter = (inter_x2 - inter_x1).max(0.0) * (inter_y2 - inter_y1).max(0.0);
    let union = a.area() + b.area() - inter;
    if union <= 0.0 { 0.0 } else { inter / union }
}

/// Greedy class-aware NMS.
///
/// Candidates are sorted by score descending (stable, so equal scores keep
/// their original anchor order), then each survivor suppresses every
/// remaining same-class candidate overlapping it with IoU above
/// `iou_threshold`.
pub fn suppress(mut candidates: Vec<Candidate>, iou_threshold: f32) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut suppressed = vec![false; candidates.len()];
    let mut kept = Vec::new();
    for i in 0..candidates.len() {
        if suppressed[i] {
            continue;
        }
        let best = candidates[i];
        kept.push(best);
        for j in (i + 1)..candidates.len() {
            if suppressed[j] || candidates[j].class_id != best.class_id {
                continue;
            }
            if iou(&best.bbox, &candidates[j].bbox) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }
    kept
}
