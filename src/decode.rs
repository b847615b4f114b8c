//! Decoding raw model output into candidate detections.
//!
//! The confidence threshold is applied here, before NMS, to bound the
//! candidate set. Boxes come out in model-input pixel coordinates.

use clap::ValueEnum;
use ndarray::{ArrayD, ArrayView1, Axis, Ix3, s};

use crate::error::DetectError;
use crate::types::{BBox, Candidate};

/// How the raw output tensor encodes predictions. Configured per model
/// family, never sniffed from tensor contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputLayout {
    /// `[1, 4+C, N]`, each anchor column is (cx, cy, w, h, class scores…).
    /// Anchor score is the best class score (YOLOv8-style heads).
    ClassScoresOnly,
    /// `[1, N, 5+C]`, each anchor row is (cx, cy, w, h, objectness,
    /// class scores…). Anchor score is objectness × best class score.
    BoxObjectnessClasses,
}

/// Decodes the raw output tensors into candidates scoring at least
/// `confidence_threshold`.
pub fn decode(
    outputs: &[ArrayD<f32>],
    layout: OutputLayout,
    num_classes: usize,
    confidence_threshold: f32,
) -> Result<Vec<Candidate>, DetectError> {
    let raw = outputs
        .first()
        .ok_or_else(|| DetectError::bad_output("model returned no output tensors"))?;
    let view = raw.view().into_dimensionality::<Ix3>().map_err(|_| {
        DetectError::bad_output(format!("expected a 3-d output, got shape {:?}", raw.shape()))
    })?;

    let mut candidates = Vec::new();
    match layout {
        OutputLayout::ClassScoresOnly => {
            let (batch, attrs, anchors) = view.dim();
            if batch != 1 || attrs != 4 + num_classes {
                return Err(DetectError::bad_output(format!(
                    "layout expects [1, {}, N], got {:?}",
                    4 + num_classes,
                    view.shape()
                )));
            }
            let preds = view.index_axis(Axis(0), 0);
            for anchor in 0..anchors {
                let column = preds.index_axis(Axis(1), anchor);
                let (class_id, score) = best_class(column.slice(s![4..]))?;
                if score < confidence_threshold {
                    continue;
                }
                let bbox = anchor_box(column[0], column[1], column[2], column[3])?;
                candidates.push(Candidate {
                    bbox,
                    class_id,
                    score,
                });
            }
        }
        OutputLayout::BoxObjectnessClasses => {
            let (batch, anchors, attrs) = view.dim();
            if batch != 1 || attrs != 5 + num_classes {
                return Err(DetectError::bad_output(format!(
                    "layout expects [1, N, {}], got {:?}",
                    5 + num_classes,
                    view.shape()
                )));
            }
            let preds = view.index_axis(Axis(0), 0);
            for anchor in 0..anchors {
                let row = preds.index_axis(Axis(0), anchor);
                let objectness = row[4];
                if !objectness.is_finite() {
                    return Err(DetectError::bad_output("non-finite objectness score"));
                }
                let (class_id, best) = best_class(row.slice(s![5..]))?;
                let score = objectness * best;
                if score < confidence_threshold {
                    continue;
                }
                let bbox = anchor_box(row[0], row[1], row[2], row[3])?;
                candidates.push(Candidate {
                    bbox,
                    class_id,
                    score,
                });
            }
        }
    }
    Ok(candidates)
}

/// Argmax over class scores; a tie keeps the lowest index.
fn best_class(scores: ArrayView1<'_, f32>) -> Result<(usize, f32), DetectError> {
    let mut best = (0usize, f32::NEG_INFINITY);
    for (idx, &score) in scores.iter().enumerate() {
        if !score.is_finite() {
            return Err(DetectError::bad_output("non-finite class score"));
        }
        if score > best.1 {
            best = (idx, score);
        }
    }
    Ok(best)
}

fn anchor_box(cx: f32, cy: f32, w: f32, h: f32) -> Result<BBox, DetectError> {
    if ![cx, cy, w, h].iter().all(|v| v.is_finite()) {
        return Err(DetectError::bad_output("non-finite box coordinates"));
    }
    Ok(BBox::from_cxcywh(cx, cy, w, h))
}
