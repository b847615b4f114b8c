//! Core value types flowing through the pipeline.

/// Axis-aligned box, corner form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box from center/size encoding.
    pub fn from_cxcywh(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        }
    }

    pub fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }
}

/// A decoded anchor that cleared the confidence threshold. Coordinates are
/// in model-input pixel space; lives only between decode and mapping.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub bbox: BBox,
    pub class_id: usize,
    pub score: f32,
}

/// Final output unit, in original-image pixel coordinates.
#[derive(Debug, Clone)]
pub struct Detection {
    pub class_id: usize,
    pub class_name: String,
    pub score: f32,
    pub bbox: BBox,
}
