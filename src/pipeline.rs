//! The request-scoped detection pipeline:
//! bytes → decode → preprocess → infer → decode output → NMS → map coords.
//!
//! A `Detector` is built once at startup and shared read-only across
//! requests; everything request-specific lives on the stack of `detect`.

use std::sync::Arc;

use tracing::debug;

use crate::config::ModelConfig;
use crate::coords::map_to_original;
use crate::decode::decode;
use crate::error::DetectError;
use crate::labels::LabelTable;
use crate::model::Backend;
use crate::nms::suppress;
use crate::preprocess::{PreprocessConfig, Preprocessor, decode_image};
use crate::types::Detection;

pub const DEFAULT_CONF_THRESHOLD: f32 = 0.5;
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.5;

pub struct Detector {
    backend: Arc<dyn Backend>,
    labels: LabelTable,
    preprocessor: Preprocessor,
    config: ModelConfig,
}

impl Detector {
    pub fn new(backend: Arc<dyn Backend>, labels: LabelTable, config: ModelConfig) -> Self {
        let preprocessor = Preprocessor::new(PreprocessConfig {
            size: config.input_size,
            ..PreprocessConfig::default()
        });
        Self {
            backend,
            labels,
            preprocessor,
            config,
        }
    }

    /// Runs the full pipeline on one encoded image.
    ///
    /// Thresholds outside [0, 1] are rejected before any work happens.
    /// An empty result is a normal outcome, not an error.
    pub fn detect(
        &self,
        image_bytes: &[u8],
        confidence_threshold: f32,
        iou_threshold: f32,
    ) -> Result<Vec<Detection>, DetectError> {
        validate_threshold("conf_thres", confidence_threshold)?;
        validate_threshold("iou_thres", iou_threshold)?;

        let image = decode_image(image_bytes)?;
        let (original_width, original_height) = (image.width(), image.height());

        let (tensor, params) = self.preprocessor.preprocess(&image)?;
        let outputs = self.backend.run(&tensor)?;
        let candidates = decode(
            &outputs,
            self.config.layout,
            self.config.num_classes,
            confidence_threshold,
        )?;
        debug!(candidates = candidates.len(), "decoded model output");

        let kept = suppress(candidates, iou_threshold);

        let mut detections = Vec::with_capacity(kept.len());
        for candidate in kept {
            match map_to_original(candidate.bbox, &params, original_width, original_height) {
                Ok(bbox) => detections.push(Detection {
                    class_id: candidate.class_id,
                    class_name: self.labels.name(candidate.class_id).to_string(),
                    score: candidate.score,
                    bbox,
                }),
                // Degenerate after clamping: drop, never surface.
                Err(DetectError::InvalidGeometry) => {
                    debug!(class_id = candidate.class_id, "dropping degenerate box");
                }
                Err(e) => return Err(e),
            }
        }
        debug!(detections = detections.len(), "request complete");
        Ok(detections)
    }
}

fn validate_threshold(name: &'static str, value: f32) -> Result<(), DetectError> {
    // NaN fails the range check as well.
    if !(0.0..=1.0).contains(&value) {
        return Err(DetectError::InvalidThreshold { name });
    }
    Ok(())
}
