//! End-to-end pipeline tests against a deterministic fake model.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use ndarray::{Array3, Array4, ArrayD};

use snapdetect::{
    Backend, DetectError, Detector, LabelTable, ModelConfig, OutputLayout,
};

/// Backend that ignores its input and replays a canned output tensor.
struct FakeBackend {
    output: ArrayD<f32>,
}

impl Backend for FakeBackend {
    fn run(&self, _input: &Array4<f32>) -> Result<Vec<ArrayD<f32>>, DetectError> {
        Ok(vec![self.output.clone()])
    }
}

/// Backend that always blows its inference budget.
struct TimeoutBackend;

impl Backend for TimeoutBackend {
    fn run(&self, _input: &Array4<f32>) -> Result<Vec<ArrayD<f32>>, DetectError> {
        Err(DetectError::InferenceTimeout {
            elapsed: Duration::from_secs(11),
            budget: Duration::from_secs(10),
        })
    }
}

const NUM_CLASSES: usize = 80;

/// Builds a `[1, 4+C, N]` YOLO-style tensor from
/// (cx, cy, w, h, class_id, score) anchors.
fn yolo_output(anchors: &[(f32, f32, f32, f32, usize, f32)]) -> ArrayD<f32> {
    let mut out = Array3::<f32>::zeros((1, 4 + NUM_CLASSES, anchors.len()));
    for (a, &(cx, cy, w, h, class_id, score)) in anchors.iter().enumerate() {
        out[[0, 0, a]] = cx;
        out[[0, 1, a]] = cy;
        out[[0, 2, a]] = w;
        out[[0, 3, a]] = h;
        out[[0, 4 + class_id, a]] = score;
    }
    out.into_dyn()
}

fn detector_with(output: ArrayD<f32>) -> Detector {
    Detector::new(
        Arc::new(FakeBackend { output }),
        LabelTable::coco(),
        ModelConfig {
            layout: OutputLayout::ClassScoresOnly,
            num_classes: NUM_CLASSES,
            ..ModelConfig::default()
        },
    )
}

/// A 1280×720 PNG; letterboxed into 640×640 this gives scale 0.5 and a
/// 140px vertical padding band.
fn wide_image_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(1280, 720, image::Rgb([40, 80, 120]));
    let mut bytes = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

#[test]
fn one_anchor_becomes_one_mapped_detection() {
    // Model-space box (100, 100, 200, 200) on the letterboxed canvas.
    let detector = detector_with(yolo_output(&[(150.0, 150.0, 100.0, 100.0, 0, 0.9)]));
    let detections = detector.detect(&wide_image_png(), 0.5, 0.5).unwrap();

    assert_eq!(detections.len(), 1);
    let d = &detections[0];
    assert_eq!(d.class_id, 0);
    assert_eq!(d.class_name, "person");
    assert_eq!(d.score, 0.9);
    // Inverse letterbox: subtract pad (0, 140), divide by 0.5, clamp.
    assert_eq!(d.bbox.x1, 200.0);
    assert_eq!(d.bbox.y1, 0.0);
    assert_eq!(d.bbox.x2, 400.0);
    assert_eq!(d.bbox.y2, 120.0);
}

#[test]
fn duplicate_boxes_collapse_to_the_best_scoring_one() {
    let detector = detector_with(yolo_output(&[
        (320.0, 320.0, 100.0, 100.0, 2, 0.9),
        (320.0, 320.0, 100.0, 100.0, 2, 0.95),
    ]));
    let detections = detector.detect(&wide_image_png(), 0.5, 0.5).unwrap();

    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].score, 0.95);
    assert_eq!(detections[0].class_name, "car");
}

#[test]
fn nothing_above_threshold_is_an_empty_non_error_result() {
    let detector = detector_with(yolo_output(&[(320.0, 320.0, 100.0, 100.0, 0, 0.3)]));
    let detections = detector.detect(&wide_image_png(), 0.5, 0.5).unwrap();
    assert!(detections.is_empty());
}

#[test]
fn detections_inside_the_padding_band_are_dropped() {
    // Entirely within the top padding (y < 140 in model space): degenerate
    // after clamping, silently filtered.
    let detector = detector_with(yolo_output(&[
        (150.0, 65.0, 100.0, 110.0, 0, 0.9),
        (320.0, 320.0, 100.0, 100.0, 0, 0.8),
    ]));
    let detections = detector.detect(&wide_image_png(), 0.5, 0.5).unwrap();

    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].score, 0.8);
    for d in &detections {
        assert!(d.bbox.x1 < d.bbox.x2);
        assert!(d.bbox.y1 < d.bbox.y2);
    }
}

#[test]
fn out_of_range_thresholds_fail_before_preprocessing() {
    let detector = detector_with(yolo_output(&[]));
    assert!(matches!(
        detector.detect(&wide_image_png(), 1.5, 0.5),
        Err(DetectError::InvalidThreshold { name: "conf_thres" })
    ));
    assert!(matches!(
        detector.detect(&wide_image_png(), 0.5, -0.5),
        Err(DetectError::InvalidThreshold { name: "iou_thres" })
    ));
}

#[test]
fn undecodable_bytes_are_a_client_error() {
    let detector = detector_with(yolo_output(&[]));
    let err = detector.detect(b"not an image", 0.5, 0.5).unwrap_err();
    assert!(err.is_client_error());
}

#[test]
fn inference_timeout_fails_the_whole_request() {
    let detector = Detector::new(
        Arc::new(TimeoutBackend),
        LabelTable::coco(),
        ModelConfig::default(),
    );
    assert!(matches!(
        detector.detect(&wide_image_png(), 0.5, 0.5),
        Err(DetectError::InferenceTimeout { .. })
    ));
}

#[test]
fn non_finite_model_output_fails_cleanly() {
    let detector = detector_with(yolo_output(&[(320.0, 320.0, f32::INFINITY, 100.0, 0, 0.9)]));
    assert!(matches!(
        detector.detect(&wide_image_png(), 0.5, 0.5),
        Err(DetectError::InferenceOutput { .. })
    ));
}
