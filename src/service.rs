//! gRPC surface over the detection pipeline.

use std::sync::Arc;

use tonic::{Request, Response, Status, async_trait};
use tracing::warn;

use crate::error::DetectError;
use crate::grpc::object_detector_server::ObjectDetector;
use crate::grpc::{DetectRequest, DetectResponse};
use crate::pipeline::{DEFAULT_CONF_THRESHOLD, DEFAULT_IOU_THRESHOLD, Detector};

pub struct DetectService {
    detector: Arc<Detector>,
}

impl DetectService {
    pub fn new(detector: Arc<Detector>) -> Self {
        Self { detector }
    }
}

#[async_trait]
impl ObjectDetector for DetectService {
    async fn detect(
        &self,
        request: Request<DetectRequest>,
    ) -> Result<Response<DetectResponse>, Status> {
        let req = request.into_inner();
        let conf_thres = req.conf_thres.unwrap_or(DEFAULT_CONF_THRESHOLD);
        let iou_thres = req.iou_thres.unwrap_or(DEFAULT_IOU_THRESHOLD);

        let detections = self
            .detector
            .detect(&req.image, conf_thres, iou_thres)
            .map_err(status_from)?;

        let detections = detections
            .into_iter()
            .map(|d| crate::grpc::Detection {
                class_id: d.class_id as u32,
                class_name: d.class_name,
                score: d.score,
                x1: d.bbox.x1,
                y1: d.bbox.y1,
                x2: d.bbox.x2,
                y2: d.bbox.y2,
            })
            .collect();

        Ok(Response::new(DetectResponse { detections }))
    }
}

fn status_from(err: DetectError) -> Status {
    if err.is_client_error() {
        return Status::invalid_argument(err.to_string());
    }
    warn!(error = %err, "request failed");
    match err {
        DetectError::InferenceTimeout { .. } => Status::deadline_exceeded(err.to_string()),
        _ => Status::internal(err.to_string()),
    }
}
