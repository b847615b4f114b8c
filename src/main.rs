use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tonic::transport::Server;
use tracing::info;

use snapdetect::grpc::object_detector_server::ObjectDetectorServer;
use snapdetect::{Args, DetectService, Detector, LabelTable, ModelConfig, OrtBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    // Startup phase: label table and model weights are loaded exactly once
    // before any request is served. A failure here is fatal.
    let labels = match &args.labels {
        Some(path) => LabelTable::from_file(path)
            .with_context(|| format!("failed to load labels from {path}"))?,
        None => LabelTable::coco(),
    };
    let config = ModelConfig {
        input_size: args.size,
        layout: args.layout,
        num_classes: args.classes,
        timeout: Duration::from_millis(args.timeout_ms),
    };
    let backend = OrtBackend::load(&args.model, config.timeout)
        .with_context(|| format!("failed to load model from {}", args.model))?;
    info!(model = %args.model, classes = labels.len(), "model loaded");

    let detector = Arc::new(Detector::new(Arc::new(backend), labels, config));
    let service = DetectService::new(detector);

    let addr = args.addr.parse().context("invalid listen address")?;
    info!(%addr, "object detector listening");
    Server::builder()
        .add_service(ObjectDetectorServer::new(service))
        .serve(addr)
        .await?;

    Ok(())
}
