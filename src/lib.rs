pub mod cli;
pub mod config;
pub mod coords;
pub mod decode;
pub mod error;
pub mod grpc;
pub mod labels;
pub mod model;
pub mod nms;
pub mod pipeline;
pub mod preprocess;
pub mod service;
pub mod types;

pub use crate::cli::Args;
pub use crate::config::ModelConfig;
pub use crate::decode::{OutputLayout, decode};
pub use crate::error::DetectError;
pub use crate::labels::LabelTable;
pub use crate::model::{Backend, OrtBackend};
pub use crate::nms::{iou, suppress};
pub use crate::pipeline::{DEFAULT_CONF_THRESHOLD, DEFAULT_IOU_THRESHOLD, Detector};
pub use crate::preprocess::{LetterboxParams, PreprocessConfig, Preprocessor};
pub use crate::service::DetectService;
pub use crate::types::{BBox, Candidate, Detection};
