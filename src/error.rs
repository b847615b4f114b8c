//! Error types for the detection pipeline.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by the detection pipeline.
#[derive(Error, Debug)]
pub enum DetectError {
    /// The request carried bytes that do not decode to an image.
    #[error("image decode failed")]
    ImageDecode(#[source] image::ImageError),

    /// The decoded image cannot be fed to the model (zero dimensions,
    /// unsupported pixel layout).
    #[error("invalid image: {message}")]
    InvalidImage { message: String },

    /// A caller-supplied threshold is outside [0, 1]. Rejected up front,
    /// never clamped.
    #[error("{name} must be between 0 and 1")]
    InvalidThreshold { name: &'static str },

    /// A mapped box degenerated to zero or negative area after clamping.
    /// Internal: offending boxes are dropped, this never reaches a caller.
    #[error("degenerate box after coordinate mapping")]
    InvalidGeometry,

    /// The model could not be loaded at startup. Fatal: the process must
    /// not serve requests.
    #[error("failed to load model from {path}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },

    /// The inference call exceeded its wall-clock budget.
    #[error("inference exceeded {budget:?} (took {elapsed:?})")]
    InferenceTimeout { elapsed: Duration, budget: Duration },

    /// The raw output tensor is unusable: wrong shape for the configured
    /// layout, or non-finite values.
    #[error("bad model output: {message}")]
    InferenceOutput { message: String },

    /// The inference session itself failed.
    #[error("inference failed")]
    Inference(#[from] ort::Error),
}

impl DetectError {
    /// Whether the error is the caller's fault (bad image, bad thresholds)
    /// as opposed to a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DetectError::ImageDecode(_)
                | DetectError::InvalidImage { .. }
                | DetectError::InvalidThreshold { .. }
        )
    }

    pub(crate) fn bad_output(message: impl Into<String>) -> Self {
        DetectError::InferenceOutput {
            message: message.into(),
        }
    }
}
