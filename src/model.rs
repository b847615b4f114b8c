//! The inference boundary.
//!
//! The pipeline never looks inside the network; it hands a tensor to a
//! [`Backend`] and gets raw output tensors back. The ONNX Runtime backend
//! is the production implementation; tests inject deterministic fakes.

use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use ndarray::{Array4, ArrayD, CowArray};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};

use crate::error::DetectError;

/// Black-box numeric model: one fixed-shape input tensor in, raw output
/// tensor(s) out. Synchronous and blocking; a call over its wall-clock
/// budget fails the request with [`DetectError::InferenceTimeout`].
pub trait Backend: Send + Sync {
    fn run(&self, input: &Array4<f32>) -> Result<Vec<ArrayD<f32>>, DetectError>;
}

/// ONNX Runtime session, loaded once at startup. A failed load is fatal.
pub struct OrtBackend {
    session: Mutex<Session>,
    budget: Duration,
}

impl OrtBackend {
    pub fn load(model_path: impl AsRef<Path>, budget: Duration) -> Result<Self, DetectError> {
        let path = model_path.as_ref();
        let as_load_error = |source: ort::Error| DetectError::ModelLoad {
            path: path.to_path_buf(),
            source,
        };

        let session = SessionBuilder::new()
            .map_err(as_load_error)?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(as_load_error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(as_load_error)?
            .commit_from_file(path)
            .map_err(as_load_error)?;

        Ok(Self {
            session: Mutex::new(session),
            budget,
        })
    }
}

impl Backend for OrtBackend {
    fn run(&self, input: &Array4<f32>) -> Result<Vec<ArrayD<f32>>, DetectError> {
        let started = Instant::now();

        let xs = CowArray::from(input.view().into_dyn());
        let input_values = ort::inputs![xs.view()]?;
        let tensors = {
            let session = self.session.lock().unwrap_or_else(|e| e.into_inner());
            let outputs = session.run(input_values)?;
            outputs
                .iter()
                .map(|(_name, value)| {
                    value
                        .try_extract_tensor::<f32>()
                        .map(|view| view.into_owned())
                })
                .collect::<Result<Vec<_>, ort::Error>>()?
        };

        let elapsed = started.elapsed();
        if elapsed > self.budget {
            return Err(DetectError::InferenceTimeout {
                elapsed,
                budget: self.budget,
            });
        }
        Ok(tensors)
    }
}
