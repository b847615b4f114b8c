//! Model-level configuration, fixed at startup.

use std::time::Duration;

use crate::decode::OutputLayout;

/// Describes the loaded model: input geometry, output layout, class count,
/// and the per-call inference budget. Chosen once at startup; changing the
/// underlying model means updating these together with the label table.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model input is `input_size × input_size`.
    pub input_size: u32,
    /// How the raw output tensor encodes boxes and scores. Configured
    /// explicitly, never detected.
    pub layout: OutputLayout,
    pub num_classes: usize,
    /// Wall-clock budget for a single inference call.
    pub timeout: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            input_size: 640,
            layout: OutputLayout::ClassScoresOnly,
            num_classes: 80,
            timeout: Duration::from_secs(10),
        }
    }
}
