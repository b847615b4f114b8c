use clap::Parser;

use crate::decode::OutputLayout;

#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// ONNX model path
    #[arg(long, required = true)]
    pub model: String,

    /// Class-name file, one name per line (defaults to the built-in COCO-80 table)
    #[arg(long)]
    pub labels: Option<String>,

    /// Model input size (square)
    #[arg(long, default_value_t = 640)]
    pub size: u32,

    /// Number of classes the model predicts
    #[arg(long, default_value_t = 80)]
    pub classes: usize,

    /// Raw output layout of the model
    #[arg(long, value_enum, default_value = "class-scores-only")]
    pub layout: OutputLayout,

    /// Wall-clock budget per inference call, milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Listen address
    #[arg(long, default_value = "[::1]:50051")]
    pub addr: String,
}
