//! Batch processing types for parallel transforms.

use crate::types::TransformResult;
use napi_derive::napi;
use serde_json::Value as JsonValue;

/// A single document to transform.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// File identifier (typically the file path).
    pub id: String,
    /// Markdown source content.
    pub source: String,
}

/// Result for a single document in a batch.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// File identifier matching the input.
    pub id: String,
    /// Transform result (present on success).
    pub result: Option<TransformResult>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Statistics for batch processing.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchStats {
    /// Total number of documents received.
    pub total: u32,
    /// Number of successful transforms.
    pub succeeded: u32,
    /// Number of failed transforms.
    pub failed: u32,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to number of CPU cores.
    pub max_threads: Option<u32>,
    /// Whether to continue processing after an error. Defaults to true.
    pub continue_on_error: Option<bool>,
    /// Loader configuration shared by every document.
    pub config: Option<JsonValue>,
}

/// All results plus statistics.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchProcessingResult {
    /// Individual results, in input order.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}
