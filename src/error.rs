//! Error types for the proforma pipeline
//!
//! Undefined metrics (zero denominators, unsolvable IRR) are represented as
//! `None` in the output record, not as errors. Only structurally invalid
//! input and non-finite arithmetic surface here.

use thiserror::Error;

/// Errors produced by the projection pipeline and its input layer
#[derive(Debug, Error)]
pub enum ModelError {
    /// Assumption set cannot support a projection (e.g. zero hold period)
    #[error("invalid assumption: {0}")]
    InvalidAssumption(String),

    /// Property record failed schema validation before normalization
    #[error("invalid property record: {0}")]
    InvalidProperty(String),

    /// A computed value overflowed to NaN/infinity; results would be misleading
    #[error("non-finite {field} at month {month}")]
    NonFinite { field: &'static str, month: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
