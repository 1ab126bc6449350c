//! Statistical analysis routines
//!
//! This module contains the numeric core of the pipeline:
//! - Descriptive column summaries
//! - Pearson correlation with a Fisher-z confidence interval
//! - Ordinary least squares regression with inference
//! - Shapiro-Wilk normality testing with deterministic subsampling

pub mod correlation;
pub mod normality;
pub mod regression;
pub mod summary;

use thiserror::Error;

/// Errors that can occur during statistical computations
#[derive(Error, Debug)]
pub enum StatError {
    #[error("Insufficient data: {got} valid observations ({needed} required)")]
    InsufficientData { needed: usize, got: usize },

    #[error("Dimension mismatch: x has {x_len} values, y has {y_len}")]
    DimensionMismatch { x_len: usize, y_len: usize },

    #[error("Sample too large: {got} observations (test is limited to {limit})")]
    SampleTooLarge { limit: usize, got: usize },

    #[error("Data has zero variance; the statistic is undefined")]
    ConstantData,

    #[error("Numerical error: {0}")]
    Numeric(String),
}

/// Result type for statistical operations
pub type StatResult<T> = core::result::Result<T, StatError>;

// Re-export analysis entry points for convenience
pub use correlation::{pearson, CorrelationResult};
pub use normality::{test_normality, NormalityResult};
pub use regression::{fit_linear, RegressionResult};
pub use summary::{summarize, ColumnSummary};
