//! Common infrastructure modules shared across pipeline stages
//!
//! This module provides reusable infrastructure for:
//! - Data carriers for the loaded table and the cleaned analysis frame
//! - Plotting the two output figures

pub mod data_structures;
pub mod plots;

// Re-export commonly used items
pub use data_structures::{AnalysisFrame, RecordTable};
pub use plots::PlotError;
