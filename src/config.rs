//! Run configuration
//!
//! Everything a run depends on is an explicit parameter here; nothing is
//! inferred from the process environment or working directory.

use crate::cleaning::ColumnSelection;
use crate::common::plots::PlotGeometry;
use clap::Parser;
use std::path::PathBuf;

/// Command line options for a single analysis run
#[derive(Debug, Parser)]
#[command(
    name = "analyze-diet-stats",
    about = "One-shot statistical analysis of country-level diet and mortality data",
    version
)]
pub struct RunConfig {
    /// Path to the delimited input file (header row required)
    #[arg(long)]
    pub input: PathBuf,

    /// Name of the country identifier column
    #[arg(long, default_value = "Country")]
    pub country_column: String,

    /// Name of the column providing X (animal fat intake, grams/person/day)
    #[arg(long, default_value = "Animal fats")]
    pub x_column: String,

    /// Name of the column providing Y (death count)
    #[arg(long, default_value = "Deaths")]
    pub y_column: String,

    /// Directory receiving the two figures and the text report
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Seed for the normality-test subsample drawn above 5000 observations
    #[arg(long, default_value_t = 123)]
    pub seed: u64,

    /// Number of histogram bins
    #[arg(long, default_value_t = 15)]
    pub bins: usize,

    /// Figure width in inches
    #[arg(long, default_value_t = 7.0)]
    pub plot_width_in: f64,

    /// Figure height in inches
    #[arg(long, default_value_t = 5.0)]
    pub plot_height_in: f64,

    /// Figure resolution in dots per inch
    #[arg(long, default_value_t = 300)]
    pub plot_dpi: u32,
}

impl RunConfig {
    /// Columns to project out of the input table
    pub fn column_selection(&self) -> ColumnSelection {
        ColumnSelection {
            country: self.country_column.clone(),
            x_source: self.x_column.clone(),
            y_source: self.y_column.clone(),
        }
    }

    /// Output geometry shared by both figures
    pub fn plot_geometry(&self) -> PlotGeometry {
        PlotGeometry {
            width_in: self.plot_width_in,
            height_in: self.plot_height_in,
            dpi: self.plot_dpi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::try_parse_from(["analyze-diet-stats", "--input", "data.csv"])
            .unwrap();

        assert_eq!(config.input, PathBuf::from("data.csv"));
        assert_eq!(config.country_column, "Country");
        assert_eq!(config.x_column, "Animal fats");
        assert_eq!(config.y_column, "Deaths");
        assert_eq!(config.seed, 123);
        assert_eq!(config.bins, 15);
        assert_eq!(config.plot_geometry().pixel_size(), (2100, 1500));
    }

    #[test]
    fn test_input_is_required() {
        let result = RunConfig::try_parse_from(["analyze-diet-stats"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let config = RunConfig::try_parse_from([
            "analyze-diet-stats",
            "--input",
            "other.csv",
            "--x-column",
            "Fat supply",
            "--seed",
            "7",
            "--bins",
            "30",
        ])
        .unwrap();

        assert_eq!(config.x_column, "Fat supply");
        assert_eq!(config.seed, 7);
        assert_eq!(config.bins, 30);
        assert_eq!(config.column_selection().x_source, "Fat supply");
    }
}
