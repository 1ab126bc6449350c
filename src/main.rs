//! One-shot analysis pipeline for country-level diet and mortality data
//!
//! Stages run strictly in order, each consuming the previous stage's output:
//! load -> clean -> summarize -> visualize -> test -> report. All three output
//! artifacts derive from one immutable analysis frame per run.

mod analysis;
mod cleaning;
mod common;
mod config;
mod parsing;
mod report;

use clap::Parser;
use log::info;
use thiserror::Error;

use analysis::{fit_linear, pearson, summarize, test_normality, StatError};
use cleaning::build_analysis_frame;
use common::plots::{create_histogram_plot, create_scatter_plot, PlotError};
use config::RunConfig;
use parsing::load_record_table;
use report::{write_report, ReportInputs};

/// Errors that can occur during an analysis run
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Parsing error: {0}")]
    Parsing(#[from] parsing::ParsingError),

    #[error("Cleaning error: {0}")]
    Cleaning(#[from] cleaning::CleaningError),

    #[error("Statistics error: {0}")]
    Stats(#[from] StatError),

    #[error("Plot error: {0}")]
    Plot(#[from] PlotError),

    #[error("Report error: {0}")]
    Report(#[from] report::ReportError),
}

type Result<T> = core::result::Result<T, AnalysisError>;

fn main() -> Result<()> {
    env_logger::init();
    let config = RunConfig::parse();
    run(&config)
}

/// Execute the full pipeline for one configuration
fn run(config: &RunConfig) -> Result<()> {
    let table = load_record_table(&config.input)?;
    info!(
        "Loaded {} rows from {}",
        table.rows.len(),
        config.input.display()
    );

    let frame = build_analysis_frame(&table, &config.column_selection())?;
    info!("Analysis frame holds {} countries", frame.len());

    let x_summary = summarize(&frame.x);
    let y_summary = summarize(&frame.y);

    let geometry = config.plot_geometry();
    create_scatter_plot(&frame, geometry, &config.output_dir)?;
    create_histogram_plot(&frame, config.bins, geometry, &config.output_dir)?;
    info!("Figures written to {}", config.output_dir.display());

    let correlation = pearson(&frame.x, &frame.y)?;
    let regression = fit_linear(&frame.x, &frame.y)?;
    let x_normality = test_normality(&frame.x, config.seed)?;
    let y_normality = test_normality(&frame.y, config.seed)?;

    let inputs = ReportInputs {
        row_count: frame.len(),
        x_summary: &x_summary,
        y_summary: &y_summary,
        correlation: &correlation,
        regression: &regression,
        x_normality: &x_normality,
        y_normality: &y_normality,
    };
    write_report(&inputs, &config.output_dir)?;
    info!(
        "Report written to {}",
        config.output_dir.join(report::REPORT_FILE_NAME).display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_for(input: &std::path::Path, output_dir: &std::path::Path) -> RunConfig {
        RunConfig::try_parse_from([
            "analyze-diet-stats",
            "--input",
            input.to_str().unwrap(),
            "--output-dir",
            output_dir.to_str().unwrap(),
        ])
        .unwrap()
    }

    fn write_input(dir: &std::path::Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("input.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_run_missing_input_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = config_for(&temp_dir.path().join("absent.csv"), temp_dir.path());

        let result = run(&config);
        assert!(matches!(
            result,
            Err(AnalysisError::Parsing(
                parsing::ParsingError::FileNotFound { .. }
            ))
        ));
    }

    #[test]
    fn test_run_missing_column_aborts_before_outputs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = write_input(temp_dir.path(), "Country,Fat,Deaths\nAlbania,1.0,2\n");
        let config = config_for(&input, temp_dir.path());

        let result = run(&config);
        assert!(matches!(
            result,
            Err(AnalysisError::Cleaning(
                cleaning::CleaningError::MissingColumn { .. }
            ))
        ));
        assert!(!temp_dir.path().join(report::REPORT_FILE_NAME).exists());
    }

    #[test]
    fn test_run_header_only_input_fails_at_render() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = write_input(temp_dir.path(), "Country,Animal fats,Deaths\n");
        let config = config_for(&input, temp_dir.path());

        // Loader and cleaner accept the empty table; the first render rejects
        // the zero-row frame before any report is written
        let result = run(&config);
        assert!(matches!(
            result,
            Err(AnalysisError::Plot(PlotError::EmptyFrame))
        ));
        assert!(!temp_dir.path().join(report::REPORT_FILE_NAME).exists());
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn test_run_complete_pipeline() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut contents = String::from("Country,Animal fats,Deaths\n");
        for i in 0..10 {
            contents.push_str(&format!("Country {i},{}.5,{}\n", 10 + i * 3, 900 + i * 250));
        }
        let input = write_input(temp_dir.path(), &contents);
        let config = config_for(&input, temp_dir.path());

        run(&config).unwrap();

        assert!(temp_dir
            .path()
            .join(common::plots::SCATTER_FILE_NAME)
            .exists());
        assert!(temp_dir
            .path()
            .join(common::plots::HISTOGRAM_FILE_NAME)
            .exists());
        let written = std::fs::read_to_string(temp_dir.path().join(report::REPORT_FILE_NAME))
            .unwrap();
        assert!(written.contains("Countries analyzed: 10"));
    }
}
