//! Text report generation
//!
//! Serializes every numeric result of a run into a single human-readable
//! UTF-8 file. The contract is section order and the presence of all listed
//! quantities, not exact column widths.

use crate::analysis::{ColumnSummary, CorrelationResult, NormalityResult, RegressionResult};
use std::fs;
use std::io;
use std::path::Path;
use tabled::{Table, Tabled};
use thiserror::Error;

/// File name of the text report, fixed across runs
pub const REPORT_FILE_NAME: &str = "Analysis_results.txt";

/// Errors that can occur while writing the report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    FileWrite(#[from] io::Error),
}

type Result<T> = core::result::Result<T, ReportError>;

/// Everything the report serializes, all derived from one analysis frame
#[derive(Debug)]
pub struct ReportInputs<'a> {
    pub row_count: usize,
    pub x_summary: &'a ColumnSummary,
    pub y_summary: &'a ColumnSummary,
    pub correlation: &'a CorrelationResult,
    pub regression: &'a RegressionResult,
    pub x_normality: &'a NormalityResult,
    pub y_normality: &'a NormalityResult,
}

/// One row of a summary statistics table
#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Statistic")]
    statistic: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// One row of the regression coefficient table
#[derive(Tabled)]
struct CoefficientRow {
    #[tabled(rename = "Term")]
    term: &'static str,
    #[tabled(rename = "Estimate")]
    estimate: String,
    #[tabled(rename = "Std. Error")]
    std_error: String,
    #[tabled(rename = "t value")]
    t_value: String,
    #[tabled(rename = "p-value")]
    p_value: String,
}

/// Write the full report into the output directory
///
/// # Arguments
/// * `inputs` - All numeric results of the run
/// * `output_dir` - Directory receiving `Analysis_results.txt`
pub fn write_report(inputs: &ReportInputs<'_>, output_dir: &Path) -> Result<()> {
    let output_file = output_dir.join(REPORT_FILE_NAME);
    fs::write(&output_file, render_report(inputs))?;
    Ok(())
}

/// Render the report text, sections in fixed order
pub fn render_report(inputs: &ReportInputs<'_>) -> String {
    let sections = [
        banner("Animal Fat Intake and Mortality Analysis"),
        research_question(),
        variable_definitions(),
        observation_count(inputs.row_count),
        summary_section("X Summary (animal fat intake)", inputs.x_summary),
        summary_section("Y Summary (deaths)", inputs.y_summary),
        correlation_section(inputs.correlation),
        regression_section(inputs.regression),
        normality_section("Normality of X (Shapiro-Wilk)", inputs.x_normality),
        normality_section("Normality of Y (Shapiro-Wilk)", inputs.y_normality),
    ];

    sections.join("\n\n") + "\n"
}

fn banner(title: &str) -> String {
    format!("{}\n{}", title, "=".repeat(title.len()))
}

fn research_question() -> String {
    format!(
        "{}\nDo countries with higher daily animal fat intake record higher death counts?",
        banner("Research Question")
    )
}

fn variable_definitions() -> String {
    format!(
        "{}\nX: daily animal fat intake per person (grams/day)\n\
         Y: reported death count",
        banner("Variables")
    )
}

fn observation_count(row_count: usize) -> String {
    format!("{}\nCountries analyzed: {row_count}", banner("Observations"))
}

fn summary_section(title: &str, summary: &ColumnSummary) -> String {
    let rows = vec![
        SummaryRow {
            statistic: "Min",
            value: fmt_stat(summary.min),
        },
        SummaryRow {
            statistic: "Q1",
            value: fmt_stat(summary.q1),
        },
        SummaryRow {
            statistic: "Median",
            value: fmt_stat(summary.median),
        },
        SummaryRow {
            statistic: "Mean",
            value: fmt_stat(summary.mean),
        },
        SummaryRow {
            statistic: "Q3",
            value: fmt_stat(summary.q3),
        },
        SummaryRow {
            statistic: "Max",
            value: fmt_stat(summary.max),
        },
    ];

    format!("{}\n{}", banner(title), Table::new(rows))
}

fn correlation_section(correlation: &CorrelationResult) -> String {
    format!(
        "{}\n\
         r: {}\n\
         t statistic: {}\n\
         p-value (two-sided): {}\n\
         {:.0}% CI: [{}, {}]\n\
         n: {}",
        banner("Pearson Correlation (X vs Y)"),
        fmt_stat(correlation.r),
        fmt_stat(correlation.statistic),
        fmt_p(correlation.p_value),
        correlation.confidence_level * 100.0,
        fmt_stat(correlation.ci_lower),
        fmt_stat(correlation.ci_upper),
        correlation.n
    )
}

fn regression_section(regression: &RegressionResult) -> String {
    let rows = vec![
        CoefficientRow {
            term: "Intercept",
            estimate: fmt_stat(regression.intercept),
            std_error: fmt_stat(regression.intercept_std_err),
            t_value: fmt_stat(regression.intercept_t),
            p_value: fmt_p(regression.intercept_p),
        },
        CoefficientRow {
            term: "X",
            estimate: fmt_stat(regression.slope),
            std_error: fmt_stat(regression.slope_std_err),
            t_value: fmt_stat(regression.slope_t),
            p_value: fmt_p(regression.slope_p),
        },
    ];

    format!(
        "{}\n{}\nR-squared: {}\nResidual std. error: {} (df = {})",
        banner("Linear Regression (Y ~ X)"),
        Table::new(rows),
        fmt_stat(regression.r_squared),
        fmt_stat(regression.residual_std_error),
        regression.n - 2
    )
}

fn normality_section(title: &str, normality: &NormalityResult) -> String {
    let sampling_note = if normality.sampled {
        " (fixed-seed subsample)"
    } else {
        ""
    };

    format!(
        "{}\nW: {}\np-value: {}\nn tested: {}{}",
        banner(title),
        fmt_stat(normality.statistic),
        fmt_p(normality.p_value),
        normality.n_used,
        sampling_note
    )
}

/// Fixed four-decimal formatting for statistics; NaN renders as NA
fn fmt_stat(value: f64) -> String {
    if value.is_nan() {
        "NA".to_string()
    } else {
        format!("{value:.4}")
    }
}

/// p-values switch to scientific notation below 1e-4
fn fmt_p(p: f64) -> String {
    if p.is_nan() {
        "NA".to_string()
    } else if p != 0.0 && p < 1e-4 {
        format!("{p:.4e}")
    } else {
        format!("{p:.4}")
    }
}
