//! Plotting infrastructure for the analysis figures
//!
//! This module renders the two output figures using the [`plotters`] crate:
//! - A scatter chart of X against Y with an OLS trend line and a shaded 95%
//!   confidence band for the mean response
//! - A fixed-bin histogram of X counting countries per bin
//!
//! Charts are saved as PNG files; the default geometry is 7x5 inches at
//! 300 dpi (2100x1500 pixels). Visual equivalence, not pixel-exact output,
//! is the contract.

use crate::analysis::regression::{fit_linear, RegressionResult};
use crate::common::data_structures::AnalysisFrame;
use plotters::prelude::*;
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::path::Path;
use thiserror::Error;

/// File name of the scatter figure, fixed across runs
pub const SCATTER_FILE_NAME: &str = "Figure1_scatter_AnimalFats_vs_Deaths.png";

/// File name of the histogram figure, fixed across runs
pub const HISTOGRAM_FILE_NAME: &str = "Figure2_histogram_AnimalFats.png";

/// Number of x positions the trend line and band are evaluated at
const TREND_SAMPLES: usize = 60;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Cannot plot an empty analysis frame (zero rows)")]
    EmptyFrame,

    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Output geometry of a figure
#[derive(Debug, Clone, Copy)]
pub struct PlotGeometry {
    /// Figure width in inches
    pub width_in: f64,
    /// Figure height in inches
    pub height_in: f64,
    /// Resolution in dots per inch
    pub dpi: u32,
}

impl PlotGeometry {
    /// Rasterized size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f64).round() as u32,
            (self.height_in * self.dpi as f64).round() as u32,
        )
    }
}

impl Default for PlotGeometry {
    fn default() -> Self {
        Self {
            width_in: 7.0,
            height_in: 5.0,
            dpi: 300,
        }
    }
}

/// One histogram bin: half-open range and the number of values inside
///
/// The last bin is closed on the right so the column maximum is counted.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    pub count: usize,
}

/// Creates the scatter chart of X against Y and saves it as a PNG file
///
/// Points are semi-transparent (opacity 0.7) so overplotted countries remain
/// visible. When at least 3 points are present an OLS trend line is overlaid
/// together with a shaded 95% confidence band for the mean response; with
/// fewer points only the scatter is drawn.
///
/// # Arguments
/// * `frame` - The analysis frame driving the run
/// * `geometry` - Output size and resolution
/// * `output_dir` - Directory where the PNG file should be saved
///
/// # Returns
/// * `Ok(())` - If the chart was successfully created and saved
/// * `Err(PlotError)` - If the frame is empty or rendering failed
pub fn create_scatter_plot(
    frame: &AnalysisFrame,
    geometry: PlotGeometry,
    output_dir: &Path,
) -> Result<()> {
    if frame.is_empty() {
        return Err(PlotError::EmptyFrame);
    }

    let output_path = output_dir.join(SCATTER_FILE_NAME);
    let root = BitMapBackend::new(&output_path, geometry.pixel_size()).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    // Calculate axis ranges with a small margin around the data
    let (x_min, x_max) = padded_range(&frame.x);
    let (y_min, y_max) = padded_range(&frame.y);

    let mut chart = ChartBuilder::on(&root)
        .caption("Animal Fat Intake vs Deaths", ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Animal fat intake (g/person/day)")
        .x_label_style(("sans-serif", 25))
        .y_desc("Deaths")
        .y_label_style(("sans-serif", 25))
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Trend and band first so points stay visible on top
    if let Some(overlay) = trend_overlay(frame, x_min, x_max) {
        chart
            .draw_series(std::iter::once(Polygon::new(
                overlay.band,
                RED.mix(0.15).filled(),
            )))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        chart
            .draw_series(LineSeries::new(overlay.line, &RED))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    chart
        .draw_series(
            frame
                .x
                .iter()
                .zip(frame.y.iter())
                .map(|(&x, &y)| Circle::new((x, y), 4, BLUE.mix(0.7).filled())),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates the histogram of X and saves it as a PNG file
///
/// # Arguments
/// * `frame` - The analysis frame driving the run
/// * `bins` - Fixed number of bins spanning the column range
/// * `geometry` - Output size and resolution
/// * `output_dir` - Directory where the PNG file should be saved
///
/// # Returns
/// * `Ok(())` - If the chart was successfully created and saved
/// * `Err(PlotError)` - If the frame is empty or rendering failed
pub fn create_histogram_plot(
    frame: &AnalysisFrame,
    bins: usize,
    geometry: PlotGeometry,
    output_dir: &Path,
) -> Result<()> {
    if frame.is_empty() {
        return Err(PlotError::EmptyFrame);
    }

    let histogram = histogram_counts(&frame.x, bins);
    let x_lo = histogram[0].left;
    let x_hi = histogram[histogram.len() - 1].right;
    let max_count = histogram.iter().map(|bin| bin.count).max().unwrap_or(0) as u32;

    let output_path = output_dir.join(HISTOGRAM_FILE_NAME);
    let root = BitMapBackend::new(&output_path, geometry.pixel_size()).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Animal Fat Intake", ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_lo..x_hi, 0u32..max_count + 1)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Animal fat intake (g/person/day)")
        .x_label_style(("sans-serif", 25))
        .y_desc("Number of countries")
        .y_label_style(("sans-serif", 25))
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(histogram.iter().map(|bin| {
            Rectangle::new(
                [(bin.left, 0u32), (bin.right, bin.count as u32)],
                BLUE.mix(0.6).filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Trend line and confidence band points for the scatter overlay
struct TrendOverlay {
    line: Vec<(f64, f64)>,
    band: Vec<(f64, f64)>,
}

/// OLS trend evaluated across the plotted x range, when a fit is possible
///
/// The band is the pointwise 95% interval for the mean response:
/// `y_hat(x0) +/- t(0.975, n-2) * s * sqrt(1/n + (x0 - x_bar)^2 / Sxx)`,
/// returned as a closed polygon (upper edge forward, lower edge reversed).
fn trend_overlay(frame: &AnalysisFrame, x_lo: f64, x_hi: f64) -> Option<TrendOverlay> {
    let fit = fit_linear(&frame.x, &frame.y).ok()?;
    let t_crit = t_critical(&fit)?;

    let n = fit.n as f64;
    let x_mean = frame.x.iter().sum::<f64>() / n;
    let sxx: f64 = frame.x.iter().map(|&x| (x - x_mean) * (x - x_mean)).sum();

    let step = (x_hi - x_lo) / TREND_SAMPLES as f64;
    let mut line = Vec::with_capacity(TREND_SAMPLES + 1);
    let mut upper = Vec::with_capacity(TREND_SAMPLES + 1);
    let mut lower = Vec::with_capacity(TREND_SAMPLES + 1);

    for i in 0..=TREND_SAMPLES {
        let x0 = x_lo + step * i as f64;
        let y_hat = fit.intercept + fit.slope * x0;
        let se_mean =
            fit.residual_std_error * (1.0 / n + (x0 - x_mean) * (x0 - x_mean) / sxx).sqrt();

        line.push((x0, y_hat));
        upper.push((x0, y_hat + t_crit * se_mean));
        lower.push((x0, y_hat - t_crit * se_mean));
    }

    lower.reverse();
    let mut band = upper;
    band.extend(lower);

    Some(TrendOverlay { line, band })
}

/// Two-sided 95% critical value of the fit's t distribution
fn t_critical(fit: &RegressionResult) -> Option<f64> {
    let t_dist = StudentsT::new(0.0, 1.0, (fit.n - 2) as f64).ok()?;
    Some(t_dist.inverse_cdf(0.975))
}

/// Counts values into `bins` equal-width bins spanning the column range
///
/// A zero-width range (all values equal) is widened by half a unit on each
/// side so every value still lands in a bin. The final bin includes the
/// column maximum.
pub fn histogram_counts(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (lo, hi) = if min < max {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &value in values {
        let index = (((value - lo) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            left: lo + width * i as f64,
            right: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Axis range padded by 5% of the data span on each side
fn padded_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { 1.0 };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame(n: usize) -> AnalysisFrame {
        AnalysisFrame {
            countries: (0..n).map(|i| format!("Country {i}")).collect(),
            x: (0..n).map(|i| i as f64).collect(),
            y: (0..n).map(|i| (i as f64) * 2.0 + 1.0).collect(),
        }
    }

    #[test]
    fn test_histogram_counts_even_spread() {
        let values: Vec<f64> = (0..15).map(|i| i as f64).collect();
        let histogram = histogram_counts(&values, 15);

        assert_eq!(histogram.len(), 15);
        assert!(histogram.iter().all(|bin| bin.count == 1));
        assert_eq!(histogram[0].left, 0.0);
        assert!((histogram[14].right - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_counts_total_matches_input() {
        let values = vec![0.4, 0.4, 1.9, 3.3, 7.7, 7.7, 7.7, 9.9];
        let histogram = histogram_counts(&values, 5);

        let total: usize = histogram.iter().map(|bin| bin.count).sum();
        assert_eq!(total, values.len());
    }

    #[test]
    fn test_histogram_counts_maximum_lands_in_last_bin() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let histogram = histogram_counts(&values, 4);

        assert_eq!(histogram[3].count, 2); // 4.0 and 5.0
    }

    #[test]
    fn test_histogram_counts_single_distinct_value() {
        let values = vec![3.0; 7];
        let histogram = histogram_counts(&values, 15);

        let total: usize = histogram.iter().map(|bin| bin.count).sum();
        assert_eq!(total, 7);
        assert!(histogram[0].left < 3.0 && histogram[14].right > 3.0);
    }

    #[test]
    fn test_padded_range_widens_span() {
        let (lo, hi) = padded_range(&[10.0, 20.0]);
        assert!(lo < 10.0 && hi > 20.0);

        // Degenerate span still produces a usable axis
        let (lo, hi) = padded_range(&[5.0, 5.0]);
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn test_geometry_pixel_size() {
        let geometry = PlotGeometry::default();
        assert_eq!(geometry.pixel_size(), (2100, 1500));
    }

    #[test]
    fn test_empty_frame_is_rejected() {
        let frame = sample_frame(0);
        let temp_dir = std::env::temp_dir();

        let result = create_scatter_plot(&frame, PlotGeometry::default(), &temp_dir);
        assert!(matches!(result, Err(PlotError::EmptyFrame)));

        let result = create_histogram_plot(&frame, 15, PlotGeometry::default(), &temp_dir);
        assert!(matches!(result, Err(PlotError::EmptyFrame)));
    }

    #[test]
    fn test_trend_overlay_needs_three_points() {
        let frame = sample_frame(2);
        assert!(trend_overlay(&frame, 0.0, 1.0).is_none());

        let frame = sample_frame(10);
        let overlay = trend_overlay(&frame, 0.0, 9.0).unwrap();
        assert_eq!(overlay.line.len(), TREND_SAMPLES + 1);
        assert_eq!(overlay.band.len(), 2 * (TREND_SAMPLES + 1));
    }

    #[test]
    fn test_trend_band_encloses_line() {
        let frame = AnalysisFrame {
            countries: vec!["A".into(), "B".into(), "C".into(), "D".into(), "E".into()],
            x: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            y: vec![2.0, 1.0, 4.0, 3.0, 5.0],
        };
        let overlay = trend_overlay(&frame, 1.0, 5.0).unwrap();

        // Upper edge comes first in the polygon and sits above the line
        for (i, &(x, y_hat)) in overlay.line.iter().enumerate() {
            let (bx, upper) = overlay.band[i];
            assert_eq!(bx, x);
            assert!(upper >= y_hat);
        }
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn test_create_scatter_plot_success() {
        let temp_dir = tempfile::tempdir().unwrap();
        let frame = sample_frame(10);

        let result = create_scatter_plot(&frame, PlotGeometry::default(), temp_dir.path());
        assert!(result.is_ok());
        assert!(temp_dir.path().join(SCATTER_FILE_NAME).exists());
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn test_create_histogram_plot_success() {
        let temp_dir = tempfile::tempdir().unwrap();
        let frame = sample_frame(10);

        let result = create_histogram_plot(&frame, 15, PlotGeometry::default(), temp_dir.path());
        assert!(result.is_ok());
        assert!(temp_dir.path().join(HISTOGRAM_FILE_NAME).exists());
    }
}
