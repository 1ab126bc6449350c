//! Descriptive summary statistics
//!
//! Five-number-plus-mean summaries of a numeric column. Quartiles use the
//! R-7 linear interpolation method (Hyndman & Fan 1996), matching the default
//! in R and NumPy.

/// Five-number-plus-mean summary of one numeric column
///
/// Derived once from the analysis frame and never mutated. An empty column
/// yields an all-NaN summary so the pipeline stays total.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub mean: f64,
    pub q3: f64,
    pub max: f64,
}

impl ColumnSummary {
    fn all_nan() -> Self {
        Self {
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            mean: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Summarize a numeric column
///
/// # Arguments
/// * `values` - Column values; finite numbers per the frame invariant
///
/// # Returns
/// The column's min, Q1, median, mean, Q3 and max. All fields are NaN when
/// the input is empty.
pub fn summarize(values: &[f64]) -> ColumnSummary {
    if values.is_empty() {
        return ColumnSummary::all_nan();
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let mean = values.iter().sum::<f64>() / values.len() as f64;

    ColumnSummary {
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        mean,
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    }
}

/// R-7 quantile of pre-sorted data
///
/// For sorted data `x[0..n]` and `p` in `[0, 1]`: `h = (n - 1) * p`, then
/// linear interpolation between `x[floor(h)]` and `x[floor(h) + 1]`.
/// The caller guarantees `sorted` is non-empty and non-decreasing.
pub(crate) fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();

    if j + 1 >= n {
        sorted[n - 1]
    } else {
        (1.0 - g) * sorted[j] + g * sorted[j + 1]
    }
}
