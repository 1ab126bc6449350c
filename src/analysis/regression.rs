//! Ordinary least squares regression of Y on X
//!
//! Single-predictor closed-form fit reporting coefficient estimates, standard
//! errors, t statistics, two-sided p-values, R-squared and the residual
//! standard error.

use super::{StatError, StatResult};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Result of fitting Y = intercept + slope * X
#[derive(Debug, Clone)]
pub struct RegressionResult {
    pub intercept: f64,
    pub slope: f64,
    pub intercept_std_err: f64,
    pub slope_std_err: f64,
    pub intercept_t: f64,
    pub slope_t: f64,
    pub intercept_p: f64,
    pub slope_p: f64,
    /// Coefficient of determination; equals r-squared of the two columns
    pub r_squared: f64,
    /// Residual standard error with n - 2 degrees of freedom
    pub residual_std_error: f64,
    /// Number of observations
    pub n: usize,
}

/// Fit a simple linear regression by least squares
///
/// # Arguments
/// * `x` - Predictor values
/// * `y` - Response values, paired with `x` by index
///
/// # Returns
/// * `Ok(RegressionResult)` - Estimates with full inference
/// * `Err(StatError)` - Fewer than 3 observations, length mismatch, or a
///   zero-variance column
pub fn fit_linear(x: &[f64], y: &[f64]) -> StatResult<RegressionResult> {
    if x.len() != y.len() {
        return Err(StatError::DimensionMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }

    let n = x.len();
    if n < 3 {
        return Err(StatError::InsufficientData { needed: 3, got: n });
    }

    let an = n as f64;
    let x_mean = x.iter().sum::<f64>() / an;
    let y_mean = y.iter().sum::<f64>() / an;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    // A constant predictor leaves the slope undefined; a constant response
    // leaves R-squared undefined
    if sxx == 0.0 || syy == 0.0 {
        return Err(StatError::ConstantData);
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    // Residual sum of squares; rounding can push it a hair below zero for
    // exact fits
    let sse = (syy - slope * sxy).max(0.0);
    let df = (n - 2) as f64;
    let sigma2 = sse / df;
    let residual_std_error = sigma2.sqrt();

    let slope_std_err = (sigma2 / sxx).sqrt();
    let intercept_std_err = (sigma2 * (1.0 / an + x_mean * x_mean / sxx)).sqrt();

    let t_dist = StudentsT::new(0.0, 1.0, df).map_err(|e| StatError::Numeric(e.to_string()))?;
    let (slope_t, slope_p) = t_and_p(slope, slope_std_err, &t_dist);
    let (intercept_t, intercept_p) = t_and_p(intercept, intercept_std_err, &t_dist);

    let r_squared = 1.0 - sse / syy;

    Ok(RegressionResult {
        intercept,
        slope,
        intercept_std_err,
        slope_std_err,
        intercept_t,
        slope_t,
        intercept_p,
        slope_p,
        r_squared,
        residual_std_error,
        n,
    })
}

/// t statistic and two-sided p-value for one coefficient
fn t_and_p(estimate: f64, std_err: f64, t_dist: &StudentsT) -> (f64, f64) {
    if std_err == 0.0 {
        // Exact fit: the estimate is infinitely many standard errors from zero
        let t = if estimate == 0.0 {
            0.0
        } else {
            f64::INFINITY.copysign(estimate)
        };
        let p = if estimate == 0.0 { 1.0 } else { 0.0 };
        return (t, p);
    }

    let t = estimate / std_err;
    let p = (2.0 * (1.0 - t_dist.cdf(t.abs()))).clamp(0.0, 1.0);
    (t, p)
}
