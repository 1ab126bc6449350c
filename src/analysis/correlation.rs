//! Pearson product-moment correlation test
//!
//! Computes the coefficient r, a two-sided p-value from the t distribution
//! with n - 2 degrees of freedom, and a confidence interval via the Fisher
//! z-transform.

use super::{StatError, StatResult};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Confidence level used for the Fisher-z interval
const CONFIDENCE_LEVEL: f64 = 0.95;

/// Result of a Pearson correlation test
#[derive(Debug, Clone)]
pub struct CorrelationResult {
    /// Correlation coefficient, in [-1, 1]
    pub r: f64,
    /// t statistic with n - 2 degrees of freedom
    pub statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Confidence interval lower bound (NaN when n < 4)
    pub ci_lower: f64,
    /// Confidence interval upper bound (NaN when n < 4)
    pub ci_upper: f64,
    /// Confidence level of the interval
    pub confidence_level: f64,
    /// Number of paired observations
    pub n: usize,
}

/// Pearson correlation between two equally long numeric vectors
///
/// # Arguments
/// * `x` - First variable
/// * `y` - Second variable, paired with `x` by index
///
/// # Returns
/// * `Ok(CorrelationResult)` - Coefficient, test statistic, p-value and CI
/// * `Err(StatError)` - Fewer than 3 pairs, length mismatch, or zero variance
pub fn pearson(x: &[f64], y: &[f64]) -> StatResult<CorrelationResult> {
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

    if sxx == 0.0 || syy == 0.0 {
        return Err(StatError::ConstantData);
    }

    // Guard against floating-point excursions beyond [-1, 1]
    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);

    let df = (n - 2) as f64;
    let (statistic, p_value) = if 1.0 - r * r <= f64::EPSILON {
        // Perfectly collinear data: the t statistic diverges
        (f64::INFINITY.copysign(r), 0.0)
    } else {
        let t = r * (df / (1.0 - r * r)).sqrt();
        let t_dist =
            StudentsT::new(0.0, 1.0, df).map_err(|e| StatError::Numeric(e.to_string()))?;
        let p = 2.0 * (1.0 - t_dist.cdf(t.abs()));
        (t, p.clamp(0.0, 1.0))
    };

    // Fisher z interval; undefined for n < 4 where the z standard error
    // 1/sqrt(n - 3) has no support
    let (ci_lower, ci_upper) = if n > 3 {
        let normal = Normal::new(0.0, 1.0).map_err(|e| StatError::Numeric(e.to_string()))?;
        let z = r.atanh();
        let half_width =
            normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0) / ((n - 3) as f64).sqrt();
        ((z - half_width).tanh(), (z + half_width).tanh())
    } else {
        (f64::NAN, f64::NAN)
    };

    Ok(CorrelationResult {
        r,
        statistic,
        p_value,
        ci_lower,
        ci_upper,
        confidence_level: CONFIDENCE_LEVEL,
        n,
    })
}
