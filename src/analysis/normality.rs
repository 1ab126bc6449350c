//! Shapiro-Wilk normality test
//!
//! Royston's AS R94 approximation: Blom scores with polynomial weight
//! corrections for the W statistic, and the n <= 11 / n >= 12 normalizing
//! transforms for the p-value. The test is only reliable up to a few thousand
//! observations, so larger columns are first reduced to a fixed-seed uniform
//! random subsample, keeping repeated runs byte-identical.

use super::{StatError, StatResult};
use rand::prelude::*;
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_3};

/// Largest column tested directly; larger columns are subsampled to this size
pub const MAX_DIRECT_OBSERVATIONS: usize = 5000;

// AS R94 polynomial coefficients (Royston 1995), constant term first.
const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// 6 / pi, scale of the exact n == 3 p-value
const PI6: f64 = 1.909_859_317_102_744;

/// Result of a normality test on one column
#[derive(Debug, Clone)]
pub struct NormalityResult {
    /// Shapiro-Wilk W statistic, in (0, 1]
    pub statistic: f64,
    /// p-value of the null hypothesis that the sample is normal
    pub p_value: f64,
    /// Number of observations actually tested
    pub n_used: usize,
    /// True when the column was reduced to a seeded subsample first
    pub sampled: bool,
}

/// Test a column for normality, subsampling deterministically when oversized
///
/// Columns with up to [`MAX_DIRECT_OBSERVATIONS`] values are tested directly.
/// Larger columns are reduced to a uniform random sample of that size, drawn
/// without replacement from an [`StdRng`] seeded with `seed`, so two runs with
/// equal seeds test the identical subsample.
///
/// # Arguments
/// * `data` - Column values
/// * `seed` - Seed for the oversized-column subsample
///
/// # Returns
/// * `Ok(NormalityResult)` - W statistic and p-value
/// * `Err(StatError)` - Fewer than 3 observations or identical values
pub fn test_normality(data: &[f64], seed: u64) -> StatResult<NormalityResult> {
    if data.len() <= MAX_DIRECT_OBSERVATIONS {
        return shapiro_wilk(data);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let sample: Vec<f64> = data
        .choose_multiple(&mut rng, MAX_DIRECT_OBSERVATIONS)
        .copied()
        .collect();

    let mut result = shapiro_wilk(&sample)?;
    result.sampled = true;
    Ok(result)
}

/// Shapiro-Wilk test for normality
///
/// Valid for 3 to 5000 observations; use [`test_normality`] for columns that
/// may exceed the upper bound.
pub fn shapiro_wilk(data: &[f64]) -> StatResult<NormalityResult> {
    let n = data.len();
    if n < 3 {
        return Err(StatError::InsufficientData { needed: 3, got: n });
    }
    if n > MAX_DIRECT_OBSERVATIONS {
        return Err(StatError::SampleTooLarge {
            limit: MAX_DIRECT_OBSERVATIONS,
            got: n,
        });
    }

    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let range = sorted[n - 1] - sorted[0];
    if range == 0.0 {
        return Err(StatError::ConstantData);
    }

    let weights = half_weights(n)?;

    // W is the squared correlation between the order statistics and the
    // weights; by antisymmetry only the paired differences contribute
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let denom: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
    let num_root: f64 = weights
        .iter()
        .enumerate()
        .map(|(i, w)| w * (sorted[n - 1 - i] - sorted[i]))
        .sum();
    let w_stat = ((num_root * num_root) / denom).min(1.0);

    let p_value = p_value_for(w_stat, n)?;

    Ok(NormalityResult {
        statistic: w_stat,
        p_value,
        n_used: n,
        sampled: false,
    })
}

/// Positive weight magnitudes for the lower half of the order statistics
///
/// Index 0 carries the weight of the extreme pair. The full weight vector is
/// antisymmetric, so only half is materialized.
fn half_weights(n: usize) -> StatResult<Vec<f64>> {
    let nn2 = n / 2;
    let mut weights = vec![0.0; nn2];

    if n == 3 {
        weights[0] = FRAC_1_SQRT_2;
        return Ok(weights);
    }

    let normal = Normal::new(0.0, 1.0).map_err(|e| StatError::Numeric(e.to_string()))?;
    let an = n as f64;

    // Blom scores of the lower half; negative by construction
    let m: Vec<f64> = (1..=nn2)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25)))
        .collect();
    let summ2: f64 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let w1 = poly(&C1, rsn) - m[0] / ssumm2;
    weights[0] = w1;

    // Rescale the untouched scores so the weight vector keeps unit norm
    let (first_plain, phi) = if n > 5 {
        let w2 = poly(&C2, rsn) - m[1] / ssumm2;
        weights[1] = w2;
        let phi = (summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
            / (1.0 - 2.0 * w1 * w1 - 2.0 * w2 * w2);
        (2, phi)
    } else {
        let phi = (summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * w1 * w1);
        (1, phi)
    };

    let phi_root = phi.sqrt();
    for i in first_plain..nn2 {
        weights[i] = -m[i] / phi_root;
    }

    Ok(weights)
}

/// p-value of a W statistic for sample size n
fn p_value_for(w_stat: f64, n: usize) -> StatResult<f64> {
    if n == 3 {
        // Exact small-sample distribution
        return Ok((PI6 * (w_stat.sqrt().asin() - FRAC_PI_3)).clamp(0.0, 1.0));
    }

    let normal = Normal::new(0.0, 1.0).map_err(|e| StatError::Numeric(e.to_string()))?;
    let an = n as f64;
    let y = (1.0 - w_stat).ln();

    let z = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            // W is at the top of its support; the transform is out of domain
            return Ok(0.0);
        }
        let yy = -(gamma - y).ln();
        (yy - poly(&C3, an)) / poly(&C4, an).exp()
    } else {
        let xx = an.ln();
        (y - poly(&C5, xx)) / poly(&C6, xx).exp()
    };

    Ok((1.0 - normal.cdf(z)).clamp(0.0, 1.0))
}

/// Evaluate a polynomial with coefficients in ascending-power order
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
