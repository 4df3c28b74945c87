//! Weighted descriptive statistics and the Gaussian density.
//!
//! These back the optional shift re-centering of the EM engine, which fits
//! a Gaussian to the marginal shift distribution each iteration.

use std::f64::consts::PI;

/// Weighted arithmetic mean of `values` under `weights`.
///
/// Weights need not be normalized. Panics if the slices differ in length
/// or are empty.
#[must_use]
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    assert_eq!(
        values.len(),
        weights.len(),
        "values and weights must have the same length"
    );
    assert!(!values.is_empty(), "cannot average an empty slice");

    let weight_total: f64 = weights.iter().sum();
    values
        .iter()
        .zip(weights)
        .map(|(value, weight)| value * (weight / weight_total))
        .sum()
}

/// Weighted standard deviation of `values` under `weights`.
///
/// With `biased`, this is the plain square root of the weighted variance
/// `sum((x - mean)^2 * p)` with `p = w / sum(w)`. Otherwise the variance is
/// rescaled by `v1 - v2 / v1` where `v1 = sum(p)` and `v2 = sum(p^2)`,
/// the reliability-weights correction.
///
/// Panics under the same conditions as [`weighted_mean`].
#[must_use]
pub fn weighted_sd(values: &[f64], weights: &[f64], biased: bool) -> f64 {
    let mean = weighted_mean(values, weights);
    let weight_total: f64 = weights.iter().sum();

    let mut variance = 0.0;
    let mut v1 = 0.0;
    let mut v2 = 0.0;
    for (value, weight) in values.iter().zip(weights) {
        let p = weight / weight_total;
        variance += (value - mean).powi(2) * p;
        v1 += p;
        v2 += p * p;
    }

    if biased {
        variance.sqrt()
    } else {
        (variance / (v1 - v2 / v1)).sqrt()
    }
}

/// Density of the normal distribution with the given mean and standard
/// deviation, evaluated at `x`.
#[must_use]
pub fn gaussian_pdf(x: f64, mean: f64, sd: f64) -> f64 {
    (1.0 / (sd * (2.0 * PI).sqrt())) * (-0.5 * ((x - mean) / sd).powi(2)).exp()
}
