//! Lag-based dependence coefficients.
//!
//! Both estimators return coefficients for lags `1..=max_lag` (lag 0 is
//! always 1 and is not reported).
//!
//! - [`acf`] uses the biased autocovariance (denominator `n` at every lag).
//! - [`pacf`] solves the Yule-Walker equations built from the adjusted
//!   autocovariance (denominator `n - k` at lag `k`) with the
//!   Durbin-Levinson recursion, and refuses lag counts of half the sample
//!   or more.

use serde::{Deserialize, Serialize};

use crate::error::CorrelationError;

const DEGENERATE_TOLERANCE: f64 = 1e-12;

/// Which dependence coefficients a study reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correlogram {
    /// Autocorrelation function.
    Acf,
    /// Partial autocorrelation function.
    Pacf,
}

impl Correlogram {
    /// Coefficients at lags `1..=max_lag`.
    pub fn coefficients(
        &self,
        data: &[f64],
        max_lag: usize,
    ) -> Result<Vec<f64>, CorrelationError> {
        match self {
            Correlogram::Acf => acf(data, max_lag),
            Correlogram::Pacf => pacf(data, max_lag),
        }
    }

    /// Short lowercase name used in logs and headers.
    pub fn label(&self) -> &'static str {
        match self {
            Correlogram::Acf => "acf",
            Correlogram::Pacf => "pacf",
        }
    }
}

impl std::fmt::Display for Correlogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Correlogram::Acf => write!(f, "ACF"),
            Correlogram::Pacf => write!(f, "PACF"),
        }
    }
}

/// Autocorrelation at lags `1..=max_lag`.
pub fn acf(data: &[f64], max_lag: usize) -> Result<Vec<f64>, CorrelationError> {
    let n = check_input(data, max_lag)?;
    if max_lag >= n {
        return Err(CorrelationError::TooManyLags {
            max_lag,
            limit: n - 1,
            n,
        });
    }

    let centered = demean(data);
    let c0 = lagged_sum(&centered, 0) / n as f64;
    if c0 <= 0.0 {
        return Err(CorrelationError::ConstantSequence);
    }

    let coefficients: Vec<f64> = (1..=max_lag)
        .map(|lag| lagged_sum(&centered, lag) / n as f64 / c0)
        .collect();

    ensure_finite(coefficients)
}

/// Partial autocorrelation at lags `1..=max_lag`.
pub fn pacf(data: &[f64], max_lag: usize) -> Result<Vec<f64>, CorrelationError> {
    let n = check_input(data, max_lag)?;
    let limit = n / 2;
    if max_lag >= limit {
        return Err(CorrelationError::TooManyLags {
            max_lag,
            limit: limit.saturating_sub(1),
            n,
        });
    }

    let centered = demean(data);
    let r0 = lagged_sum(&centered, 0) / n as f64;
    if r0 <= 0.0 {
        return Err(CorrelationError::ConstantSequence);
    }

    // rho[k] for k = 0..=max_lag, adjusted autocovariance over r0
    let rho: Vec<f64> = (0..=max_lag)
        .map(|lag| {
            if lag == 0 {
                1.0
            } else {
                lagged_sum(&centered, lag) / (n - lag) as f64 / r0
            }
        })
        .collect();

    let coefficients = durbin_levinson(&rho, max_lag)?;
    ensure_finite(coefficients)
}

/// Durbin-Levinson recursion; `rho[0]` must be 1.
fn durbin_levinson(rho: &[f64], max_lag: usize) -> Result<Vec<f64>, CorrelationError> {
    let mut partial = Vec::with_capacity(max_lag);
    // phi holds phi_{k-1, 1..k-1} at the start of step k
    let mut phi: Vec<f64> = Vec::with_capacity(max_lag);

    for k in 1..=max_lag {
        let mut num = rho[k];
        let mut den = 1.0;
        for j in 1..k {
            num -= phi[j - 1] * rho[k - j];
            den -= phi[j - 1] * rho[j];
        }

        if den.abs() < DEGENERATE_TOLERANCE {
            return Err(CorrelationError::Degenerate { lag: k });
        }

        let phi_kk = num / den;
        let next: Vec<f64> = (1..k)
            .map(|j| phi[j - 1] - phi_kk * phi[k - j - 1])
            .chain(std::iter::once(phi_kk))
            .collect();
        phi = next;
        partial.push(phi_kk);
    }

    Ok(partial)
}

fn check_input(data: &[f64], max_lag: usize) -> Result<usize, CorrelationError> {
    if data.is_empty() {
        return Err(CorrelationError::EmptySequence);
    }
    if max_lag == 0 {
        return Err(CorrelationError::NoLags);
    }
    if data.iter().any(|x| !x.is_finite()) {
        return Err(CorrelationError::NonFinite);
    }
    Ok(data.len())
}

fn demean(data: &[f64]) -> Vec<f64> {
    let m = data.iter().sum::<f64>() / data.len() as f64;
    data.iter().map(|x| x - m).collect()
}

/// Sum of x_t * x_{t-lag} over the overlap.
fn lagged_sum(centered: &[f64], lag: usize) -> f64 {
    centered[lag..]
        .iter()
        .zip(centered.iter())
        .map(|(a, b)| a * b)
        .sum()
}

fn ensure_finite(coefficients: Vec<f64>) -> Result<Vec<f64>, CorrelationError> {
    match coefficients.iter().position(|c| !c.is_finite()) {
        Some(idx) => Err(CorrelationError::Degenerate { lag: idx + 1 }),
        None => Ok(coefficients),
    }
}
