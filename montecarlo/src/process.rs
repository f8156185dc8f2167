use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ReferenceConfig, StatisticsConfig};
use crate::correlation::Correlogram;
use crate::table::{round2, SampleSizeRow};

/// A univariate model that can be simulated and that knows its own
/// population statistics.
///
/// `generate` must be a deterministic function of the draws taken from
/// `rng`, so that a seeded stream reproduces the same realization.
pub trait Process: Sync {
    /// Short model name used in logs, e.g. "AR(1)"
    fn name(&self) -> &str;

    /// One realization of exactly `n` values
    fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64>;

    /// Population mean, variance and dependence coefficients at lags
    /// `1..=statistics.max_lag`.
    ///
    /// `seed` feeds any simulation the model needs when a coefficient has
    /// no closed form.
    fn reference(
        &self,
        statistics: &StatisticsConfig,
        reference: &ReferenceConfig,
        seed: u64,
    ) -> Reference;
}

/// How the coefficient part of a [`Reference`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceBasis {
    /// Closed-form population values
    Exact,
    /// Estimated on one long realization; a proxy, not a population value
    Approximate { sample_size: usize },
}

impl std::fmt::Display for ReferenceBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceBasis::Exact => write!(f, "exact"),
            ReferenceBasis::Approximate { sample_size } => {
                write!(f, "approximated on one realization of length {}", sample_size)
            }
        }
    }
}

/// Theoretical values for the comparison row.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub mean: f64,
    pub variance: f64,
    pub coefficients: Vec<Option<f64>>,
    pub basis: ReferenceBasis,
}

impl Reference {
    /// Rounded the same way as the simulated rows
    pub fn to_row(&self) -> SampleSizeRow {
        SampleSizeRow {
            mean: Some(round2(self.mean)),
            variance: Some(round2(self.variance)),
            coefficients: self
                .coefficients
                .iter()
                .map(|c| c.map(round2))
                .collect(),
        }
    }
}

/// Coefficients of one long seeded realization of `process`.
///
/// Slots are missing when the estimator rejects the realization.
pub fn large_sample_coefficients<P: Process>(
    process: &P,
    estimator: Correlogram,
    max_lag: usize,
    sample_size: usize,
    seed: u64,
) -> Vec<Option<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let realization = process.generate(sample_size, &mut rng);
    match estimator.coefficients(&realization, max_lag) {
        Ok(values) => values.into_iter().map(Some).collect(),
        Err(e) => {
            tracing::warn!(
                process = process.name(),
                sample_size,
                error = %e,
                "large-sample reference coefficients unavailable"
            );
            vec![None; max_lag]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alternating;

    impl Process for Alternating {
        fn name(&self) -> &str {
            "alternating"
        }

        fn generate<R: Rng + ?Sized>(&self, n: usize, _rng: &mut R) -> Vec<f64> {
            (0..n).map(|t| if t % 2 == 0 { 1.0 } else { -1.0 }).collect()
        }

        fn reference(
            &self,
            statistics: &StatisticsConfig,
            reference: &ReferenceConfig,
            seed: u64,
        ) -> Reference {
            Reference {
                mean: 0.0,
                variance: 1.0,
                coefficients: large_sample_coefficients(
                    self,
                    statistics.estimator,
                    statistics.max_lag,
                    reference.sample_size,
                    seed,
                ),
                basis: ReferenceBasis::Approximate {
                    sample_size: reference.sample_size,
                },
            }
        }
    }

    #[test]
    fn large_sample_proxy_runs_estimator() {
        let coeffs = large_sample_coefficients(&Alternating, Correlogram::Acf, 2, 1000, 0);
        assert!((coeffs[0].unwrap() + 1.0).abs() < 0.01);
        assert!((coeffs[1].unwrap() - 1.0).abs() < 0.01);
    }

    #[test]
    fn large_sample_proxy_degrades_when_too_short() {
        let coeffs = large_sample_coefficients(&Alternating, Correlogram::Pacf, 5, 6, 0);
        assert_eq!(coeffs, vec![None; 5]);
    }

    #[test]
    fn reference_row_is_rounded() {
        let reference = Reference {
            mean: 2.0,
            variance: 4.0 / 3.0,
            coefficients: vec![Some(0.5), Some(0.125), None],
            basis: ReferenceBasis::Exact,
        };
        let row = reference.to_row();
        assert_eq!(row.mean, Some(2.0));
        assert_eq!(row.variance, Some(1.33));
        assert_eq!(row.coefficients, vec![Some(0.5), Some(0.12), None]);
    }

    #[test]
    fn basis_describes_approximation() {
        let basis = ReferenceBasis::Approximate {
            sample_size: 100_000,
        };
        assert_eq!(
            basis.to_string(),
            "approximated on one realization of length 100000"
        );
    }
}
