use montecarlo::{
    large_sample_coefficients, Correlogram, ModelConfig, Process, Reference, ReferenceBasis,
    ReferenceConfig, StatisticsConfig, StudyError,
};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// MA(1) process
///
///   y(0) = c + ε(0)
///   y(t) = c + ε(t) + θ × ε(t-1),   ε(t) ~ N(0, σ²)
#[derive(Debug, Clone)]
pub struct Ma1Process {
    params: ModelConfig,
    noise: Normal<f64>,
}

impl Ma1Process {
    pub fn new(params: ModelConfig) -> Result<Self, StudyError> {
        params.validate()?;
        let noise = Normal::new(0.0, params.noise_std)?;
        Ok(Ma1Process { params, noise })
    }

    pub fn mean(&self) -> f64 {
        self.params.constant
    }

    /// σ² (1 + θ²)
    pub fn variance(&self) -> f64 {
        self.params.noise_std.powi(2) * (1.0 + self.params.coefficient.powi(2))
    }

    /// θ / (1 + θ²) at lag 1, zero beyond
    pub fn autocorrelations(&self, max_lag: usize) -> Vec<f64> {
        let theta = self.params.coefficient;
        (1..=max_lag)
            .map(|k| if k == 1 { theta / (1.0 + theta * theta) } else { 0.0 })
            .collect()
    }
}

impl Process for Ma1Process {
    fn name(&self) -> &str {
        "MA(1)"
    }

    fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let epsilon: Vec<f64> = (0..n).map(|_| self.noise.sample(&mut *rng)).collect();

        let c = self.params.constant;
        let theta = self.params.coefficient;
        epsilon
            .iter()
            .enumerate()
            .map(|(t, eps)| {
                if t == 0 {
                    c + eps
                } else {
                    c + eps + theta * epsilon[t - 1]
                }
            })
            .collect()
    }

    /// Mean and variance are exact. The ACF is exact too; the PACF has no
    /// simple closed form here and is estimated on one realization of
    /// `reference.sample_size` values, which is only an approximation of the
    /// population quantity.
    fn reference(
        &self,
        statistics: &StatisticsConfig,
        reference: &ReferenceConfig,
        seed: u64,
    ) -> Reference {
        let (coefficients, basis) = match statistics.estimator {
            Correlogram::Acf => (
                self.autocorrelations(statistics.max_lag)
                    .into_iter()
                    .map(Some)
                    .collect(),
                ReferenceBasis::Exact,
            ),
            Correlogram::Pacf => (
                large_sample_coefficients(
                    self,
                    Correlogram::Pacf,
                    statistics.max_lag,
                    reference.sample_size,
                    seed,
                ),
                ReferenceBasis::Approximate {
                    sample_size: reference.sample_size,
                },
            ),
        };

        Reference {
            mean: self.mean(),
            variance: self.variance(),
            coefficients,
            basis,
        }
    }
}
