use montecarlo::{
    Correlogram, ModelConfig, Process, Reference, ReferenceBasis, ReferenceConfig,
    StatisticsConfig, StudyError,
};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// AR(1) process started from its stationary distribution
///
///   y(0) ~ N(c / (1 - φ), σ² / (1 - φ²))
///   y(t) = c + φ × y(t-1) + ε(t),   ε(t) ~ N(0, σ²)
///
/// Requires |φ| < 1.
#[derive(Debug, Clone)]
pub struct Ar1Process {
    params: ModelConfig,
    noise: Normal<f64>,
    stationary: Normal<f64>,
}

impl Ar1Process {
    /// Fails when the parameters are not finite or |φ| >= 1
    pub fn new(params: ModelConfig) -> Result<Self, StudyError> {
        params.validate_stationary()?;
        let noise = Normal::new(0.0, params.noise_std)?;
        let stationary = Normal::new(
            stationary_mean(&params),
            stationary_variance(&params).sqrt(),
        )?;
        Ok(Ar1Process {
            params,
            noise,
            stationary,
        })
    }

    /// c / (1 - φ)
    pub fn stationary_mean(&self) -> f64 {
        stationary_mean(&self.params)
    }

    /// σ² / (1 - φ²)
    pub fn stationary_variance(&self) -> f64 {
        stationary_variance(&self.params)
    }

    /// φ^k for k = 1..=max_lag
    pub fn autocorrelations(&self, max_lag: usize) -> Vec<f64> {
        (1..=max_lag)
            .map(|k| self.params.coefficient.powi(k as i32))
            .collect()
    }

    /// φ at lag 1, zero beyond
    pub fn partial_autocorrelations(&self, max_lag: usize) -> Vec<f64> {
        (1..=max_lag)
            .map(|k| if k == 1 { self.params.coefficient } else { 0.0 })
            .collect()
    }
}

fn stationary_mean(params: &ModelConfig) -> f64 {
    params.constant / (1.0 - params.coefficient)
}

fn stationary_variance(params: &ModelConfig) -> f64 {
    params.noise_std.powi(2) / (1.0 - params.coefficient.powi(2))
}

impl Process for Ar1Process {
    fn name(&self) -> &str {
        "AR(1)"
    }

    fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        if n == 0 {
            return Vec::new();
        }

        // The whole noise vector is drawn first; ε(0) is unused because y(0)
        // comes from the stationary distribution.
        let epsilon: Vec<f64> = (0..n).map(|_| self.noise.sample(&mut *rng)).collect();

        let mut y = Vec::with_capacity(n);
        let mut prev = self.stationary.sample(&mut *rng);
        y.push(prev);
        for eps in &epsilon[1..] {
            prev = self.params.constant + self.params.coefficient * prev + eps;
            y.push(prev);
        }
        y
    }

    fn reference(
        &self,
        statistics: &StatisticsConfig,
        _reference: &ReferenceConfig,
        _seed: u64,
    ) -> Reference {
        let coefficients = match statistics.estimator {
            Correlogram::Acf => self.autocorrelations(statistics.max_lag),
            Correlogram::Pacf => self.partial_autocorrelations(statistics.max_lag),
        };

        Reference {
            mean: self.stationary_mean(),
            variance: self.stationary_variance(),
            coefficients: coefficients.into_iter().map(Some).collect(),
            basis: ReferenceBasis::Exact,
        }
    }
}
