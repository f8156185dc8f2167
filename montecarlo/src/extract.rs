use crate::correlation::Correlogram;

/// Statistics of one realization.
///
/// A coefficient slot is `None` when the lag routine failed for this
/// realization; mean and variance are always present.
#[derive(Debug, Clone, PartialEq)]
pub struct RepetitionResult {
    pub mean: f64,
    pub variance: f64,
    pub coefficients: Vec<Option<f64>>,
}

impl RepetitionResult {
    /// True when the lag routine failed for this realization
    pub fn is_degraded(&self) -> bool {
        self.coefficients.iter().all(Option::is_none)
    }
}

/// Computes mean, population variance and the first `max_lag`
/// dependence coefficients of a realization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsExtractor {
    estimator: Correlogram,
    max_lag: usize,
}

impl StatisticsExtractor {
    pub fn new(estimator: Correlogram, max_lag: usize) -> Self {
        StatisticsExtractor { estimator, max_lag }
    }

    pub fn estimator(&self) -> Correlogram {
        self.estimator
    }

    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    pub fn extract(&self, data: &[f64]) -> RepetitionResult {
        let (mean, variance) = moments(data);

        let coefficients = match self.estimator.coefficients(data, self.max_lag) {
            Ok(values) => values.into_iter().map(Some).collect(),
            Err(e) => {
                tracing::debug!(
                    estimator = %self.estimator,
                    n = data.len(),
                    error = %e,
                    "coefficient extraction failed, recording missing values"
                );
                vec![None; self.max_lag]
            }
        };

        RepetitionResult {
            mean,
            variance,
            coefficients,
        }
    }
}

/// Mean and population variance (divide by n). NaN for an empty slice.
pub fn moments(data: &[f64]) -> (f64, f64) {
    if data.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn population_variance() {
        let (mean, variance) = moments(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(mean, 5.0);
        assert_relative_eq!(variance, 4.0);
    }

    #[test]
    fn extracts_requested_lags() {
        let data: Vec<f64> = (0..60).map(|i| (i as f64 * 0.3).sin()).collect();
        let result = StatisticsExtractor::new(Correlogram::Acf, 5).extract(&data);
        assert_eq!(result.coefficients.len(), 5);
        assert!(result.coefficients.iter().all(Option::is_some));
        assert!(!result.is_degraded());
    }

    #[test]
    fn failure_keeps_moments() {
        // Too short for five partial autocorrelations
        let data = [1.0, 2.5, 0.5, 3.0];
        let result = StatisticsExtractor::new(Correlogram::Pacf, 5).extract(&data);
        assert_relative_eq!(result.mean, 1.75);
        assert_relative_eq!(result.variance, 1.0625);
        assert_eq!(result.coefficients, vec![None; 5]);
        assert!(result.is_degraded());
    }

    #[test]
    fn constant_realization_degrades() {
        let result = StatisticsExtractor::new(Correlogram::Acf, 3).extract(&[2.0; 30]);
        assert_relative_eq!(result.mean, 2.0);
        assert_relative_eq!(result.variance, 0.0);
        assert!(result.is_degraded());
    }
}
