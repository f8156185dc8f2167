//! Study configuration
//!
//! A study is described by five TOML sections:
//!
//! ```toml
//! [model]
//! constant = 1.0
//! coefficient = 0.5
//! noise_std = 1.0
//!
//! [grid]
//! sample_sizes = [50, 100, 150]
//! repetitions = 100000
//! seed = 42
//!
//! [statistics]
//! estimator = "acf"
//! max_lag = 5
//!
//! [reference]
//! sample_size = 100000
//!
//! [output]
//! csv_path = "results.csv"
//! ```
//!
//! Everything except `[model]` and `[grid]` may be omitted.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::correlation::Correlogram;
use crate::error::StudyError;

/// Parameters of a first-order model: constant, dependence coefficient and
/// noise standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Constant term (theta)
    pub constant: f64,
    /// AR or MA coefficient
    pub coefficient: f64,
    /// Standard deviation of the Gaussian white noise
    pub noise_std: f64,
}

impl ModelConfig {
    pub fn new(constant: f64, coefficient: f64, noise_std: f64) -> Self {
        ModelConfig {
            constant,
            coefficient,
            noise_std,
        }
    }

    /// Check that every parameter is finite and the noise scale is non-negative
    pub fn validate(&self) -> Result<(), StudyError> {
        for (name, value) in [
            ("constant", self.constant),
            ("coefficient", self.coefficient),
            ("noise_std", self.noise_std),
        ] {
            if !value.is_finite() {
                return Err(StudyError::InvalidModel(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        if self.noise_std < 0.0 {
            return Err(StudyError::InvalidModel(format!(
                "noise_std must be non-negative, got {}",
                self.noise_std
            )));
        }
        Ok(())
    }

    /// Additionally require |coefficient| < 1, the AR(1) stationarity condition
    pub fn validate_stationary(&self) -> Result<(), StudyError> {
        self.validate()?;
        if self.coefficient.abs() >= 1.0 {
            return Err(StudyError::InvalidModel(format!(
                "AR(1) coefficient must satisfy |coefficient| < 1 for stationarity, got {}",
                self.coefficient
            )));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            constant: 1.0,
            coefficient: 0.5,
            noise_std: 1.0,
        }
    }
}

/// Sample sizes to evaluate, repetitions per size and the base seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentGrid {
    /// Strictly increasing sample sizes
    pub sample_sizes: Vec<usize>,
    /// Independent realizations per sample size
    pub repetitions: usize,
    /// Base seed from which every repetition's stream is derived
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    42
}

impl ExperimentGrid {
    pub fn new(sample_sizes: Vec<usize>, repetitions: usize, seed: u64) -> Self {
        ExperimentGrid {
            sample_sizes,
            repetitions,
            seed,
        }
    }

    /// Sizes `start, start + step, ..., <= end`
    pub fn stepped(start: usize, end: usize, step: usize, repetitions: usize) -> Self {
        let sample_sizes = (start..=end).step_by(step.max(1)).collect();
        ExperimentGrid::new(sample_sizes, repetitions, default_seed())
    }

    pub fn validate(&self) -> Result<(), StudyError> {
        if self.sample_sizes.is_empty() {
            return Err(StudyError::InvalidGrid(
                "at least one sample size is required".to_string(),
            ));
        }
        if self.sample_sizes.contains(&0) {
            return Err(StudyError::InvalidGrid(
                "sample sizes must be positive".to_string(),
            ));
        }
        if self.sample_sizes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(StudyError::InvalidGrid(format!(
                "sample sizes must be strictly increasing, got {:?}",
                self.sample_sizes
            )));
        }
        if self.repetitions == 0 {
            return Err(StudyError::InvalidGrid(
                "repetitions must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExperimentGrid {
    fn default() -> Self {
        ExperimentGrid::stepped(50, 500, 50, 100_000)
    }
}

/// Which coefficients to extract and how many lags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsConfig {
    pub estimator: Correlogram,
    pub max_lag: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        StatisticsConfig {
            estimator: Correlogram::Acf,
            max_lag: 5,
        }
    }
}

/// Settings for the theoretical row when it has to be approximated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Length of the single large realization used as a population proxy
    pub sample_size: usize,
    /// Seed of that realization; derived from the grid seed when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        ReferenceConfig {
            sample_size: 100_000,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Write the final table here when set
    #[serde(default)]
    pub csv_path: Option<PathBuf>,
    /// Size of a dedicated worker pool; rayon's global pool when absent
    #[serde(default)]
    pub num_threads: Option<usize>,
}

/// Complete description of one study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    pub model: ModelConfig,
    pub grid: ExperimentGrid,
    #[serde(default)]
    pub statistics: StatisticsConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub output: OutputSettings,
}

impl StudyConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, StudyError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, StudyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Checks shared by every model; model-specific preconditions are
    /// enforced when the process is built.
    pub fn validate(&self) -> Result<(), StudyError> {
        self.model.validate()?;
        self.grid.validate()?;
        if self.statistics.max_lag == 0 {
            return Err(StudyError::InvalidGrid(
                "max_lag must be at least 1".to_string(),
            ));
        }
        if self.reference.sample_size == 0 {
            return Err(StudyError::InvalidGrid(
                "reference sample_size must be positive".to_string(),
            ));
        }
        if self.output.num_threads == Some(0) {
            return Err(StudyError::InvalidGrid(
                "num_threads must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_matches_study_layout() {
        let grid = ExperimentGrid::default();
        assert_eq!(
            grid.sample_sizes,
            vec![50, 100, 150, 200, 250, 300, 350, 400, 450, 500]
        );
        assert_eq!(grid.repetitions, 100_000);
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn stationarity_is_enforced() {
        assert!(ModelConfig::new(1.0, 0.99, 1.0).validate_stationary().is_ok());
        assert!(ModelConfig::new(1.0, 1.0, 1.0).validate_stationary().is_err());
        assert!(ModelConfig::new(1.0, -1.5, 1.0).validate_stationary().is_err());
        // MA-type models only need finite parameters
        assert!(ModelConfig::new(1.0, 1.5, 1.0).validate().is_ok());
    }

    #[test]
    fn rejects_bad_noise() {
        assert!(ModelConfig::new(1.0, 0.5, -1.0).validate().is_err());
        assert!(ModelConfig::new(1.0, 0.5, f64::NAN).validate().is_err());
    }

    #[test]
    fn rejects_bad_grids() {
        assert!(ExperimentGrid::new(vec![], 10, 1).validate().is_err());
        assert!(ExperimentGrid::new(vec![0, 10], 10, 1).validate().is_err());
        assert!(ExperimentGrid::new(vec![100, 50], 10, 1).validate().is_err());
        assert!(ExperimentGrid::new(vec![50, 50], 10, 1).validate().is_err());
        assert!(ExperimentGrid::new(vec![50, 100], 0, 1).validate().is_err());
    }

    #[test]
    fn parses_minimal_toml() {
        let config = StudyConfig::from_toml_str(
            r#"
            [model]
            constant = 1.0
            coefficient = 0.5
            noise_std = 1.0

            [grid]
            sample_sizes = [50, 100]
            repetitions = 200
            "#,
        )
        .unwrap();

        assert_eq!(config.grid.seed, 42);
        assert_eq!(config.statistics, StatisticsConfig::default());
        assert_eq!(config.reference.sample_size, 100_000);
        assert_eq!(config.output.csv_path, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_full_toml() {
        let config = StudyConfig::from_toml_str(
            r#"
            [model]
            constant = 0.0
            coefficient = -0.3
            noise_std = 2.0

            [grid]
            sample_sizes = [20, 40]
            repetitions = 10
            seed = 7

            [statistics]
            estimator = "pacf"
            max_lag = 3

            [reference]
            sample_size = 5000
            seed = 99

            [output]
            csv_path = "out.csv"
            num_threads = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.statistics.estimator, Correlogram::Pacf);
        assert_eq!(config.statistics.max_lag, 3);
        assert_eq!(config.reference.seed, Some(99));
        assert_eq!(config.output.csv_path, Some(PathBuf::from("out.csv")));
        assert_eq!(config.output.num_threads, Some(2));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = StudyConfig::from_toml_str("[model]\nconstant = \"one\"").unwrap_err();
        assert!(matches!(err, StudyError::Config(_)));
    }

    #[test]
    fn zero_lags_rejected() {
        let config = StudyConfig {
            model: ModelConfig::default(),
            grid: ExperimentGrid::new(vec![10], 1, 1),
            statistics: StatisticsConfig {
                estimator: Correlogram::Acf,
                max_lag: 0,
            },
            reference: ReferenceConfig::default(),
            output: OutputSettings::default(),
        };
        assert!(config.validate().is_err());
    }
}
