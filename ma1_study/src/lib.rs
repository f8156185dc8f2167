//! Finite-sample behaviour of the MA(1) model: sample mean, variance and
//! partial autocorrelations against population values.

pub mod process;

pub use process::Ma1Process;

use montecarlo::{
    Correlogram, ExperimentGrid, ModelConfig, OutputSettings, ReferenceConfig, StatisticsConfig,
    StudyConfig,
};

/// Suggested export file for the default study
pub const DEFAULT_EXPORT: &str = "resultats_simulations_MA1_PACF.csv";

/// θ = 1, β = 0.5, σ = 1; n = 50, 100, ..., 500; 100 000 repetitions;
/// PACF at lags 1..=5 with the theoretical PACF approximated on one
/// realization of 100 000 values. Export is off by default.
pub fn default_config() -> StudyConfig {
    StudyConfig {
        model: ModelConfig::new(1.0, 0.5, 1.0),
        grid: ExperimentGrid::stepped(50, 500, 50, 100_000),
        statistics: StatisticsConfig {
            estimator: Correlogram::Pacf,
            max_lag: 5,
        },
        reference: ReferenceConfig {
            sample_size: 100_000,
            seed: None,
        },
        output: OutputSettings::default(),
    }
}
