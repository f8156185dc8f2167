//! Finite-sample behaviour of the AR(1) model: sample mean, variance and
//! autocorrelations against their population values.

pub mod process;

pub use process::Ar1Process;

use montecarlo::{
    Correlogram, ExperimentGrid, ModelConfig, OutputSettings, ReferenceConfig, StatisticsConfig,
    StudyConfig,
};

/// Suggested export file for the default study
pub const DEFAULT_EXPORT: &str = "resultats_simulations_AR1.csv";

/// Banner title naming the estimator actually configured
pub fn study_title(statistics: &StatisticsConfig) -> String {
    format!("AR(1) Monte Carlo study ({})", statistics.estimator)
}

/// θ = 1, φ = 0.5, σ = 1; n = 50, 100, ..., 500; 100 000 repetitions;
/// ACF at lags 1..=5. Export is off by default.
pub fn default_config() -> StudyConfig {
    StudyConfig {
        model: ModelConfig::new(1.0, 0.5, 1.0),
        grid: ExperimentGrid::stepped(50, 500, 50, 100_000),
        statistics: StatisticsConfig {
            estimator: Correlogram::Acf,
            max_lag: 5,
        },
        reference: ReferenceConfig::default(),
        output: OutputSettings::default(),
    }
}
