//! End-to-end AR(1) studies with small repetition counts.

use approx::assert_relative_eq;
use ar1_study::{default_config, study_title, Ar1Process};
use montecarlo::{
    Correlogram, ExperimentGrid, ExperimentRunner, ModelConfig, StatisticsConfig, StudyError,
};

fn acf_runner(
    constant: f64,
    coefficient: f64,
    sizes: Vec<usize>,
    repetitions: usize,
    seed: u64,
) -> ExperimentRunner<Ar1Process> {
    let ar = Ar1Process::new(ModelConfig::new(constant, coefficient, 1.0)).unwrap();
    ExperimentRunner::new(
        ar,
        ExperimentGrid::new(sizes, repetitions, seed),
        StatisticsConfig {
            estimator: Correlogram::Acf,
            max_lag: 5,
        },
    )
}

#[test]
fn reduced_row_approaches_population_values() {
    let table = acf_runner(1.0, 0.5, vec![500], 1000, 42).run().unwrap();
    let row = table.get(500).unwrap();

    let mean = row.mean.unwrap();
    let variance = row.variance.unwrap();
    let acf1 = row.coefficients[0].unwrap();

    assert!((mean - 2.0).abs() <= 0.1, "mean {} not near 2.0", mean);
    assert!(
        (variance - 4.0 / 3.0).abs() <= 0.2,
        "variance {} not near 1.333",
        variance
    );
    assert!((acf1 - 0.5).abs() <= 0.1, "acf(1) {} not near 0.5", acf1);
}

#[test]
fn theoretical_row_is_exact() {
    let table = acf_runner(1.0, 0.5, vec![50], 10, 1).run().unwrap();
    let theoretical = table.theoretical();

    assert_eq!(theoretical.mean, Some(2.0));
    assert_eq!(theoretical.variance, Some(1.33));
    assert_eq!(
        theoretical.coefficients,
        vec![Some(0.5), Some(0.25), Some(0.12), Some(0.06), Some(0.03)]
    );
}

#[test]
fn zero_coefficient_has_no_lag_one_correlation() {
    let table = acf_runner(1.0, 0.0, vec![100], 500, 3).run().unwrap();
    let acf1 = table.get(100).unwrap().coefficients[0].unwrap();
    assert!(acf1.abs() <= 0.05, "acf(1) {} should be near 0", acf1);
}

#[test]
fn mean_converges_as_sample_size_grows() {
    let table = acf_runner(1.0, 0.5, vec![50, 500], 400, 11).run().unwrap();

    let small = table.get(50).unwrap().mean.unwrap();
    let large = table.get(500).unwrap().mean.unwrap();

    assert!((small - 2.0).abs() <= 0.1, "n = 50 mean {}", small);
    assert!((large - 2.0).abs() <= 0.05, "n = 500 mean {}", large);
}

#[test]
fn variance_bias_shrinks_with_sample_size() {
    // E[s²] ≈ γ0 (1 - (1 + φ) / (n (1 - φ))), so short samples understate it
    let table = acf_runner(1.0, 0.5, vec![20, 400], 1000, 5).run().unwrap();

    let short = table.get(20).unwrap().variance.unwrap();
    let long = table.get(400).unwrap().variance.unwrap();

    assert!(short < long);
    assert!((long - 4.0 / 3.0).abs() <= 0.1);
}

#[test]
fn same_seed_same_table() {
    let first = acf_runner(1.0, 0.5, vec![60, 120], 50, 99).run().unwrap();
    let second = acf_runner(1.0, 0.5, vec![60, 120], 50, 99).run().unwrap();
    assert_eq!(first, second);
}

#[test]
fn non_stationary_model_fails_fast() {
    let err = Ar1Process::new(ModelConfig::new(1.0, 1.05, 1.0)).unwrap_err();
    assert!(matches!(err, StudyError::InvalidModel(_)));
    assert!(err.to_string().contains("stationarity"));
}

#[test]
fn default_study_constants() {
    let config = default_config();

    assert_eq!(config.model, ModelConfig::new(1.0, 0.5, 1.0));
    assert_eq!(config.grid.sample_sizes.first(), Some(&50));
    assert_eq!(config.grid.sample_sizes.last(), Some(&500));
    assert_eq!(config.grid.sample_sizes.len(), 10);
    assert_eq!(config.grid.repetitions, 100_000);
    assert_eq!(config.statistics.estimator, Correlogram::Acf);
    assert_eq!(config.statistics.max_lag, 5);
    assert!(config.output.csv_path.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn runner_from_default_config_reports_exact_reference() {
    let mut config = default_config();
    config.grid = ExperimentGrid::new(vec![50], 5, 0);

    let runner = ExperimentRunner::from_config(Ar1Process::new(config.model).unwrap(), &config)
        .unwrap();
    let reference = runner.reference();

    assert_relative_eq!(reference.mean, 2.0);
    assert_relative_eq!(reference.coefficients[2].unwrap(), 0.125);
}

#[test]
fn title_follows_configured_estimator() {
    let mut config = default_config();
    assert_eq!(study_title(&config.statistics), "AR(1) Monte Carlo study (ACF)");

    config.statistics.estimator = Correlogram::Pacf;
    assert_eq!(study_title(&config.statistics), "AR(1) Monte Carlo study (PACF)");
}
