use std::env;
use std::process;

use ar1_study::{default_config, study_title, Ar1Process, DEFAULT_EXPORT};
use montecarlo::{
    table_progress_reporter, ExperimentRunner, ResultsTable, StudyConfig, StudyError,
};

fn main() {
    montecarlo::logging::init();

    let config = match env::args().nth(1) {
        Some(path) => StudyConfig::from_toml_file(&path).unwrap_or_else(|e| {
            eprintln!("Error loading config {}: {}", path, e);
            process::exit(1);
        }),
        None => default_config(),
    };

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(config: &StudyConfig) -> Result<(), StudyError> {
    println!("========================================");
    println!("{}", study_title(&config.statistics));
    println!("========================================");
    println!(
        "theta = {}, alpha1 = {}, sigma_eps = {}",
        config.model.constant, config.model.coefficient, config.model.noise_std
    );
    println!(
        "{} sample sizes x {} repetitions\n",
        config.grid.sample_sizes.len(),
        config.grid.repetitions
    );

    let ar = Ar1Process::new(config.model)?;
    let runner = ExperimentRunner::from_config(ar, config)?.progress(table_progress_reporter());

    println!("Initial table filled with NaN:");
    println!(
        "{}",
        ResultsTable::new(&config.grid, config.statistics.max_lag)
    );

    let table = runner.run()?;

    println!("\nFinal table with theoretical values:");
    println!("{}", table);

    match &config.output.csv_path {
        Some(path) => {
            table.write_csv(path)?;
            tracing::info!(path = %path.display(), "results exported");
        }
        None => tracing::info!(
            "CSV export disabled; set [output] csv_path (e.g. {})",
            DEFAULT_EXPORT
        ),
    }

    Ok(())
}
