//! Repeated simulation of a [`Process`] over a grid of sample sizes
//!
//! For every sample size, in increasing order, the runner draws
//! `repetitions` independent realizations, extracts their statistics and
//! reduces them into one row of a [`ResultsTable`]. The theoretical row is
//! appended once every sample size is done.
//!
//! # Example
//!
//! ```rust,ignore
//! use montecarlo::{ExperimentRunner, StudyConfig, table_progress_reporter};
//!
//! let table = ExperimentRunner::from_config(process, &config)?
//!     .progress(table_progress_reporter())
//!     .num_threads(8)
//!     .run()?;
//! println!("{}", table);
//! ```
//!
//! # Determinism
//!
//! Each repetition draws from its own `StdRng` seeded with
//! [`repetition_seed`], and the theoretical proxy from [`reference_seed`].
//! Per-repetition results are collected in repetition order and reduced
//! sequentially, so the table is identical for any thread count.
//!
//! # Failures
//!
//! A realization whose coefficients cannot be computed contributes missing
//! coefficients and is otherwise counted normally; the run continues.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::Arc;

use crate::config::{ExperimentGrid, ReferenceConfig, StatisticsConfig, StudyConfig};
use crate::error::StudyError;
use crate::extract::{RepetitionResult, StatisticsExtractor};
use crate::process::{Process, Reference};
use crate::table::{Accumulator, ResultsTable};

const REFERENCE_STREAM: u64 = u64::MAX;

/// Seed of repetition `repetition` at sample size `sample_size`
pub fn repetition_seed(base: u64, sample_size: usize, repetition: usize) -> u64 {
    base ^ ((sample_size as u64) << 32) ^ repetition as u64
}

/// Seed of the long realization behind an approximated theoretical row
pub fn reference_seed(base: u64, reference: &ReferenceConfig) -> u64 {
    reference.seed.unwrap_or(base ^ REFERENCE_STREAM)
}

/// Progress notification, for observability only.
#[derive(Debug)]
pub enum Progress<'a> {
    /// Repetitions for `sample_size` are about to start
    Started {
        sample_size: usize,
        index: usize,
        total: usize,
    },
    /// The row for `sample_size` has been written into `table`
    Completed {
        sample_size: usize,
        index: usize,
        total: usize,
        degraded: usize,
        table: &'a ResultsTable,
    },
}

type ProgressCallback = Arc<dyn Fn(&Progress<'_>) + Send + Sync>;

/// Drives generation, extraction and reduction for one model.
pub struct ExperimentRunner<P: Process> {
    process: P,
    grid: ExperimentGrid,
    statistics: StatisticsConfig,
    reference: ReferenceConfig,
    num_threads: Option<usize>,
    progress_callback: Option<ProgressCallback>,
}

impl<P: Process> ExperimentRunner<P> {
    /// Runner with the default reference settings on rayon's global pool
    pub fn new(process: P, grid: ExperimentGrid, statistics: StatisticsConfig) -> Self {
        ExperimentRunner {
            process,
            grid,
            statistics,
            reference: ReferenceConfig::default(),
            num_threads: None,
            progress_callback: None,
        }
    }

    /// Runner for a validated study configuration
    pub fn from_config(process: P, config: &StudyConfig) -> Result<Self, StudyError> {
        config.validate()?;
        let mut runner = ExperimentRunner::new(process, config.grid.clone(), config.statistics)
            .reference_config(config.reference);
        runner.num_threads = config.output.num_threads;
        Ok(runner)
    }

    /// Length and seed of the realization behind an approximated
    /// theoretical row
    pub fn reference_config(mut self, reference: ReferenceConfig) -> Self {
        self.reference = reference;
        self
    }

    /// Run repetitions on a dedicated pool of `n` workers instead of
    /// rayon's global pool
    pub fn num_threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }

    /// Callback invoked before and after each sample size
    pub fn progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Progress<'_>) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// The simulated model
    pub fn process(&self) -> &P {
        &self.process
    }

    /// Sample sizes, repetitions and base seed
    pub fn grid(&self) -> &ExperimentGrid {
        &self.grid
    }

    /// Extractor for the configured estimator and lag count
    pub fn extractor(&self) -> StatisticsExtractor {
        StatisticsExtractor::new(self.statistics.estimator, self.statistics.max_lag)
    }

    /// All repetitions for one sample size, accumulated in repetition order
    pub fn run_sample_size(&self, sample_size: usize) -> Accumulator {
        let extractor = self.extractor();
        let results: Vec<RepetitionResult> = (0..self.grid.repetitions)
            .into_par_iter()
            .map(|repetition| {
                let seed = repetition_seed(self.grid.seed, sample_size, repetition);
                let mut rng = StdRng::seed_from_u64(seed);
                let realization = self.process.generate(sample_size, &mut rng);
                extractor.extract(&realization)
            })
            .collect();

        let mut acc = Accumulator::new(self.statistics.max_lag);
        for result in results {
            acc.push(result);
        }
        acc
    }

    /// Theoretical values for the configured statistics
    pub fn reference(&self) -> Reference {
        self.process.reference(
            &self.statistics,
            &self.reference,
            reference_seed(self.grid.seed, &self.reference),
        )
    }

    /// Fill a table row by row, then append the theoretical row
    pub fn run(&self) -> Result<ResultsTable, StudyError> {
        self.grid.validate()?;

        let pool = match self.num_threads {
            Some(n) => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
            None => None,
        };

        let total = self.grid.sample_sizes.len();
        let mut table = ResultsTable::new(&self.grid, self.statistics.max_lag);

        tracing::info!(
            process = self.process.name(),
            estimator = %self.statistics.estimator,
            sample_sizes = total,
            repetitions = self.grid.repetitions,
            seed = self.grid.seed,
            "starting experiment"
        );

        for (index, &sample_size) in self.grid.sample_sizes.iter().enumerate() {
            self.notify(&Progress::Started {
                sample_size,
                index,
                total,
            });

            let acc = match &pool {
                Some(pool) => pool.install(|| self.run_sample_size(sample_size)),
                None => self.run_sample_size(sample_size),
            };

            let degraded = acc.degraded_count();
            if degraded > 0 {
                tracing::warn!(
                    sample_size,
                    degraded,
                    "repetitions excluded from coefficient averages"
                );
            }

            table.fill(sample_size, acc.reduce())?;

            self.notify(&Progress::Completed {
                sample_size,
                index,
                total,
                degraded,
                table: &table,
            });
        }

        let reference = self.reference();
        tracing::info!(
            process = self.process.name(),
            basis = %reference.basis,
            "theoretical row computed"
        );
        table.set_theoretical(reference.to_row())?;

        Ok(table)
    }

    fn notify(&self, event: &Progress<'_>) {
        if let Some(ref callback) = self.progress_callback {
            callback(event);
        }
    }
}

/// Logs every event and prints the completed part of the table after each
/// sample size.
pub fn table_progress_reporter() -> impl Fn(&Progress<'_>) + Send + Sync {
    |event: &Progress<'_>| match event {
        Progress::Started {
            sample_size,
            index,
            total,
        } => {
            tracing::info!(sample_size, "simulating sample size {}/{}", index + 1, total);
        }
        Progress::Completed {
            sample_size, table, ..
        } => {
            tracing::info!(sample_size, "row completed");
            println!("Updated for n = {}:", sample_size);
            println!("{}", table.render_completed());
        }
    }
}
