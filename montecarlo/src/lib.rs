//! Monte Carlo engine for finite-sample studies of simple time-series models.
//!
//! A [`Process`] generates realizations and supplies its theoretical
//! statistics; the [`ExperimentRunner`] repeats generation and
//! [`StatisticsExtractor`] extraction over a grid of sample sizes and reduces
//! the results into a [`ResultsTable`].

pub mod config;
pub mod correlation;
pub mod error;
pub mod extract;
pub mod logging;
pub mod process;
pub mod runner;
pub mod table;

pub use config::{
    ExperimentGrid, ModelConfig, OutputSettings, ReferenceConfig, StatisticsConfig, StudyConfig,
};
pub use correlation::Correlogram;
pub use error::{CorrelationError, StudyError};
pub use extract::{RepetitionResult, StatisticsExtractor};
pub use process::{large_sample_coefficients, Process, Reference, ReferenceBasis};
pub use runner::{table_progress_reporter, ExperimentRunner, Progress};
pub use table::{Accumulator, ResultsTable, SampleSizeRow, THEORETICAL_LABEL};
