//! Error types for the montecarlo crate.

/// Failure of the lag-coefficient routines in [`crate::correlation`].
///
/// These never abort an experiment: the extractor turns them into missing
/// coefficients for the offending repetition only.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CorrelationError {
    /// Returned when the sequence is empty.
    #[error("sequence is empty")]
    EmptySequence,

    /// Returned when zero lags are requested.
    #[error("at least one lag must be requested")]
    NoLags,

    /// Returned when the sequence is too short for the requested lag count.
    #[error("too many lags: {max_lag} requested, at most {limit} allowed for {n} observations")]
    TooManyLags {
        /// Requested lag count.
        max_lag: usize,
        /// Largest admissible lag count.
        limit: usize,
        /// Length of the sequence.
        n: usize,
    },

    /// Returned when the sequence contains NaN or infinite values.
    #[error("sequence contains non-finite values")]
    NonFinite,

    /// Returned when the sequence is constant.
    #[error("sequence is constant (zero variance)")]
    ConstantSequence,

    /// Returned when the Durbin-Levinson recursion hits a vanishing denominator.
    #[error("Durbin-Levinson recursion is degenerate at lag {lag}")]
    Degenerate {
        /// Lag at which the recursion broke down.
        lag: usize,
    },
}

/// Error type for configuration, table and export failures.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    /// Returned when model parameters violate a precondition.
    #[error("invalid model configuration: {0}")]
    InvalidModel(String),

    /// Returned when the sample-size grid or repetition settings are unusable.
    #[error("invalid experiment grid: {0}")]
    InvalidGrid(String),

    /// Returned when a row is written for a sample size the table does not hold.
    #[error("sample size {0} is not part of the experiment grid")]
    UnknownSampleSize(usize),

    /// Returned when a row has the wrong number of coefficient slots.
    #[error("row has {got} coefficient slots, table expects {expected}")]
    LagMismatch {
        /// Slots in the offending row.
        got: usize,
        /// Slots configured for the table.
        expected: usize,
    },

    /// Returned when the noise distribution cannot be built.
    #[error("invalid noise distribution: {0}")]
    Distribution(#[from] rand_distr::NormalError),

    /// Returned when the dedicated worker pool cannot be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Returned when a configuration file cannot be parsed.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Returned when writing the CSV export fails.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Returned on filesystem failures.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
