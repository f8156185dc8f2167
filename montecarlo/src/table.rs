//! Accumulation, reduction and presentation of study results.

use std::fmt;
use std::path::Path;

use crate::config::ExperimentGrid;
use crate::error::StudyError;
use crate::extract::RepetitionResult;

/// Label of the trailing comparison row.
pub const THEORETICAL_LABEL: &str = "theoretical";

const ROUNDING_SCALE: f64 = 100.0;

/// Round to two decimals, ties to even.
pub fn round2(x: f64) -> f64 {
    (x * ROUNDING_SCALE).round_ties_even() / ROUNDING_SCALE
}

/// Arithmetic average; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Average over present values only; `None` when every value is missing.
pub fn mean_skip_missing(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    mean(&present)
}

/// Per-sample-size accumulation state.
///
/// Every coefficient slot owns its own collection.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    means: Vec<f64>,
    variances: Vec<f64>,
    slots: Vec<Vec<Option<f64>>>,
    degraded: usize,
}

impl Accumulator {
    pub fn new(max_lag: usize) -> Self {
        Accumulator {
            means: Vec::new(),
            variances: Vec::new(),
            slots: vec![Vec::new(); max_lag],
            degraded: 0,
        }
    }

    pub fn push(&mut self, result: RepetitionResult) {
        if result.is_degraded() {
            self.degraded += 1;
        }
        self.means.push(result.mean);
        self.variances.push(result.variance);
        for (slot, value) in self.slots.iter_mut().zip(result.coefficients) {
            slot.push(value);
        }
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Repetitions whose coefficients are all missing
    pub fn degraded_count(&self) -> usize {
        self.degraded
    }

    pub fn reduce(&self) -> SampleSizeRow {
        SampleSizeRow {
            mean: mean(&self.means).map(round2),
            variance: mean(&self.variances).map(round2),
            coefficients: self
                .slots
                .iter()
                .map(|slot| mean_skip_missing(slot).map(round2))
                .collect(),
        }
    }
}

impl FromIterator<RepetitionResult> for Accumulator {
    fn from_iter<I: IntoIterator<Item = RepetitionResult>>(iter: I) -> Self {
        let mut acc = Accumulator::default();
        for result in iter {
            if acc.slots.is_empty() {
                acc.slots = vec![Vec::new(); result.coefficients.len()];
            }
            acc.push(result);
        }
        acc
    }
}

/// One row of the results table. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSizeRow {
    pub mean: Option<f64>,
    pub variance: Option<f64>,
    pub coefficients: Vec<Option<f64>>,
}

impl SampleSizeRow {
    pub fn missing(max_lag: usize) -> Self {
        SampleSizeRow {
            mean: None,
            variance: None,
            coefficients: vec![None; max_lag],
        }
    }

    pub fn is_missing(&self) -> bool {
        self.mean.is_none()
            && self.variance.is_none()
            && self.coefficients.iter().all(Option::is_none)
    }

    fn cells(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        [self.mean, self.variance]
            .into_iter()
            .chain(self.coefficients.iter().copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKey {
    SampleSize(usize),
    Theoretical,
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::SampleSize(n) => write!(f, "{}", n),
            RowKey::Theoretical => write!(f, "{}", THEORETICAL_LABEL),
        }
    }
}

/// Ordered rows keyed by sample size plus one trailing theoretical row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsTable {
    max_lag: usize,
    rows: Vec<(usize, SampleSizeRow)>,
    filled: Vec<bool>,
    theoretical: SampleSizeRow,
}

impl ResultsTable {
    /// All-missing table for the grid's sample sizes
    pub fn new(grid: &ExperimentGrid, max_lag: usize) -> Self {
        ResultsTable {
            max_lag,
            rows: grid
                .sample_sizes
                .iter()
                .map(|&n| (n, SampleSizeRow::missing(max_lag)))
                .collect(),
            filled: vec![false; grid.sample_sizes.len()],
            theoretical: SampleSizeRow::missing(max_lag),
        }
    }

    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    pub fn fill(&mut self, sample_size: usize, row: SampleSizeRow) -> Result<(), StudyError> {
        self.check_width(&row)?;
        let idx = self
            .rows
            .iter()
            .position(|(n, _)| *n == sample_size)
            .ok_or(StudyError::UnknownSampleSize(sample_size))?;
        self.rows[idx].1 = row;
        self.filled[idx] = true;
        Ok(())
    }

    pub fn set_theoretical(&mut self, row: SampleSizeRow) -> Result<(), StudyError> {
        self.check_width(&row)?;
        self.theoretical = row;
        Ok(())
    }

    pub fn get(&self, sample_size: usize) -> Option<&SampleSizeRow> {
        self.rows
            .iter()
            .find(|(n, _)| *n == sample_size)
            .map(|(_, row)| row)
    }

    pub fn theoretical(&self) -> &SampleSizeRow {
        &self.theoretical
    }

    /// Sample-size rows that have been filled so far, in grid order
    pub fn completed(&self) -> impl Iterator<Item = (usize, &SampleSizeRow)> + '_ {
        self.rows
            .iter()
            .zip(&self.filled)
            .filter(|(_, filled)| **filled)
            .map(|((n, row), _)| (*n, row))
    }

    /// Every row in display order, theoretical last
    pub fn iter(&self) -> impl Iterator<Item = (RowKey, &SampleSizeRow)> + '_ {
        self.rows
            .iter()
            .map(|(n, row)| (RowKey::SampleSize(*n), row))
            .chain(std::iter::once((RowKey::Theoretical, &self.theoretical)))
    }

    pub fn header(&self) -> Vec<String> {
        let mut header = vec![
            "sample_size".to_string(),
            "avg_mean".to_string(),
            "avg_variance".to_string(),
        ];
        header.extend((1..=self.max_lag).map(|k| format!("avg_coeff_{}", k)));
        header
    }

    /// Text rendering of the completed rows only
    pub fn render_completed(&self) -> String {
        self.render(
            self.completed()
                .map(|(n, row)| (RowKey::SampleSize(n), row)),
        )
    }

    fn render<'a, I>(&self, rows: I) -> String
    where
        I: Iterator<Item = (RowKey, &'a SampleSizeRow)>,
    {
        let header = self.header();
        let mut out = String::new();
        out.push_str(&format!("{:>12}", header[0]));
        for name in &header[1..] {
            out.push_str(&format!(" {:>13}", name));
        }
        out.push('\n');

        for (key, row) in rows {
            out.push_str(&format!("{:>12}", key.to_string()));
            for cell in row.cells() {
                match cell {
                    Some(value) => out.push_str(&format!(" {:>13.2}", value)),
                    None => out.push_str(&format!(" {:>13}", "NaN")),
                }
            }
            out.push('\n');
        }
        out
    }

    /// Write the whole table; missing cells become empty fields
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), StudyError> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(self.header())?;

        for (key, row) in self.iter() {
            let mut record = vec![key.to_string()];
            record.extend(
                row.cells()
                    .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn check_width(&self, row: &SampleSizeRow) -> Result<(), StudyError> {
        if row.coefficients.len() != self.max_lag {
            return Err(StudyError::LagMismatch {
                got: row.coefficients.len(),
                expected: self.max_lag,
            });
        }
        Ok(())
    }
}

impl fmt::Display for ResultsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(self.iter()))
    }
}
