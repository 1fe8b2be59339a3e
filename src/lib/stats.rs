//! # Stats
//!
//! Sorted value distributions of a score column, for inspecting where the interval filter
//! will put its cutoff before running it.
use crate::errors::Result;
use crate::interval_filter::{interval_threshold, percentile, ScoreColumn, PERCENTILE};
use crate::record::VariantRecord;
use itertools::Itertools;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Every value of one column across a table, ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    /// Column the values came from.
    pub column: &'static str,
    /// Ascending values; records without a value contribute nothing.
    pub values: Vec<f64>,
}

impl Distribution {
    /// Collect and sort the values of `column` over `records`.
    pub fn from_records<C: ScoreColumn>(column: &C, records: &[VariantRecord]) -> Self {
        let values = records
            .iter()
            .filter_map(|record| column.score(record))
            .sorted_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .collect();
        Self {
            column: column.name(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The percentile the interval filter uses.
    pub fn percentile(&self) -> Option<f64> {
        percentile(&self.values, PERCENTILE)
    }

    /// The cutoff the interval filter would apply.
    pub fn threshold(&self) -> Option<f64> {
        interval_threshold(&self.values)
    }

    /// Write one value per line.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        for value in self.values.iter() {
            writeln!(writer, "{}", value)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write one value per line to a new file at `path`.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        self.write(BufWriter::new(File::create(path)?))
    }
}
