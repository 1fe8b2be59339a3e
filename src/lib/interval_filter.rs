//! # Interval Filter
//!
//! Drops the low end of a numeric column using a percentile snapped to a fixed grid of bins.
//!
//! The observed range `[min, max]` is cut into [`N_BINS`] equal-width bins. The cutoff is the
//! left edge of the bin holding the [`PERCENTILE`]th percentile, and every row at or above the
//! cutoff is kept. Rows without a value take no part in the cutoff and are never kept.
use crate::record::{DepthAnnotatedRecord, VariantRecord, DEPTH_ANNOTATED_COLUMNS, VARIANT_COLUMNS};
use log::*;
use serde::Serialize;
use std::cmp::Ordering;

/// Number of equal-width bins the observed range is cut into.
pub const N_BINS: usize = 20;

/// The percentile whose bin sets the cutoff.
pub const PERCENTILE: f64 = 30.0;

/// A numeric column the interval filter can run over.
pub trait ScoreColumn {
    /// Row type written for records that pass.
    type Row: Serialize;

    /// Column name, for messages.
    fn name(&self) -> &'static str;

    /// Header of the written table.
    fn columns(&self) -> &'static [&'static str];

    /// Whether a table with no value at all in this column is malformed.
    fn required(&self) -> bool {
        true
    }

    /// The value for `record`, `None` when it is missing.
    fn score(&self, record: &VariantRecord) -> Option<f64>;

    /// Turn a passing record into an output row.
    fn annotate(&self, record: VariantRecord) -> Self::Row;
}

/// The QUAL column, written back unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct QualColumn;

impl ScoreColumn for QualColumn {
    type Row = VariantRecord;

    fn name(&self) -> &'static str {
        "QUAL"
    }

    fn columns(&self) -> &'static [&'static str] {
        &VARIANT_COLUMNS
    }

    #[inline]
    fn score(&self, record: &VariantRecord) -> Option<f64> {
        record.qual.value()
    }

    fn annotate(&self, record: VariantRecord) -> Self::Row {
        record
    }
}

/// Read depth from the INFO `DP=` token, written as an extra `DP` column.
#[derive(Debug, Default, Clone, Copy)]
pub struct DepthColumn;

impl ScoreColumn for DepthColumn {
    type Row = DepthAnnotatedRecord;

    fn name(&self) -> &'static str {
        "DP"
    }

    fn columns(&self) -> &'static [&'static str] {
        &DEPTH_ANNOTATED_COLUMNS
    }

    // DP is derived, so a table without it is just one where nothing passes.
    fn required(&self) -> bool {
        false
    }

    #[inline]
    fn score(&self, record: &VariantRecord) -> Option<f64> {
        record.depth().map(|dp| dp as f64)
    }

    fn annotate(&self, record: VariantRecord) -> Self::Row {
        DepthAnnotatedRecord::from(record)
    }
}

/// Linearly interpolated percentile of an ascending slice, `q` in `[0, 100]`.
///
/// The rank is `q / 100 * (n - 1)` and the value is interpolated between the order statistics
/// on either side of it. Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let (a, b) = (sorted[lo], sorted[hi]);
    let t = rank - lo as f64;
    let diff = b - a;
    if !diff.is_finite() {
        // The gap overflows f64, so weight the ends instead.
        return Some(a * (1.0 - t) + b * t);
    }
    // Interpolate from whichever end is nearer.
    if t >= 0.5 {
        Some(b - diff * (1.0 - t))
    } else {
        Some(a + diff * t)
    }
}

/// The `N_BINS + 1` evenly spaced bin edges from `min` to `max`, both ends included exactly.
pub fn bin_boundaries(min: f64, max: f64) -> Vec<f64> {
    let n = N_BINS as f64;
    let step = (max - min) / n;
    let mut bounds: Vec<f64> = if step.is_finite() {
        (0..=N_BINS).map(|i| min + i as f64 * step).collect()
    } else {
        // The span overflows f64, so weight the ends per edge.
        (0..=N_BINS)
            .map(|i| {
                let f = i as f64 / n;
                min * (1.0 - f) + max * f
            })
            .collect()
    };
    bounds[N_BINS] = max;
    bounds
}

/// Compute the cutoff for `values`, `None` if there are none.
///
/// Values must be finite. When every value is the same there is only one bin and the cutoff is
/// that value.
pub fn interval_threshold(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let (min, max) = (*sorted.first()?, *sorted.last()?);
    if min == max {
        return Some(min);
    }

    let bounds = bin_boundaries(min, max);
    let p = percentile(&sorted, PERCENTILE)?;
    // Left insertion point: the first edge at or above the percentile.
    let idx = bounds.partition_point(|edge| *edge < p);
    debug!("Bin edges: {:?}", bounds);
    debug!("Percentile {} = {}, insertion index {}", PERCENTILE, p, idx);
    Some(if idx == 0 { bounds[0] } else { bounds[idx - 1] })
}

/// What an interval filter run produced.
#[derive(Debug)]
pub struct IntervalOutcome<R> {
    /// The cutoff, `None` if no record had a value.
    pub threshold: Option<f64>,
    /// Passing rows, in input order.
    pub retained: Vec<R>,
    /// Number of records with no value in the column.
    pub missing: usize,
}

/// Runs the percentile interval filter over one [`ScoreColumn`].
#[derive(Debug, Default)]
pub struct IntervalFilter<C: ScoreColumn> {
    column: C,
}

impl<C: ScoreColumn> IntervalFilter<C> {
    /// Create an IntervalFilter over `column`.
    pub fn new(column: C) -> Self {
        Self { column }
    }

    /// The column this filter reads.
    pub fn column(&self) -> &C {
        &self.column
    }

    /// The cutoff over `records` without filtering them.
    pub fn threshold(&self, records: &[VariantRecord]) -> Option<f64> {
        let values: Vec<f64> = records
            .iter()
            .filter_map(|record| self.column.score(record))
            .collect();
        interval_threshold(&values)
    }

    /// Keep the records whose value is at or above the cutoff.
    pub fn filter(&self, records: Vec<VariantRecord>) -> IntervalOutcome<C::Row> {
        let scores: Vec<Option<f64>> = records
            .iter()
            .map(|record| self.column.score(record))
            .collect();
        let values: Vec<f64> = scores.iter().flatten().copied().collect();
        let missing = scores.len() - values.len();
        let threshold = interval_threshold(&values);

        let retained = match threshold {
            Some(threshold) => records
                .into_iter()
                .zip(scores)
                .filter_map(|(record, score)| match score {
                    Some(score) if score >= threshold => Some(self.column.annotate(record)),
                    Some(_) => None,
                    None => None,
                })
                .collect(),
            None => vec![],
        };

        IntervalOutcome {
            threshold,
            retained,
            missing,
        }
    }
}
