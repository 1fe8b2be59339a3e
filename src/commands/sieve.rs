//! # Sieve
//!
//! Load one variant table, run one filter over it, and write one output table.
use anyhow::Result;
use log::*;
use std::path::{Path, PathBuf};
use strum::EnumString;
use structopt::StructOpt;
use vcfsieve_lib::{
    errors::SieveError,
    interval_filter::{DepthColumn, IntervalFilter, QualColumn, ScoreColumn},
    record::{VariantRecord, VARIANT_COLUMNS},
    reference_filter::ReferenceSet,
    stats::Distribution,
    table,
};

/// Where the reference variant set is read from unless told otherwise.
pub const DEFAULT_REFERENCE: &str = "../1kgp3_variants.txt";

/// Output of the QUAL filter.
pub const QUAL_OUTPUT: &str = "filtered_by_qual.vcf";
/// Output of the DP filter.
pub const DEPTH_OUTPUT: &str = "filtered_by_dp.vcf";
/// Output of the reference-set filter.
pub const REFERENCE_OUTPUT: &str = "filtered_by_1kgp3.vcf";
/// Sorted QUAL values written by the stats mode.
pub const QUAL_STATS_OUTPUT: &str = "Qualout.txt";
/// Sorted DP values written by the stats mode.
pub const DEPTH_STATS_OUTPUT: &str = "DPout.txt";

/// Which filter a run applies.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Mode {
    /// QUAL percentile bins.
    #[strum(serialize = "qual")]
    Qual,
    /// INFO `DP=` percentile bins.
    #[strum(serialize = "dp")]
    Depth,
    /// Membership in the reference variant set.
    #[strum(serialize = "refset", serialize = "1kgp3")]
    RefSet,
    /// Write the sorted QUAL and DP distributions instead of filtering.
    #[strum(serialize = "stats")]
    Stats,
}

/// Filter a VCF-style variant table by QUAL or DP percentile bins, or by membership in a
/// reference variant set.
///
/// The QUAL and DP filters cut the observed range into 20 equal bins and drop everything below
/// the bin holding the 30th percentile.
#[derive(StructOpt, Debug)]
#[structopt(name = "vcfsieve", rename_all = "kebab-case", author, about)]
pub struct Sieve {
    /// Input variant table: tab-separated, ten columns, no header, `#` lines skipped.
    #[structopt(short = "v", long = "vcf")]
    pub vcf: PathBuf,

    /// Filter to run: qual, dp, refset (alias 1kgp3), or stats.
    #[structopt(long, short = "m", default_value = "refset")]
    pub mode: Mode,

    /// Reference variant set with CHROM, POS, REF, ALT columns. Only read by the refset mode.
    #[structopt(long, short = "r", default_value = DEFAULT_REFERENCE)]
    pub reference: PathBuf,

    /// Output path, `-` for stdout. Defaults to the mode's fixed file name in --output-dir.
    /// Ignored by the stats mode.
    #[structopt(long, short = "o")]
    pub output: Option<PathBuf>,

    /// Directory that receives fixed-name outputs.
    #[structopt(long, short = "d", default_value = ".")]
    pub output_dir: PathBuf,
}

impl Sieve {
    pub fn run(self) -> Result<()> {
        info!("Running {:?} mode on: {:?}", self.mode, self.vcf);
        let records = table::load_variants(&self.vcf)?;
        info!("Loaded {} variant records", records.len());

        match self.mode {
            Mode::Qual => {
                self.run_interval(IntervalFilter::new(QualColumn), QUAL_OUTPUT, records)
            }
            Mode::Depth => {
                self.run_interval(IntervalFilter::new(DepthColumn), DEPTH_OUTPUT, records)
            }
            Mode::RefSet => self.run_reference(records),
            Mode::Stats => self.run_stats(&records),
        }
    }

    /// Where a filtered table goes: `--output` if given, else `name` in the output directory.
    fn output_path(&self, name: &str) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self.output_dir.join(name),
        }
    }

    fn run_interval<C: ScoreColumn>(
        &self,
        filter: IntervalFilter<C>,
        name: &str,
        records: Vec<VariantRecord>,
    ) -> Result<()> {
        let column = filter.column().name();
        let total = records.len();
        let outcome = filter.filter(records);

        if outcome.missing > 0 {
            warn!(
                "{} of {} records have no {} value and are dropped",
                outcome.missing, total, column
            );
        }
        match outcome.threshold {
            Some(threshold) => info!("{} threshold: {}", column, threshold),
            None if total > 0 && filter.column().required() => {
                return Err(SieveError::NoNumericValues {
                    path: self.vcf.clone(),
                    column,
                }
                .into());
            }
            None => info!("No {} values, nothing can pass", column),
        }

        let output = self.output_path(name);
        let mut writer = table::get_writer(&output)?;
        table::write_table(
            &mut writer,
            filter.column().columns(),
            &outcome.retained,
        )?;
        report(column, outcome.retained.len(), total, &output);
        Ok(())
    }

    fn run_reference(&self, records: Vec<VariantRecord>) -> Result<()> {
        let reference = ReferenceSet::from_path(&self.reference)?;
        info!("Loaded {} distinct reference variants", reference.len());
        let total = records.len();
        let retained = reference.filter(records);

        let output = self.output_path(REFERENCE_OUTPUT);
        let mut writer = table::get_writer(&output)?;
        table::write_table(&mut writer, &VARIANT_COLUMNS, &retained)?;
        report("reference set", retained.len(), total, &output);
        Ok(())
    }

    fn run_stats(&self, records: &[VariantRecord]) -> Result<()> {
        let distributions = [
            (
                Distribution::from_records(&QualColumn, records),
                QUAL_STATS_OUTPUT,
            ),
            (
                Distribution::from_records(&DepthColumn, records),
                DEPTH_STATS_OUTPUT,
            ),
        ];
        for (dist, name) in distributions.iter() {
            let path = self.output_dir.join(name);
            dist.write_to_path(&path)?;
            match (dist.percentile(), dist.threshold()) {
                (Some(p), Some(threshold)) => info!(
                    "{}: {} values, 30th percentile {}, threshold {}, written to {:?}",
                    dist.column,
                    dist.len(),
                    p,
                    threshold,
                    path
                ),
                _ => warn!("{}: no values, wrote empty {:?}", dist.column, path),
            }
        }
        Ok(())
    }
}

/// Log the outcome of a filter run, warning when nothing survived.
fn report(filter: &str, retained: usize, total: usize, output: &Path) {
    if retained == 0 {
        warn!(
            "No records passed the {} filter, {:?} holds only a header",
            filter, output
        );
    }
    info!(
        "Retained {} of {} records, written to {:?}",
        retained, total, output
    );
}
