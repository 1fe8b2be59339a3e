//! # Record
//!
//! Typed rows of the variant table and of the reference variant set.
//!
//! Input tables carry no header, so every row is checked against a fixed arity before it is
//! deserialized positionally into one of these types.
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smartstring::alias::String;

/// Column names of the variant table, in file order.
pub const VARIANT_COLUMNS: [&str; 10] = [
    "CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT", "SAMPLE",
];

/// Column names of a depth-annotated table: the variant columns plus the derived `DP`.
pub const DEPTH_ANNOTATED_COLUMNS: [&str; 11] = [
    "CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT", "SAMPLE", "DP",
];

lazy_static! {
    /// A `DP=<digits>` token at the start of INFO or right after a `;`.
    static ref DEPTH_TOKEN: Regex = Regex::new(r"(?:^|;)DP=(\d+)").expect("valid DP pattern");
}

/// Pull the read depth out of an INFO string, `None` if there is no `DP=<digits>` token.
pub fn extract_depth(info: &str) -> Option<u64> {
    DEPTH_TOKEN
        .captures(info)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// A numeric cell that keeps the text it was read from.
///
/// The value is `None` for placeholders like `.`, empty cells, and anything that does not parse
/// to a finite number. Serializing writes the text back as read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Score {
    raw: String,
    value: Option<f64>,
}

impl Score {
    /// Parse a cell.
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        Self {
            raw: String::from(raw),
            value,
        }
    }

    /// The numeric value, if the cell held one.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// The cell exactly as read.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Score::parse(&raw))
    }
}

/// One row of the variant table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct VariantRecord {
    /// Chromosome identifier.
    pub chrom: String,
    /// 1-based position on the chromosome.
    pub pos: u64,
    /// Variant identifier, often the `.` placeholder.
    pub id: String,
    /// Reference allele.
    #[serde(rename = "REF")]
    pub ref_allele: String,
    /// Alternate allele.
    pub alt: String,
    /// Phred-scaled quality score, possibly missing.
    pub qual: Score,
    pub filter: String,
    /// Semicolon-delimited `key=value` annotations.
    pub info: String,
    pub format: String,
    pub sample: String,
}

impl VariantRecord {
    /// Number of fields every row must carry.
    pub const N_FIELDS: usize = VARIANT_COLUMNS.len();

    /// The (CHROM, POS, REF, ALT) key of this record.
    pub fn key(&self) -> VariantKey {
        VariantKey {
            chrom: self.chrom.clone(),
            pos: self.pos,
            ref_allele: self.ref_allele.clone(),
            alt: self.alt.clone(),
        }
    }

    /// Read depth from the INFO field.
    pub fn depth(&self) -> Option<u64> {
        extract_depth(&self.info)
    }
}

/// The four fields identifying a variant. Rows of the reference variant set deserialize
/// straight into this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct VariantKey {
    pub chrom: String,
    pub pos: u64,
    #[serde(rename = "REF")]
    pub ref_allele: String,
    pub alt: String,
}

impl VariantKey {
    /// Number of fields every reference row must carry.
    pub const N_FIELDS: usize = 4;

    /// Whether `record` carries this key, without building a key for it.
    #[inline]
    pub fn matches(&self, record: &VariantRecord) -> bool {
        self.pos == record.pos
            && self.chrom == record.chrom
            && self.ref_allele == record.ref_allele
            && self.alt == record.alt
    }
}

/// A [`VariantRecord`] with its derived `DP` column appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DepthAnnotatedRecord {
    pub chrom: String,
    pub pos: u64,
    pub id: String,
    #[serde(rename = "REF")]
    pub ref_allele: String,
    pub alt: String,
    pub qual: Score,
    pub filter: String,
    pub info: String,
    pub format: String,
    pub sample: String,
    /// Depth pulled from INFO, written as an empty cell when missing.
    pub dp: Option<u64>,
}

impl From<VariantRecord> for DepthAnnotatedRecord {
    fn from(record: VariantRecord) -> Self {
        let dp = record.depth();
        DepthAnnotatedRecord {
            chrom: record.chrom,
            pos: record.pos,
            id: record.id,
            ref_allele: record.ref_allele,
            alt: record.alt,
            qual: record.qual,
            filter: record.filter,
            info: record.info,
            format: record.format,
            sample: record.sample,
            dp,
        }
    }
}
