//! # vcfsieve_lib
//!
//! Building blocks for filtering VCF-style variant tables: a typed record model, tab-separated
//! loaders and writers, the percentile interval filter used for QUAL and DP, and the
//! reference-set membership filter.
pub mod errors;
pub mod interval_filter;
pub mod record;
pub mod reference_filter;
pub mod stats;
pub mod table;
pub mod utils;
