//! # Reference Filter
//!
//! Keep only the variants that also appear in a reference variant set, matched on
//! (CHROM, POS, REF, ALT).
use crate::errors::Result;
use crate::record::{VariantKey, VariantRecord};
use crate::table;
use std::{collections::HashMap, iter::FromIterator, path::Path};

/// A de-duplicated set of reference variant keys, bucketed by position so a lookup compares
/// string fields in place instead of building a key per record.
#[derive(Debug, Default, Clone)]
pub struct ReferenceSet {
    by_pos: HashMap<u64, Vec<VariantKey>>,
    len: usize,
}

impl ReferenceSet {
    /// Load a ReferenceSet from a headerless CHROM/POS/REF/ALT file.
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(table::load_reference(path)?.into_iter().collect())
    }

    /// Add `key`, returning false if it was already present.
    pub fn insert(&mut self, key: VariantKey) -> bool {
        let bucket = self.by_pos.entry(key.pos).or_insert_with(Vec::new);
        if bucket.contains(&key) {
            return false;
        }
        bucket.push(key);
        self.len += 1;
        true
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check whether `record`'s key is in the set.
    #[inline]
    pub fn contains(&self, record: &VariantRecord) -> bool {
        self.by_pos
            .get(&record.pos)
            .map_or(false, |bucket| bucket.iter().any(|key| key.matches(record)))
    }

    /// Keep each record whose key is in the set, once, in input order.
    pub fn filter(&self, records: Vec<VariantRecord>) -> Vec<VariantRecord> {
        records
            .into_iter()
            .filter(|record| self.contains(record))
            .collect()
    }
}

impl FromIterator<VariantKey> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = VariantKey>>(iter: I) -> Self {
        let mut set = Self::default();
        for key in iter {
            set.insert(key);
        }
        set
    }
}
