//! Duplicate removal
//!
//! Collapses records describing the same physical observation, keeping the
//! one with the numerically greatest value. The identity of an observation
//! is the exact text of (for_datetime, place, method); see
//! [`crate::types::DedupKey`].

use crate::types::{DedupKey, MeasurementRecord};
use std::collections::HashMap;

/// Deduplicator stage
pub struct Deduplicator;

impl Deduplicator {
    /// Remove duplicates, keeping only the record with the greatest value
    /// per key. Output preserves first-seen input order.
    ///
    /// A NaN-valued candidate never replaces an existing entry (NaN loses
    /// every comparison) and survives only when it is the first record seen
    /// for its key.
    pub fn remove_duplicates(records: &[MeasurementRecord]) -> Vec<MeasurementRecord> {
        let mut index: HashMap<DedupKey, usize> = HashMap::with_capacity(records.len());
        let mut kept: Vec<MeasurementRecord> = Vec::with_capacity(records.len());

        for record in records {
            let key = record.dedup_key();
            match index.get(&key) {
                None => {
                    index.insert(key, kept.len());
                    kept.push(record.clone());
                }
                Some(&slot) => {
                    if record.numeric_value() > kept[slot].numeric_value() {
                        kept[slot] = record.clone();
                    }
                }
            }
        }

        kept
    }
}
