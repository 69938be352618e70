//! Midnight reconciliation
//!
//! Readings reported in the half-hour straddling midnight describe the
//! midnight boundary itself. This stage finds the greatest value in each
//! (channel, target midnight) window bucket and writes it into the record
//! stamped exactly at that midnight, when such a record exists and its own
//! value is lower. Overwrite only: a midnight record is never deleted and
//! none is synthesized when the exact timestamp is absent.

use crate::grouping::ChannelGrouper;
use crate::types::{ChannelKey, MeasurementRecord, MidnightKey};
use crate::window;
use std::collections::BTreeMap;

/// Midnight reconciler stage
pub struct MidnightReconciler;

impl MidnightReconciler {
    /// Reconcile midnight values across the whole batch.
    ///
    /// Output is ordered by ascending channel key, then input order within
    /// each channel. Every record passes through; only the value of an
    /// exact-midnight record may change.
    pub fn reconcile(records: &[MeasurementRecord]) -> Vec<MeasurementRecord> {
        let maxima = window_max_by_target(records);
        let groups = ChannelGrouper::group_by_channel(records);

        let mut reconciled = Vec::with_capacity(records.len());
        for (channel, group) in groups {
            for record in group {
                reconciled.push(substitute_midnight_value(record, &channel, &maxima));
            }
        }

        reconciled
    }
}

/// Greatest value observed in each (channel, target midnight) window
/// bucket. Records outside the midnight window, or with an unparseable
/// timestamp, contribute nothing.
pub fn window_max_by_target(
    records: &[MeasurementRecord],
) -> BTreeMap<(ChannelKey, MidnightKey), f64> {
    let mut maxima: BTreeMap<(ChannelKey, MidnightKey), f64> = BTreeMap::new();

    for record in records {
        let Some(ts) = window::parse_datetime(&record.for_datetime) else {
            continue;
        };
        if !window::is_in_midnight_window(ts) {
            continue;
        }
        let Some(target) = window::target_midnight(ts) else {
            continue;
        };

        let value = record.numeric_value();
        let key = (record.channel_key(), target);
        match maxima.get(&key) {
            // NaN comparisons are false both ways: a NaN bucket seed stays
            // until the bucket is read, where it loses the final comparison
            // and never overwrites a midnight record.
            Some(&current) if !(value > current) => {}
            _ => {
                maxima.insert(key, value);
            }
        }
    }

    maxima
}

/// Apply the bucket maximum to one record when it is an exact-midnight
/// record whose value the window exceeds; otherwise pass it through.
fn substitute_midnight_value(
    record: MeasurementRecord,
    channel: &ChannelKey,
    maxima: &BTreeMap<(ChannelKey, MidnightKey), f64>,
) -> MeasurementRecord {
    let Some(ts) = window::parse_datetime(&record.for_datetime) else {
        return record;
    };
    if !window::is_midnight(ts) {
        return record;
    }
    let Some(target) = window::target_midnight(ts) else {
        return record;
    };

    match maxima.get(&(channel.clone(), target)) {
        Some(&max_value) if max_value > record.numeric_value() => MeasurementRecord {
            value: max_value.to_string(),
            ..record
        },
        _ => record,
    }
}
