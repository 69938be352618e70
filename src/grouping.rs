//! Channel grouping
//!
//! Partitions a record batch into independent measurement channels. Within a
//! group the input relative order is preserved; groups iterate in ascending
//! channel-key order so downstream output is deterministic.

use crate::types::{ChannelKey, MeasurementRecord};
use std::collections::BTreeMap;

/// Channel grouper stage
pub struct ChannelGrouper;

impl ChannelGrouper {
    /// Group records by (place of measurement, measurement method),
    /// append-only per group.
    pub fn group_by_channel(
        records: &[MeasurementRecord],
    ) -> BTreeMap<ChannelKey, Vec<MeasurementRecord>> {
        let mut groups: BTreeMap<ChannelKey, Vec<MeasurementRecord>> = BTreeMap::new();

        for record in records {
            groups
                .entry(record.channel_key())
                .or_default()
                .push(record.clone());
        }

        groups
    }
}
