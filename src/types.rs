//! Core types for the tsonorm pipeline
//!
//! This module defines the record shape that flows through every stage and
//! the key newtypes used for grouping. Keys are distinct types on purpose:
//! a channel key, a dedup key and a midnight-bucket key are never
//! interchangeable, even though two of them are strings underneath.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One periodic sensor observation, exactly as stored.
///
/// All fields are passed through the pipeline opaquely except `value`, which
/// may be rewritten on an exact-midnight record during reconciliation.
/// `value` is kept as text because that is how it is stored; comparisons are
/// always numeric (see [`MeasurementRecord::numeric_value`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Opaque unique identifier of the stored record
    pub id: String,
    /// Observed magnitude as text; always expected to parse as a float
    pub value: String,
    /// Identifier of the originating reporting system
    #[serde(rename = "sourceId")]
    pub source_id: String,
    /// Instance identifier within the reporting system
    #[serde(rename = "sourceInstanceId")]
    pub source_instance_id: String,
    /// Timestamp assigned by the reporting system
    #[serde(rename = "sourceTime")]
    pub source_time: String,
    /// Wall-clock instant the measurement describes, "YYYY-MM-DD HH:MM:SS",
    /// naive (no timezone offset). The primary time axis.
    pub for_datetime: String,
    /// Audit timestamp, passed through unchanged
    pub created_at: String,
    /// Audit timestamp, passed through unchanged
    pub updated_at: String,
    /// Physical sensor/location identifier
    #[serde(rename = "placeOfMeasurementId")]
    pub place_of_measurement_id: String,
    /// Measurement technique identifier
    #[serde(rename = "measurementMethodId")]
    pub measurement_method_id: String,
}

impl MeasurementRecord {
    /// Numeric view of `value`. Non-numeric text yields NaN, which loses
    /// every comparison downstream rather than erroring.
    pub fn numeric_value(&self) -> f64 {
        self.value.parse().unwrap_or(f64::NAN)
    }

    /// Channel this record belongs to
    pub fn channel_key(&self) -> ChannelKey {
        ChannelKey::of(self)
    }

    /// Deduplication identity of this record
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::of(self)
    }
}

/// Grouping key for a measurement channel: place of measurement plus
/// measurement method. All grouping and midnight reconciliation happens
/// independently per channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelKey(String);

impl ChannelKey {
    pub fn of(record: &MeasurementRecord) -> Self {
        ChannelKey(format!(
            "{}::{}",
            record.place_of_measurement_id, record.measurement_method_id
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deduplication key: the exact string concatenation of `for_datetime`,
/// place and method. Deliberately no timestamp normalization; two
/// textually different spellings of the same instant are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn of(record: &MeasurementRecord) -> Self {
        DedupKey(format!(
            "{}|{}|{}",
            record.for_datetime, record.place_of_measurement_id, record.measurement_method_id
        ))
    }
}

/// The exact midnight instant a boundary-window record is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MidnightKey(NaiveDateTime);

impl MidnightKey {
    pub fn new(midnight: NaiveDateTime) -> Self {
        MidnightKey(midnight)
    }

    pub fn date_time(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for MidnightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}
