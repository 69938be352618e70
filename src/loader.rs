//! Record batch loading and emission
//!
//! The pipeline core takes and returns in-memory collections; this module is
//! the boundary that turns stored JSON into records and records back into
//! JSON. Two formats, matching how batches arrive in practice: one JSON
//! array, or newline-delimited JSON with one record per line.

use crate::error::NormalizeError;
use crate::types::MeasurementRecord;

/// Loader for measurement record batches
pub struct RecordLoader;

impl RecordLoader {
    /// Parse a JSON string containing an array of records
    pub fn parse_array(json: &str) -> Result<Vec<MeasurementRecord>, NormalizeError> {
        let records: Vec<MeasurementRecord> = serde_json::from_str(json)?;
        Ok(records)
    }

    /// Parse NDJSON (newline-delimited JSON), one record per line.
    /// Blank lines are skipped.
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<MeasurementRecord>, NormalizeError> {
        let mut records = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<MeasurementRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Err(NormalizeError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(records)
    }

    /// Serialize records as a JSON array
    pub fn to_array(records: &[MeasurementRecord]) -> Result<String, NormalizeError> {
        Ok(serde_json::to_string(records)?)
    }

    /// Serialize records as a pretty-printed JSON array
    pub fn to_array_pretty(records: &[MeasurementRecord]) -> Result<String, NormalizeError> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    /// Serialize records as NDJSON, one record per line
    pub fn to_ndjson(records: &[MeasurementRecord]) -> Result<String, NormalizeError> {
        let mut out = String::new();
        for record in records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}
