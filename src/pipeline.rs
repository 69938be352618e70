//! Pipeline orchestration
//!
//! This module provides the public API for tsonorm. The normalization pass
//! is three pure stages over one record collection, preceded by a stable
//! time sort:
//!
//! 1. Sort by `for_datetime`
//! 2. Deduplicator - collapse duplicate observations, max wins
//! 3. MidnightReconciler - group per channel, bucket the midnight window
//!    and substitute the canonical midnight value
//!
//! Each stage is referentially transparent; the batch flows through as
//! immutable values and nothing outlives a single call.

use crate::dedup::Deduplicator;
use crate::reconcile::MidnightReconciler;
use crate::types::MeasurementRecord;
use crate::window;

/// Run the full normalization pass over a batch of records.
///
/// Output order is ascending channel key, then time order within each
/// channel (the sort pre-step runs before grouping). The pass never fails:
/// malformed values and timestamps flow through inert.
///
/// # Example
/// ```ignore
/// let records = loader::parse_array(&json)?;
/// let normalized = normalize_records(&records);
/// ```
pub fn normalize_records(records: &[MeasurementRecord]) -> Vec<MeasurementRecord> {
    let sorted = sort_by_datetime(records);
    let deduplicated = Deduplicator::remove_duplicates(&sorted);
    MidnightReconciler::reconcile(&deduplicated)
}

/// Stable sort by parsed `for_datetime`. Records with an unparseable
/// timestamp sort before all valid ones and keep their relative order.
pub fn sort_by_datetime(records: &[MeasurementRecord]) -> Vec<MeasurementRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|record| window::parse_datetime(&record.for_datetime));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // The four-record fixture observed in production: two channels quiet
    // around midnight, one exact-midnight record with no competitors.
    fn fixture() -> Vec<MeasurementRecord> {
        let raw = r#"[
            {
                "id": "66991539",
                "value": "500000",
                "sourceId": "25",
                "sourceInstanceId": "655d76a8472ca292a2015f22",
                "sourceTime": "2025-12-09 23:12:06",
                "for_datetime": "2025-12-09 23:45:00",
                "created_at": "2025-12-09 09:13:09.505916",
                "updated_at": "2025-12-09 09:13:09.505916",
                "placeOfMeasurementId": "774",
                "measurementMethodId": "333965"
            },
            {
                "id": "66991538",
                "value": "1000",
                "sourceId": "24",
                "sourceInstanceId": "655d76a8472ca292a2015f21",
                "sourceTime": "2025-12-09 23:12:06",
                "for_datetime": "2025-12-08 00:00:00",
                "created_at": "2025-12-09 09:13:09.501152",
                "updated_at": "2025-12-09 09:13:09.501152",
                "placeOfMeasurementId": "775",
                "measurementMethodId": "333963"
            },
            {
                "id": "66991537",
                "value": "65.62369848632812",
                "sourceId": "24",
                "sourceInstanceId": "655d76a8472ca292a2015f21",
                "sourceTime": "2025-12-09 23:12:06",
                "for_datetime": "2025-12-09 23:46:00",
                "created_at": "2025-12-09 09:13:09.499956",
                "updated_at": "2025-12-09 09:13:09.499956",
                "placeOfMeasurementId": "775",
                "measurementMethodId": "333963"
            },
            {
                "id": "66991536",
                "value": "66.15499169921875",
                "sourceId": "23",
                "sourceInstanceId": "655d76a8472ca292a2015f20",
                "sourceTime": "2025-12-09 23:12:06",
                "for_datetime": "2025-12-09 00:14:00",
                "created_at": "2025-12-09 09:13:09.495789",
                "updated_at": "2025-12-09 09:13:09.495789",
                "placeOfMeasurementId": "774",
                "measurementMethodId": "333963"
            }
        ]"#;

        serde_json::from_str(raw).unwrap()
    }

    fn find<'a>(records: &'a [MeasurementRecord], id: &str) -> &'a MeasurementRecord {
        records.iter().find(|r| r.id == id).unwrap()
    }

    #[test]
    fn test_end_to_end_fixture_passes_through_unchanged() {
        let input = fixture();
        let result = normalize_records(&input);

        // No duplicates, no midnight competition: all four survive with
        // their original values.
        assert_eq!(result.len(), 4);
        assert_eq!(find(&result, "66991538").value, "1000");
        assert_eq!(find(&result, "66991538").for_datetime, "2025-12-08 00:00:00");

        // The 00:14 window record has no exact-midnight counterpart for
        // 2025-12-09 in its channel; nothing is synthesized for it.
        assert_eq!(find(&result, "66991536").value, "66.15499169921875");
        assert!(!result
            .iter()
            .any(|r| r.for_datetime == "2025-12-09 00:00:00"));
    }

    #[test]
    fn test_end_to_end_output_order() {
        let result = normalize_records(&fixture());
        let ids: Vec<&str> = result.iter().map(|r| r.id.as_str()).collect();

        // Ascending channel key (774::333963, 774::333965, 775::333963),
        // time order inside each channel.
        assert_eq!(ids, vec!["66991536", "66991539", "66991538", "66991537"]);
    }

    #[test]
    fn test_end_to_end_with_duplicate_keeps_max() {
        let mut input = fixture();
        let mut dup = input[0].clone();
        dup.id = "99999999".to_string();
        dup.value = "400000".to_string();
        input.push(dup);

        let result = normalize_records(&input);
        assert_eq!(result.len(), 4);

        let survivor = result
            .iter()
            .find(|r| r.for_datetime == "2025-12-09 23:45:00" && r.place_of_measurement_id == "774")
            .unwrap();
        assert_eq!(survivor.value, "500000");
        assert_eq!(survivor.id, "66991539");
    }

    #[test]
    fn test_window_value_promoted_into_midnight_record() {
        let mut input = fixture();
        // Give channel 775/333963 a midnight record for 2025-12-10, which
        // the 23:46 reading (65.62...) targets.
        let mut midnight = input[1].clone();
        midnight.id = "70000000".to_string();
        midnight.value = "10".to_string();
        midnight.for_datetime = "2025-12-10 00:00:00".to_string();
        input.push(midnight);

        let result = normalize_records(&input);
        assert_eq!(find(&result, "70000000").value, "65.62369848632812");
        assert_eq!(find(&result, "70000000").for_datetime, "2025-12-10 00:00:00");
    }

    #[test]
    fn test_normalize_is_idempotent_on_fixture() {
        let once = normalize_records(&fixture());
        let twice = normalize_records(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_by_datetime_orders_and_keeps_invalid_first() {
        let mut input = fixture();
        input[0].for_datetime = "garbage".to_string();

        let sorted = sort_by_datetime(&input);
        assert_eq!(sorted[0].for_datetime, "garbage");
        assert_eq!(sorted[1].for_datetime, "2025-12-08 00:00:00");
        assert_eq!(sorted[2].for_datetime, "2025-12-09 00:14:00");
        assert_eq!(sorted[3].for_datetime, "2025-12-09 23:46:00");
    }

    #[test]
    fn test_empty_batch() {
        assert!(normalize_records(&[]).is_empty());
    }
}
