//! Decoding scorer output into recommendation items.
//!
//! Two encodings are understood:
//!
//! 1. A JSON array between the marker lines [`JSON_START_MARKER`] and
//!    [`JSON_END_MARKER`]. When present and well formed it wins.
//! 2. The line-oriented text format described in [`crate::lines`].
//!
//! Decoding never fails. Malformed input only produces fewer items.

use serde_json::Value;
use tracing::debug;

use crate::lines::{LineKind, classify, split_lines};
use crate::records::{DecodedItem, RecommendationRecord};

pub const JSON_START_MARKER: &str = "RECOMMENDATION_START_JSON";
pub const JSON_END_MARKER: &str = "RECOMMENDATION_END_JSON";

/// Decode complete scorer output.
///
/// Uses the JSON block when one is present and parses as an array,
/// otherwise falls back to the text format over the whole output.
pub fn decode(text: &str) -> Vec<DecodedItem> {
    if let Some(items) = decode_json_block(text) {
        debug!("Decoded {} items from JSON block", items.len());
        return items;
    }

    let records = decode_text(text);
    debug!("Decoded {} records from text output", records.len());
    records.into_iter().map(DecodedItem::from).collect()
}

/// Decode the marker-delimited JSON block.
///
/// Returns `None` when the markers are missing or out of order, or when the
/// block is not a JSON array. Array elements that are neither a record nor a
/// notice are skipped, as are records with a zero `course_id`.
pub fn decode_json_block(text: &str) -> Option<Vec<DecodedItem>> {
    let start = text.find(JSON_START_MARKER)? + JSON_START_MARKER.len();
    let end = start + text[start..].find(JSON_END_MARKER)?;

    let values: Vec<Value> = match serde_json::from_str(text[start..end].trim()) {
        Ok(values) => values,
        Err(e) => {
            debug!("JSON block is not an array ({}), falling back to text", e);
            return None;
        }
    };

    let items = values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value::<DecodedItem>(value) {
            Ok(DecodedItem::Recommendation(record)) if record.course_id == 0 => {
                debug!("Skipping JSON item {}: course_id must be positive", idx);
                None
            }
            Ok(item) => Some(item),
            Err(e) => {
                debug!("Skipping JSON item {}: {}", idx, e);
                None
            }
        })
        .collect();

    Some(items)
}

/// Decode the text format with a one-pass state machine.
///
/// A header closes the open record and, if it parsed, opens a new one.
/// `Reason:`/`Description:` lines fill in the open record and are ignored
/// when none is open. Records are emitted in source order; repeated course
/// ids are kept.
pub fn decode_text(text: &str) -> Vec<RecommendationRecord> {
    let mut records = Vec::new();
    let mut current: Option<RecommendationRecord> = None;

    for (idx, line) in split_lines(text).enumerate() {
        match classify(line) {
            LineKind::Header(fields) => {
                records.extend(current.take());
                match fields {
                    Some(fields) => {
                        current = Some(RecommendationRecord::new(
                            fields.course_id,
                            fields.title,
                            fields.score,
                        ));
                    }
                    None => debug!("Line {}: header without ID/Score, skipped", idx + 1),
                }
            }
            LineKind::Reason(reason) => {
                if let Some(record) = current.as_mut() {
                    record.reason = Some(reason.to_string());
                }
            }
            LineKind::Description(description) => {
                if let Some(record) = current.as_mut() {
                    record.description = Some(description.to_string());
                }
            }
            LineKind::Other => {}
        }
    }

    records.extend(current);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ScorerNotice;

    const TWO_ITEMS: &str = "1. Intro to Go (ID: 42, Score: 0.91\n   Reason: matches your interests\n   Description: A gentle start\n2. Advanced Go (ID: 43, Score: 0.80\n";

    #[test]
    fn test_decode_text_two_items() {
        let records = decode_text(TWO_ITEMS);

        assert_eq!(
            records,
            vec![
                RecommendationRecord {
                    course_id: 42,
                    title: "Intro to Go".to_string(),
                    score: 0.91,
                    reason: Some("matches your interests".to_string()),
                    description: Some("A gentle start".to_string()),
                },
                RecommendationRecord::new(43, "Advanced Go", 0.80),
            ]
        );
    }

    #[test]
    fn test_decode_is_idempotent() {
        assert_eq!(decode(TWO_ITEMS), decode(TWO_ITEMS));
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(decode("").is_empty());
        assert!(decode("Loading model...\nno recommendations here\n\n").is_empty());
    }

    #[test]
    fn test_detail_before_any_header_is_ignored() {
        let text = "   Reason: orphan\n   Description: orphan\n1. Intro (ID: 1, Score: 0.5\n";
        let records = decode_text(text);
        assert_eq!(records, vec![RecommendationRecord::new(1, "Intro", 0.5)]);
    }

    #[test]
    fn test_bad_header_closes_open_record_and_opens_a_gap() {
        let text = "1. Intro (ID: 1, Score: 0.5\n\
                    2. Broken header\n   Reason: belongs to nothing\n\
                    3. Next (ID: 3, Score: 0.2\n";
        let records = decode_text(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].reason, None);
        assert_eq!(records[1].course_id, 3);
        assert_eq!(records[1].reason, None);
    }

    #[test]
    fn test_duplicate_course_ids_are_kept_in_order() {
        let text = "1. A (ID: 5, Score: 0.9\n2. A again (ID: 5, Score: 0.4\n";
        let ids: Vec<_> = decode_text(text).iter().map(|r| r.course_id).collect();
        assert_eq!(ids, vec![5, 5]);
    }

    #[test]
    fn test_later_detail_line_overwrites() {
        let text = "1. A (ID: 5, Score: 0.9\n  Reason: first\n  Reason: second\n";
        assert_eq!(decode_text(text)[0].reason.as_deref(), Some("second"));
    }

    #[test]
    fn test_crlf_output() {
        let text = TWO_ITEMS.replace('\n', "\r\n");
        assert_eq!(decode_text(&text), decode_text(TWO_ITEMS));
    }

    #[test]
    fn test_json_block_preferred_over_text() {
        let text = format!(
            "Loading model\n{}\n[{{\"course_id\": 7, \"score\": 0.66, \"title\": \"Databases\", \"description\": \"SQL\", \"reason\": \"Popular\"}}]\n{}\n\n{}",
            JSON_START_MARKER, JSON_END_MARKER, TWO_ITEMS
        );

        let items = decode(&text);
        assert_eq!(items.len(), 1);
        let record = items[0].as_recommendation().unwrap();
        assert_eq!(record.course_id, 7);
        assert_eq!(record.reason.as_deref(), Some("Popular"));
    }

    #[test]
    fn test_json_block_notice() {
        let text = format!(
            "{}\n[{{\"error\": \"Student 9 is not in the training data\"}}]\n{}\n",
            JSON_START_MARKER, JSON_END_MARKER
        );

        assert_eq!(
            decode(&text),
            vec![DecodedItem::Notice(ScorerNotice {
                error: "Student 9 is not in the training data".to_string()
            })]
        );
    }

    #[test]
    fn test_json_block_skips_malformed_elements() {
        let text = format!(
            "{}\n[{{\"course_id\": \"x\"}}, {{\"course_id\": 2, \"title\": \"B\", \"score\": 0.1}}]\n{}",
            JSON_START_MARKER, JSON_END_MARKER
        );
        let items = decode(&text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_recommendation().unwrap().course_id, 2);
    }

    #[test]
    fn test_json_block_rejects_zero_course_id() {
        let text = format!(
            "{}\n[{{\"course_id\": 0, \"title\": \"Z\", \"score\": 0.1}}, {{\"course_id\": 3, \"title\": \"C\", \"score\": 0.2}}]\n{}",
            JSON_START_MARKER, JSON_END_MARKER
        );
        let items = decode(&text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_recommendation().unwrap().course_id, 3);

        // Same rule as the text format
        assert!(decode("1. Z (ID: 0, Score: 0.1\n").is_empty());
    }

    #[test]
    fn test_broken_json_block_falls_back_to_text() {
        let text = format!("{}\n[{{oops\n{}\n{}", JSON_START_MARKER, JSON_END_MARKER, TWO_ITEMS);
        assert_eq!(decode(&text).len(), 2);
    }

    #[test]
    fn test_markers_out_of_order_fall_back_to_text() {
        let text = format!("{}\n[]\n{}\n{}", JSON_END_MARKER, JSON_START_MARKER, TWO_ITEMS);
        assert_eq!(decode_json_block(&text), None);
        assert_eq!(decode(&text).len(), 2);
    }

    #[test]
    fn test_empty_json_block() {
        let text = format!("{}\n[]\n{}\n", JSON_START_MARKER, JSON_END_MARKER);
        assert_eq!(decode_json_block(&text), Some(vec![]));
    }
}
