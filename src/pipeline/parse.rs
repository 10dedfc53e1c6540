//! Line-to-record parsing: free-text model output → ordered `key: value`
//! records.
//!
//! The rule is deliberately literal. Each response line is split on the
//! *first* occurrence of `": "` (colon followed by one space); everything
//! before it is the key, everything after it — further colons included — is
//! the value. A line without that delimiter is silently dropped, which is
//! what excludes headers, blank lines, and freeform prose from the export.
//!
//! No trimming, normalisation, deduplication, or type coercion is applied.
//! Duplicate keys each produce their own record. Multi-line values are not
//! reassembled: a value that the model wraps onto a continuation line loses
//! that continuation, and a line using `":"` without a trailing space is
//! dropped entirely. Known data-loss risk, kept for output determinism.

use serde::{Deserialize, Serialize};

/// The delimiter separating key from value within a response line.
const DELIMITER: &str = ": ";

/// One extracted key/value pair, derived from one line of model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub value: String,
}

/// Parse the model response into records, preserving line order.
///
/// Pure and deterministic: same text always yields the same sequence.
pub fn parse_records(text: &str) -> Vec<Record> {
    text.split('\n')
        .filter_map(|line| {
            line.split_once(DELIMITER).map(|(key, value)| Record {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, value: &str) -> Record {
        Record {
            key: key.into(),
            value: value.into(),
        }
    }

    #[test]
    fn typical_invoice_response() {
        let text = "Invoice Number: INV-001\nDate: 2024-01-05\nThank you for your business.";
        assert_eq!(
            parse_records(text),
            vec![record("Invoice Number", "INV-001"), record("Date", "2024-01-05")]
        );
    }

    #[test]
    fn splits_on_first_delimiter_only() {
        // The value may itself contain colons.
        let records = parse_records("Due: 2024-02-01: extended");
        assert_eq!(records, vec![record("Due", "2024-02-01: extended")]);

        let records = parse_records("Time: 12: 30");
        assert_eq!(records, vec![record("Time", "12: 30")]);
    }

    #[test]
    fn lines_without_delimiter_are_dropped() {
        let text = "EXTRACTED FIELDS\n\nTotal: 99.00\nno delimiter here\nColon:no-space";
        assert_eq!(parse_records(text), vec![record("Total", "99.00")]);
    }

    #[test]
    fn duplicate_keys_are_preserved_in_order() {
        let text = "Item: Widget\nItem: Gadget\nItem: Widget";
        assert_eq!(
            parse_records(text),
            vec![
                record("Item", "Widget"),
                record("Item", "Gadget"),
                record("Item", "Widget"),
            ]
        );
    }

    #[test]
    fn no_trimming_is_applied() {
        let records = parse_records("  Total : 1.00\nTotal:  2.00");
        // First line: key is "  Total " (split at ": " after the space-colon),
        // second line: delimiter ": " never occurs... except "Total:  2.00"
        // does contain ": " (colon, then one of the two spaces).
        assert_eq!(
            records,
            vec![record("  Total ", "1.00"), record("Total", " 2.00")]
        );
    }

    #[test]
    fn empty_and_prose_only_input_yields_nothing() {
        assert!(parse_records("").is_empty());
        assert!(parse_records("\n\n\n").is_empty());
        assert!(parse_records("The invoice shows a purchase of widgets.").is_empty());
    }

    #[test]
    fn order_matches_response_line_order() {
        let text = "B: 2\nA: 1\nC: 3";
        let records = parse_records(text);
        let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
    }
}
