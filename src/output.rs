//! Output types returned by the extraction entry points.

use crate::error::ExtractError;
use crate::pipeline::{export, parse::Record};
use serde::{Deserialize, Serialize};

/// The result of one extraction run.
///
/// `text` is the model's response exactly as returned — arbitrary natural
/// language or semi-structured output, no schema enforced. `records` is the
/// key/value sequence parsed from it, in response line order, duplicates
/// preserved. The two are kept together so a caller can always display the
/// raw text even when nothing parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Raw model response.
    pub text: String,
    /// Parsed `key: value` records, in line order.
    pub records: Vec<Record>,
    /// Run accounting.
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// True when at least one `key: value` line was recognised.
    ///
    /// A false return with non-empty `text` is the "parsing yields empty"
    /// edge case: the model answered but not in the expected line format.
    /// Callers should surface that as a warning, not silent success.
    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    /// The CSV export as in-memory bytes, one `key,value` row per record,
    /// no header.
    ///
    /// Generating the bytes per call (rather than sharing a file path)
    /// keeps concurrent sessions from overwriting each other's export.
    pub fn csv_bytes(&self) -> Result<Vec<u8>, ExtractError> {
        export::csv_bytes(&self.records)
    }

    /// Write the CSV export to `path`, truncating any existing content.
    pub fn write_csv(&self, path: impl AsRef<std::path::Path>) -> Result<(), ExtractError> {
        export::write_csv(&self.records, path.as_ref())
    }
}

/// Accounting for one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Tokens sent to the model.
    pub input_tokens: u64,
    /// Tokens generated by the model.
    pub output_tokens: u64,
    /// Wall-clock time for the whole pipeline.
    pub total_duration_ms: u64,
    /// Wall-clock time spent inside the inference call.
    pub llm_duration_ms: u64,
    /// Number of response lines that parsed into records.
    pub parsed_records: usize,
    /// Number of response lines dropped for lacking the `": "` delimiter
    /// (blank lines, headers, freeform prose).
    pub dropped_lines: usize,
}
