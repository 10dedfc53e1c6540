//! CSV export: record sequence → delimited bytes.
//!
//! One `key,value` row per record, record order preserved, no header row.
//! Quoting follows the standard rules (fields containing a comma, quote, or
//! newline are quoted; embedded quotes are doubled), handled by the `csv`
//! crate's default `QuoteStyle::Necessary`.
//!
//! The primary surface is [`csv_bytes`]: export bytes generated in memory
//! per request, so concurrent sessions never share a file path. The file
//! writer layers truncate-overwrite semantics on top for the CLI's single
//! `invoice_data.csv` artifact; the writer is flushed and closed before the
//! function returns on every path, including failure.

use crate::error::ExtractError;
use crate::pipeline::parse::Record;
use std::io;
use std::path::Path;
use tracing::debug;

/// Serialize records as CSV bytes, in record order, without a header.
pub fn csv_bytes(records: &[Record]) -> Result<Vec<u8>, ExtractError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for record in records {
        wtr.write_record([record.key.as_str(), record.value.as_str()])
            .map_err(|e| ExtractError::Internal(format!("CSV serialisation failed: {e}")))?;
    }
    wtr.into_inner()
        .map_err(|e| ExtractError::Internal(format!("CSV buffer flush failed: {e}")))
}

/// Write the CSV export to `path`, truncating any existing content.
///
/// No append, no versioning: the file is fully regenerated on every
/// extraction and the previous export is lost.
pub fn write_csv(records: &[Record], path: &Path) -> Result<(), ExtractError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| ExtractError::ExportFailed {
        path: path.to_path_buf(),
        source: csv_to_io(e),
    })?;

    for record in records {
        wtr.write_record([record.key.as_str(), record.value.as_str()])
            .map_err(|e| ExtractError::ExportFailed {
                path: path.to_path_buf(),
                source: csv_to_io(e),
            })?;
    }

    wtr.flush().map_err(|e| ExtractError::ExportFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!("Wrote {} CSV rows to {}", records.len(), path.display());
    Ok(())
}

/// Unwrap the I/O error inside a `csv::Error`, if that is what it carries.
fn csv_to_io(e: csv::Error) -> io::Error {
    match e.into_kind() {
        csv::ErrorKind::Io(io_err) => io_err,
        other => io::Error::other(format!("{other:?}")),
    }
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
    fn rows_in_order_no_header() {
        let bytes = csv_bytes(&[
            record("Invoice Number", "INV-001"),
            record("Date", "2024-01-05"),
        ])
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "Invoice Number,INV-001\nDate,2024-01-05\n");
    }

    #[test]
    fn empty_records_produce_empty_file() {
        assert!(csv_bytes(&[]).unwrap().is_empty());
    }

    #[test]
    fn comma_in_value_is_quoted() {
        let bytes = csv_bytes(&[record("Total", "1,234.56")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "Total,\"1,234.56\"\n");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let bytes = csv_bytes(&[record("Note", "say \"hi\"")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "Note,\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn quoted_fields_round_trip_through_a_csv_reader() {
        let records = vec![
            record("Total", "1,234.56"),
            record("Address", "1 Main St\nSpringfield"),
        ];
        let bytes = csv_bytes(&records).unwrap();

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes.as_slice());
        let read_back: Vec<Record> = rdr
            .records()
            .map(|r| {
                let row = r.unwrap();
                record(&row[0], &row[1])
            })
            .collect();
        assert_eq!(read_back, records);
    }

    #[test]
    fn write_is_idempotent_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice_data.csv");

        let many = vec![record("A", "1"), record("B", "2"), record("C", "3")];
        write_csv(&many, &path).unwrap();
        let first = std::fs::read(&path).unwrap();
        write_csv(&many, &path).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);

        // A shorter export fully replaces the longer one.
        write_csv(&[record("A", "1")], &path).unwrap();
        let replaced = String::from_utf8(std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(replaced, "A,1\n");
    }

    #[test]
    fn unwritable_destination_is_export_failed() {
        let err = write_csv(&[record("A", "1")], Path::new("/definitely/missing/dir/out.csv"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::ExportFailed { .. }));
    }
}
