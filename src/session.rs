//! Per-session context: one uploaded document, one extraction result.
//!
//! The interactive surface of this tool holds exactly two pieces of state —
//! the last uploaded file and the last model response. [`Session`] models
//! that as an explicit owned object instead of global mutable state, so an
//! embedder can run any number of concurrent sessions without them
//! overwriting each other; the export is produced as in-memory bytes scoped
//! to the session rather than through a shared file path.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::extract;
use crate::output::ExtractionOutput;
use crate::pipeline::input::{self, UploadedDocument};
use std::path::Path;

/// The lifetime of one user's interaction: at most one document and one
/// extraction result at a time, each replaced wholesale.
#[derive(Debug)]
pub struct Session {
    config: ExtractionConfig,
    document: Option<UploadedDocument>,
    last: Option<ExtractionOutput>,
}

impl Session {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            document: None,
            last: None,
        }
    }

    /// Load a document from a local path or URL, replacing any prior upload.
    pub async fn load(&mut self, input: &str) -> Result<(), ExtractError> {
        let document =
            input::resolve_input(input, self.config.download_timeout_secs).await?;
        self.document = Some(document);
        Ok(())
    }

    /// Load a document from raw upload bytes (the multipart-form case),
    /// replacing any prior upload.
    pub fn load_bytes(&mut self, name: Option<&str>, bytes: Vec<u8>) -> Result<(), ExtractError> {
        self.document = Some(UploadedDocument::from_bytes(name, bytes)?);
        Ok(())
    }

    /// The currently loaded document, if any.
    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    /// Run the extraction on the loaded document. The previous result is
    /// replaced entirely; no history is retained.
    pub async fn extract(&mut self) -> Result<&ExtractionOutput, ExtractError> {
        let document = self
            .document
            .clone()
            .ok_or_else(|| ExtractError::UnsupportedFormat {
                detail: "no document supplied".to_string(),
            })?;

        let output = extract::extract_document(document, &self.config).await?;
        Ok(self.last.insert(output))
    }

    /// The most recent extraction result, if any.
    pub fn last_output(&self) -> Option<&ExtractionOutput> {
        self.last.as_ref()
    }

    /// The CSV export of the most recent extraction, as bytes owned by this
    /// session.
    pub fn export_csv(&self) -> Result<Vec<u8>, ExtractError> {
        match self.last {
            Some(ref output) => output.csv_bytes(),
            None => Err(ExtractError::Internal(
                "no extraction result to export".to_string(),
            )),
        }
    }

    /// Write the most recent extraction's CSV to `path`.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), ExtractError> {
        match self.last {
            Some(ref output) => output.write_csv(path.as_ref()),
            None => Err(ExtractError::Internal(
                "no extraction result to export".to_string(),
            )),
        }
    }
}
