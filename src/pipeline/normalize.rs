//! Payload normalisation: [`UploadedDocument`] → [`ExtractionPayload`].
//!
//! Images pass through untouched — no resizing, re-encoding, or validation;
//! the model sees exactly the bytes the user uploaded. PDFs are reduced to
//! plain text: pages are visited in document order and each page's text is
//! extracted best-effort, so a scanned page with no text layer simply
//! contributes nothing rather than failing the document.
//!
//! ## Why spawn_blocking?
//!
//! PDF parsing is CPU-bound and `lopdf` is synchronous. Running it on the
//! blocking pool keeps the async runtime's worker threads free during large
//! documents.

use crate::error::ExtractError;
use crate::pipeline::input::{DocumentKind, UploadedDocument};
use lopdf::Document;
use tracing::{debug, warn};

/// The normalised payload handed to the inference call: either the original
/// image bytes with their MIME type, or the PDF's concatenated page text.
#[derive(Debug, Clone)]
pub enum ExtractionPayload {
    Image { mime_type: String, bytes: Vec<u8> },
    Text { text: String },
}

/// Normalise an uploaded document into an extraction payload.
///
/// Pure with respect to the document: same input bytes always yield the
/// same payload.
pub async fn normalize(document: UploadedDocument) -> Result<ExtractionPayload, ExtractError> {
    match document.kind {
        DocumentKind::Image { mime_type } => Ok(ExtractionPayload::Image {
            mime_type,
            bytes: document.bytes,
        }),
        DocumentKind::Pdf => {
            let bytes = document.bytes;
            let text = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
                .await
                .map_err(|e| ExtractError::Internal(format!("PDF task panicked: {e}")))??;

            if text.trim().is_empty() {
                warn!("PDF has no extractable text layer; the model will see an empty document");
            }
            Ok(ExtractionPayload::Text { text })
        }
    }
}

/// Extract plain text from every page, concatenated in page order with no
/// separator inserted between pages.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut doc = Document::load_mem(bytes).map_err(|e| ExtractError::CorruptPdf {
        detail: e.to_string(),
    })?;

    if doc.is_encrypted() {
        // PDFs "protected" with an empty user password open transparently
        // in most viewers; match that behaviour before giving up.
        if doc.decrypt("").is_err() {
            return Err(ExtractError::CorruptPdf {
                detail: "document is encrypted".to_string(),
            });
        }
        debug!("Decrypted PDF with empty password");
    }

    let pages = doc.get_pages();
    debug!("PDF loaded: {} pages", pages.len());

    let mut text = String::new();
    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => text.push_str(&page_text),
            // Best-effort: a page that fails extraction contributes nothing.
            Err(e) => debug!("Page {}: no extractable text ({})", page_num, e),
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn image_passes_through_unchanged() {
        let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3];
        let doc = UploadedDocument {
            kind: DocumentKind::Image {
                mime_type: "image/jpeg".into(),
            },
            bytes: bytes.clone(),
        };

        match normalize(doc).await.unwrap() {
            ExtractionPayload::Image {
                mime_type,
                bytes: out,
            } => {
                assert_eq!(mime_type, "image/jpeg");
                assert_eq!(out, bytes);
            }
            ExtractionPayload::Text { .. } => panic!("image must not become text"),
        }
    }

    #[tokio::test]
    async fn garbage_pdf_is_corrupt() {
        let doc = UploadedDocument {
            kind: DocumentKind::Pdf,
            bytes: b"not a pdf at all".to_vec(),
        };
        let err = normalize(doc).await.unwrap_err();
        assert!(matches!(err, ExtractError::CorruptPdf { .. }));
    }
}
