//! Input resolution: normalise a user-supplied path or URL to an
//! [`UploadedDocument`] held in memory.
//!
//! The document kind is decided from the declared extension first — an
//! unrecognised extension such as `.txt` is rejected here, before any
//! network call to the model is attempted. Content sniffing (magic bytes)
//! is only a fallback for inputs with no usable extension, e.g. a URL whose
//! path ends in an opaque identifier.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The kind of an uploaded document, as declared by its extension
/// (or sniffed from its bytes when no extension is available).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// A raster image, sent to the model as-is.
    Image {
        /// Declared MIME type, e.g. "image/jpeg".
        mime_type: String,
    },
    /// A PDF document; page text is extracted before the model call.
    Pdf,
}

/// An uploaded invoice document. Immutable once constructed; a session
/// replaces it wholesale on re-upload.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Construct a document from raw upload bytes plus an optional file name
    /// hint. This is the multipart-form-upload equivalent for embedders.
    pub fn from_bytes(name: Option<&str>, bytes: Vec<u8>) -> Result<Self, ExtractError> {
        let kind = detect_kind(name, &bytes)?;
        Ok(Self { kind, bytes })
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to an in-memory document.
///
/// If the input is a URL, download it. If it is a local file, read it.
/// Either way the declared kind is validated before returning.
pub async fn resolve_input(
    input: &str,
    timeout_secs: u64,
) -> Result<UploadedDocument, ExtractError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Read a local file, validating existence and kind.
fn resolve_local(path_str: &str) -> Result<UploadedDocument, ExtractError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(ExtractError::FileNotFound { path });
    }

    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(ExtractError::FileNotFound { path });
        }
    };

    let kind = detect_kind(path.to_str(), &bytes)?;
    debug!("Resolved local document: {} ({:?})", path.display(), kind);
    Ok(UploadedDocument { kind, bytes })
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<UploadedDocument, ExtractError> {
    info!("Downloading document from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ExtractError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ExtractError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let name = extract_filename(url);
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .to_vec();

    let kind = detect_kind(name.as_deref(), &bytes)?;
    info!("Downloaded {} bytes ({:?})", bytes.len(), kind);
    Ok(UploadedDocument { kind, bytes })
}

/// Extract the last path segment of the URL, if it carries an extension.
fn extract_filename(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if !last.is_empty() && last.contains('.') {
        Some(last.to_string())
    } else {
        None
    }
}

/// Decide the document kind from the declared name, falling back to magic
/// bytes when no extension is available.
///
/// A *present but unsupported* extension is rejected outright: the user
/// declared a kind we do not handle, and guessing from content would mask
/// that mistake.
fn detect_kind(name: Option<&str>, bytes: &[u8]) -> Result<DocumentKind, ExtractError> {
    if let Some(ext) = name.and_then(extension_of) {
        return match ext.as_str() {
            "jpg" | "jpeg" => Ok(DocumentKind::Image {
                mime_type: "image/jpeg".to_string(),
            }),
            "png" => Ok(DocumentKind::Image {
                mime_type: "image/png".to_string(),
            }),
            "pdf" => Ok(DocumentKind::Pdf),
            other => Err(ExtractError::UnsupportedFormat {
                detail: format!("extension '.{other}' is not supported"),
            }),
        };
    }

    sniff_kind(bytes)
}

/// Lower-cased extension of a file name, if any.
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Magic-byte fallback for inputs without a usable extension.
fn sniff_kind(bytes: &[u8]) -> Result<DocumentKind, ExtractError> {
    if bytes.starts_with(b"%PDF") {
        return Ok(DocumentKind::Pdf);
    }

    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => Ok(DocumentKind::Image {
            mime_type: "image/jpeg".to_string(),
        }),
        Ok(image::ImageFormat::Png) => Ok(DocumentKind::Image {
            mime_type: "image/png".to_string(),
        }),
        Ok(other) => Err(ExtractError::UnsupportedFormat {
            detail: format!("detected {other:?} content, expected JPEG, PNG, or PDF"),
        }),
        Err(_) => Err(ExtractError::UnsupportedFormat {
            detail: "could not recognise the document content".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid PNG header (8-byte signature).
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/invoice.pdf"));
        assert!(is_url("http://example.com/invoice.png"));
        assert!(!is_url("/tmp/invoice.pdf"));
        assert!(!is_url("invoice.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn kind_from_extension() {
        let jpeg = detect_kind(Some("scan.JPG"), &[]).unwrap();
        assert_eq!(
            jpeg,
            DocumentKind::Image {
                mime_type: "image/jpeg".into()
            }
        );
        let png = detect_kind(Some("scan.png"), &[]).unwrap();
        assert_eq!(
            png,
            DocumentKind::Image {
                mime_type: "image/png".into()
            }
        );
        assert_eq!(detect_kind(Some("doc.pdf"), &[]).unwrap(), DocumentKind::Pdf);
    }

    #[test]
    fn unsupported_extension_rejected_even_with_image_bytes() {
        // The declared kind wins: a .txt upload is rejected regardless of
        // what its bytes happen to look like.
        let err = detect_kind(Some("invoice.txt"), PNG_MAGIC).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat { .. }));
    }

    #[test]
    fn sniffing_used_without_extension() {
        assert_eq!(
            detect_kind(Some("no-extension"), b"%PDF-1.7 ...").unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            detect_kind(None, PNG_MAGIC).unwrap(),
            DocumentKind::Image {
                mime_type: "image/png".into()
            }
        );
        assert_eq!(
            detect_kind(None, JPEG_MAGIC).unwrap(),
            DocumentKind::Image {
                mime_type: "image/jpeg".into()
            }
        );
    }

    #[test]
    fn unrecognised_bytes_rejected() {
        let err = detect_kind(None, b"plain text, not a document").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat { .. }));
    }

    #[test]
    fn from_bytes_builds_document() {
        let doc = UploadedDocument::from_bytes(Some("invoice.png"), PNG_MAGIC.to_vec()).unwrap();
        assert_eq!(
            doc.kind,
            DocumentKind::Image {
                mime_type: "image/png".into()
            }
        );
        assert_eq!(doc.bytes, PNG_MAGIC);
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = resolve_input("/definitely/not/a/real/invoice.pdf", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound { .. }));
    }
}
