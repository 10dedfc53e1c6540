//! Error types for the invoice2csv library.
//!
//! A single fatal error enum, [`ExtractError`], covers the whole pipeline:
//! an extraction either produces a complete [`crate::output::ExtractionOutput`]
//! or fails as a whole. There is no per-page partial-failure channel because
//! one document maps to exactly one model call.
//!
//! One condition is deliberately *not* an error: a model response that
//! contains no `key: value` lines parses to an empty record sequence. That is
//! surfaced as a warning by callers (the CSV is legitimately row-less), since
//! treating it as failure would hide the response text the user still wants
//! to see.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the invoice2csv library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The document is neither a supported image nor a PDF.
    #[error("Unsupported document: {detail}\nPlease supply a JPG, PNG, or PDF invoice.")]
    UnsupportedFormat { detail: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The PDF could not be decoded at all.
    #[error("PDF could not be read: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The inference call failed (network, auth, quota, malformed response).
    /// Not retried.
    #[error("Extraction service error: {message}")]
    ExternalService { message: String },

    /// The inference call exceeded the configured timeout.
    #[error("Extraction call timed out after {secs}s\nIncrease --api-timeout or try again.")]
    ApiTimeout { secs: u64 },

    // ── Export errors ─────────────────────────────────────────────────────
    /// Could not create or write the CSV export file. The extraction result
    /// is still valid and displayable when this occurs.
    #[error("Failed to write CSV export '{path}': {source}")]
    ExportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
