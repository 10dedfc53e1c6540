//! # invoice2csv
//!
//! Extract invoice fields from images and PDFs into CSV using multimodal
//! language models.
//!
//! ## Why this crate?
//!
//! Invoices arrive as photos, scans, and PDFs with wildly inconsistent
//! layouts. Instead of template- or regex-based field extraction, this crate
//! hands the document to a multimodal LLM — the image directly, or the PDF's
//! text layer — and turns the model's line-oriented answer into an ordered
//! `key,value` CSV export.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document
//!  │
//!  ├─ 1. Input      resolve local file or download from URL (JPEG/PNG/PDF)
//!  ├─ 2. Normalize  image bytes pass through; PDF pages → concatenated text
//!  ├─ 3. Encode     image → base64 attachment for the request body
//!  ├─ 4. LLM        one bounded call to gemini / gpt / claude / …
//!  ├─ 5. Parse      response lines split on the first ": " → records
//!  └─ 6. Export     header-less key,value CSV (in memory or invoice_data.csv)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use invoice2csv::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / …
//!     let config = ExtractionConfig::default();
//!     let output = extract("invoice.pdf", &config).await?;
//!     println!("{}", output.text);
//!     std::fs::write("invoice_data.csv", output.csv_bytes()?)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `invoice2csv` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only
//! deps:
//! ```toml
//! invoice2csv = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::ExtractError;
pub use extract::{extract, extract_document, extract_sync, extract_to_file};
pub use output::{ExtractionOutput, ExtractionStats};
pub use pipeline::input::{DocumentKind, UploadedDocument};
pub use pipeline::normalize::ExtractionPayload;
pub use pipeline::parse::{parse_records, Record};
pub use session::Session;
