//! Pipeline stages for invoice extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different PDF text backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ normalize ──▶ encode ──▶ llm ──▶ parse ──▶ export
//! (path/URL)  (kind-tag)   (base64)  (model)  (records)  (CSV)
//! ```
//!
//! 1. [`input`]     — resolve the user-supplied path or URL to an in-memory
//!    document with a validated kind (JPEG, PNG, or PDF)
//! 2. [`normalize`] — pass image bytes through untouched, or extract PDF
//!    page text in document order; runs under `spawn_blocking` because PDF
//!    parsing is CPU-bound
//! 3. [`encode`]    — base64-wrap image bytes for the multimodal request body
//! 4. [`llm`]       — the single inference call with a bounded timeout; the
//!    only stage with network I/O
//! 5. [`parse`]     — split the response into `key: value` records, one per
//!    qualifying line
//! 6. [`export`]    — serialise records as header-less CSV, in memory or to
//!    a file

pub mod encode;
pub mod export;
pub mod input;
pub mod llm;
pub mod normalize;
pub mod parse;
