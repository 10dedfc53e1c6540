//! Extraction entry points.
//!
//! One document in, one [`ExtractionOutput`] out. The pipeline is strictly
//! sequential — resolve, normalise, call the model once, parse — because the
//! extraction is a single round-trip, not a per-page fan-out.
//!
//! Export is deliberately *not* part of [`extract`]: a successful extraction
//! stays displayable even when the CSV write later fails, and nothing is
//! written at all when the model call fails (the previous export, if any, is
//! left untouched).

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{ExtractionOutput, ExtractionStats};
use crate::pipeline::{export, input, llm, normalize, parse};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Extract invoice fields from a local file or HTTP/HTTPS URL.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - [`ExtractError::UnsupportedFormat`] before any model call when the
///   input is not a JPEG, PNG, or PDF
/// - [`ExtractError::ProviderNotConfigured`] when no usable credential is
///   found in the environment
/// - [`ExtractError::ExternalService`] / [`ExtractError::ApiTimeout`] when
///   the inference call fails
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    let document = input::resolve_input(input_str, config.download_timeout_secs).await?;
    extract_document(document, config).await
}

/// Extract invoice fields from an already-loaded document.
///
/// Used by [`crate::session::Session`] and by embedders that receive the
/// upload bytes directly (the multipart-form case) rather than a path.
pub async fn extract_document(
    document: input::UploadedDocument,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();

    let provider = resolve_provider(config)?;
    let payload = normalize::normalize(document).await?;
    let reply = llm::run_extraction(&provider, payload, config).await?;

    let records = parse::parse_records(&reply.text);
    let total_lines = reply.text.split('\n').count();
    let stats = ExtractionStats {
        input_tokens: reply.input_tokens,
        output_tokens: reply.output_tokens,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        llm_duration_ms: reply.duration_ms,
        parsed_records: records.len(),
        dropped_lines: total_lines - records.len(),
    };

    if records.is_empty() && !reply.text.trim().is_empty() {
        warn!(
            "Model response contained no 'key: value' lines; the export will have no rows. \
             The model may not have followed the expected format."
        );
    }

    info!(
        "Extraction complete: {} records from {} lines, {}ms total",
        stats.parsed_records, total_lines, stats.total_duration_ms
    );

    Ok(ExtractionOutput {
        text: reply.text,
        records,
        stats,
    })
}

/// Extract and write the CSV export in one step.
///
/// The export is written only after a fully successful extraction, so a
/// failed model call can never replace a previous export with an empty file.
/// When the write itself fails the returned error still carries
/// [`ExtractError::ExportFailed`], and the caller that wants the text anyway
/// should use [`extract`] followed by
/// [`ExtractionOutput::write_csv`](crate::output::ExtractionOutput::write_csv).
pub async fn extract_to_file(
    input_str: impl AsRef<str>,
    csv_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let output = extract(input_str, config).await?;
    export::write_csv(&output.records, csv_path.as_ref())?;
    Ok(output)
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(extract(input_str, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Instantiate a named provider with the given model.
fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, ExtractError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        ExtractError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Default model per provider, used when the caller names a provider but no
/// model.
fn default_model_for(provider_name: &str) -> &'static str {
    match provider_name {
        "gemini" => "gemini-2.0-flash",
        _ => "gpt-4.1-nano",
    }
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// The fallback chain lets library users and CLI users each set exactly as
/// much or as little as they need:
///
/// 1. **Pre-built provider** (`config.provider`) — the caller constructed
///    the provider entirely; used as-is. Useful in tests.
///
/// 2. **Named provider + model** (`config.provider_name`) — reads the
///    corresponding API key (`GEMINI_API_KEY`, `OPENAI_API_KEY`, …) from
///    the environment.
///
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`) —
///    both set means the execution environment chose; honoured before
///    key-based detection so the model choice wins even when several API
///    keys are present.
///
/// 4. **Key-based detection** — Gemini is preferred when `GEMINI_API_KEY`
///    is set (the service this tool was built around), then
///    `ProviderFactory::from_env()` scans the remaining known key variables.
///
/// A missing credential comes back as [`ExtractError::ProviderNotConfigured`]
/// with a hint naming the variables to set — a configuration error, never a
/// bare stack trace.
pub(crate) fn resolve_provider(
    config: &ExtractionConfig,
) -> Result<Arc<dyn LLMProvider>, ExtractError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config
            .model
            .as_deref()
            .unwrap_or_else(|| default_model_for(name));
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(gemini_key) = std::env::var("GEMINI_API_KEY") {
        if !gemini_key.is_empty() {
            let model = config.model.as_deref().unwrap_or("gemini-2.0-flash");
            return create_provider("gemini", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| ExtractError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from the environment.\n\
                 Set GEMINI_API_KEY, OPENAI_API_KEY, or ANTHROPIC_API_KEY, or pass --provider.\n\
                 Error: {e}"
            ),
        })?;

    Ok(llm_provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_models_per_provider() {
        assert_eq!(default_model_for("gemini"), "gemini-2.0-flash");
        assert_eq!(default_model_for("openai"), "gpt-4.1-nano");
        assert_eq!(default_model_for("anything-else"), "gpt-4.1-nano");
    }
}
