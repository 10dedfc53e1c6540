//! Instruction prompts for invoice field extraction.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the same instruction is used for every
//!    extraction, whether the input was an image or a PDF; tweaking the
//!    wording requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can import and inspect the prompt directly
//!    without spinning up a real model.
//!
//! Callers can override the default via
//! [`crate::config::ExtractionConfig::instruction_prompt`]; the constant here
//! is used only when no override is provided.

/// Default instruction prompt sent with every extraction request.
///
/// This prompt is used when `ExtractionConfig::instruction_prompt` is `None`.
/// Asking for one `Field Name: value` pair per line is what makes the
/// response parseable by [`crate::pipeline::parse::parse_records`]; the model
/// is still free to ignore it, in which case the parsed record sequence is
/// simply empty.
pub const DEFAULT_INSTRUCTION_PROMPT: &str = r#"You are an expert in understanding invoices.
You will receive an invoice as an image or as text extracted from a PDF,
and you will have to extract all the data from the invoice.

Output one field per line in the form:

Field Name: value

Extract every field you can identify (invoice number, dates, seller and
buyer details, line items, totals, taxes, payment terms). Do not add
commentary before or after the fields."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_invoice_domain() {
        assert!(DEFAULT_INSTRUCTION_PROMPT.contains("invoice"));
    }

    #[test]
    fn prompt_requests_parseable_lines() {
        // The parser splits on the first ": " per line; the prompt must ask
        // for that exact shape.
        assert!(DEFAULT_INSTRUCTION_PROMPT.contains("Field Name: value"));
    }
}
