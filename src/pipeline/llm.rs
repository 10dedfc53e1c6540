//! Model interaction: build the multimodal request and make the single
//! inference call.
//!
//! This module is intentionally thin — the instruction text lives in
//! [`crate::prompts`] so it can be changed without touching request or
//! error-handling logic here. There is exactly one call per extraction:
//! no retry, no caching, no fan-out. The only policy applied is a bounded
//! timeout so a stalled service surfaces as an error instead of hanging
//! the session.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::pipeline::encode;
use crate::pipeline::normalize::ExtractionPayload;
use crate::prompts::DEFAULT_INSTRUCTION_PROMPT;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// The model's reply to one extraction request.
#[derive(Debug, Clone)]
pub struct ModelReply {
    /// Raw response text; no structure is enforced or assumed.
    pub text: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub duration_ms: u64,
}

/// Send the instruction prompt plus the normalised payload to the model and
/// return its textual response.
///
/// ## Message Layout
///
/// 1. **System message** — the fixed invoice-extraction instruction (or a
///    user-supplied override)
/// 2. **User message** — either the document image as a base64 attachment
///    (empty text; the image carries the content) or the PDF's extracted
///    text as the message body
pub async fn run_extraction(
    provider: &Arc<dyn LLMProvider>,
    payload: ExtractionPayload,
    config: &ExtractionConfig,
) -> Result<ModelReply, ExtractError> {
    let start = Instant::now();
    let instruction = config
        .instruction_prompt
        .as_deref()
        .unwrap_or(DEFAULT_INSTRUCTION_PROMPT);

    let messages = match payload {
        ExtractionPayload::Image { mime_type, bytes } => vec![
            ChatMessage::system(instruction),
            ChatMessage::user_with_images("", vec![encode::encode_image(&mime_type, &bytes)]),
        ],
        ExtractionPayload::Text { text } => {
            vec![ChatMessage::system(instruction), ChatMessage::user(text)]
        }
    };

    let options = build_options(config);

    let response = match timeout(
        Duration::from_secs(config.api_timeout_secs),
        provider.chat(&messages, Some(&options)),
    )
    .await
    {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            return Err(ExtractError::ExternalService {
                message: e.to_string(),
            })
        }
        Err(_) => {
            return Err(ExtractError::ApiTimeout {
                secs: config.api_timeout_secs,
            })
        }
    };

    let duration = start.elapsed();
    debug!(
        "Extraction call: {} input tokens, {} output tokens, {:?}",
        response.prompt_tokens, response.completion_tokens, duration
    );

    Ok(ModelReply {
        text: response.content,
        input_tokens: response.prompt_tokens as u64,
        output_tokens: response.completion_tokens as u64,
        duration_ms: duration.as_millis() as u64,
    })
}

/// Build `CompletionOptions` from the extraction config.
fn build_options(config: &ExtractionConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}
