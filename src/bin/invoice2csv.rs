//! CLI binary for invoice2csv.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, prints the extracted text, and writes the CSV export.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use invoice2csv::{extract, ExtractionConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract from an invoice photo, write invoice_data.csv
  invoice2csv invoice.jpg

  # Extract from a PDF into a named export
  invoice2csv invoice.pdf -o january.csv

  # Print the extracted text only, no CSV file
  invoice2csv invoice.png --no-csv

  # Structured JSON output (text + records + stats)
  invoice2csv invoice.pdf --json > invoice.json

  # Use a specific model
  invoice2csv --provider openai --model gpt-4.1-mini invoice.jpg

  # Extract from a URL
  invoice2csv https://example.com/uploads/invoice.pdf

SUPPORTED INPUTS:
  JPEG and PNG images are sent to the model as-is; PDFs are reduced to their
  text layer first. Anything else is rejected before any API call is made.

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (preferred when set)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (gemini, openai, anthropic, ollama)
  EDGEQUAKE_MODEL         Override model ID

SETUP:
  1. Set API key:     export GEMINI_API_KEY=...
  2. Extract:         invoice2csv invoice.pdf
"#;

/// Extract invoice fields from images and PDFs into CSV using multimodal LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "invoice2csv",
    version,
    about = "Extract invoice fields from images and PDFs into CSV using multimodal LLMs",
    long_about = "Send an invoice (JPEG, PNG, or PDF — local file or URL) to a multimodal \
language model, print the extracted fields, and export them as comma-separated key,value \
rows. Supports Google Gemini, OpenAI, Anthropic, and any OpenAI-compatible endpoint.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local invoice file path or HTTP/HTTPS URL (JPEG, PNG, or PDF).
    input: String,

    /// Write the CSV export to this path.
    #[arg(short, long, env = "INVOICE2CSV_OUTPUT", default_value = "invoice_data.csv")]
    output: PathBuf,

    /// Skip writing the CSV export.
    #[arg(long, env = "INVOICE2CSV_NO_CSV")]
    no_csv: bool,

    /// Output structured JSON (text + records + stats) instead of plain text.
    #[arg(long, env = "INVOICE2CSV_JSON")]
    json: bool,

    /// LLM model ID (e.g. gemini-2.0-flash, gpt-4.1-nano).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(
        long,
        env = "EDGEQUAKE_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set; \
GEMINI_API_KEY is preferred when several keys are present."
    )]
    provider: Option<String>,

    /// Path to a text file containing a custom instruction prompt.
    #[arg(long, env = "INVOICE2CSV_PROMPT")]
    prompt: Option<PathBuf>,

    /// Max LLM output tokens.
    #[arg(long, env = "INVOICE2CSV_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "INVOICE2CSV_TEMPERATURE", default_value_t = 0.1)]
    temperature: f32,

    /// Inference call timeout in seconds.
    #[arg(long, env = "INVOICE2CSV_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// HTTP download timeout in seconds (URL inputs).
    #[arg(long, env = "INVOICE2CSV_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Disable the busy spinner.
    #[arg(long, env = "INVOICE2CSV_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "INVOICE2CSV_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the extracted text.
    #[arg(short, long, env = "INVOICE2CSV_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library logs go to stderr so stdout stays clean for the extracted
    // text / JSON. The spinner provides the only feedback most users need.
    let show_spinner = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_spinner {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli).await?;

    // ── Run extraction ───────────────────────────────────────────────────
    // The model call is a single blocking round-trip; the spinner is the
    // busy indicator for its duration.
    let spinner = if show_spinner {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Extracting");
        bar.set_message(cli.input.clone());
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let result = extract(&cli.input, &config).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let output = result.context("Extraction failed")?;

    // ── Display ──────────────────────────────────────────────────────────
    // The text is shown before the export is attempted, so a failed CSV
    // write never hides a successful extraction.
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.text.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !output.has_records() && !cli.quiet {
        eprintln!(
            "{} {}",
            yellow("⚠"),
            "No 'key: value' lines recognised in the response — the CSV export has no rows."
        );
    }

    // ── Export ───────────────────────────────────────────────────────────
    if !cli.no_csv {
        output
            .write_csv(&cli.output)
            .context("Failed to write CSV export")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} records  →  {}",
                green("✔"),
                bold(&output.stats.parsed_records.to_string()),
                bold(&cli.output.display().to_string()),
            );
        }
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "   {} tokens in  /  {} tokens out  —  {}ms total",
            dim(&output.stats.input_tokens.to_string()),
            dim(&output.stats.output_tokens.to_string()),
            output.stats.total_duration_ms,
        );
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
async fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let instruction_prompt = if let Some(ref path) = cli.prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read instruction prompt from {path:?}"))?,
        )
    } else {
        None
    };

    let mut builder = ExtractionConfig::builder()
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .api_timeout_secs(cli.api_timeout)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(prompt) = instruction_prompt {
        builder = builder.instruction_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}
