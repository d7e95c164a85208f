//! LumenLex command line
//!
//! Runs the simplification pipeline without the HTTP server:
//!
//! - `extract`: print the normalized text of a `.pdf` / `.docx`
//! - `simplify`: rewrite a contract and write JSON, HTML and PDF
//! - `edit`: apply one instruction to a saved JSON document
//!
//! Logs go to stderr; written file paths are printed to stdout.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use render_engine::{HtmlOnlyRenderer, TypstRenderer};
use simplify_core::{
    decode_document, ArtifactRenderer, ContractSession, EditOutcome, EditRequest, GeminiClient,
    GeminiConfig, Simplifier, SimplifierOptions, SourceContextPolicy,
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod output;

use output::{collect_outputs, write_outputs};

#[derive(Parser, Debug)]
#[command(name = "lumenlex")]
#[command(version, about = "Simplify legal contracts into plain language")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Gemini model
    #[arg(long, global = true, env = "LUMENLEX_MODEL")]
    model: Option<String>,

    /// Rewrite call timeout in milliseconds
    #[arg(long, global = true, default_value = "120000")]
    timeout_ms: u64,

    /// When to send the original text with whole-document edits: never, heuristic, always
    #[arg(long, global = true, default_value = "heuristic")]
    source_context: SourceContextPolicy,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized text extracted from a contract
    Extract {
        /// Contract file (.pdf or .docx)
        file: PathBuf,
    },

    /// Simplify a contract and write the results
    Simplify {
        /// Contract file (.pdf or .docx)
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Apply an instruction to a previously simplified document
    Edit {
        /// Simplified document JSON written by `simplify`
        document: PathBuf,

        /// Name of the original contract file, used for output names
        #[arg(long)]
        source_name: String,

        /// Zero-based section to edit; omit to edit the whole document
        #[arg(long)]
        section: Option<usize>,

        /// What to change
        #[arg(short, long)]
        instruction: String,

        /// Original contract, offered as context for whole-document edits
        #[arg(long)]
        source: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Directory for the written files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Skip PDF compilation and write JSON and HTML only
    #[arg(long)]
    no_pdf: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &cli.command {
        Command::Extract { file } => {
            let (label, bytes) = read_input(file)?;
            let text = contract_extract::extract_raw_text(&label, &bytes)?;
            println!("{}", text);
        }
        Command::Simplify { file, output } => {
            let (label, bytes) = read_input(file)?;
            let mut session = ContractSession::from_upload(&label, &bytes)?;

            let simplifier = build_simplifier(&cli, output.no_pdf)?;
            let outcome = simplifier.ingest(&mut session).await?;

            finish(&session, &outcome, output)?;
        }
        Command::Edit {
            document,
            source_name,
            section,
            instruction,
            source,
            output,
        } => {
            let saved = fs::read_to_string(document)
                .with_context(|| format!("reading {}", document.display()))?;
            let document = decode_document(&saved)?;

            let source_text = match source {
                Some(path) => {
                    let (label, bytes) = read_input(path)?;
                    contract_extract::extract_raw_text(&label, &bytes)?
                }
                None => String::new(),
            };

            let mut session =
                ContractSession::with_document(source_name.as_str(), source_text, document);
            let request = match section {
                Some(index) => EditRequest::section(*index, instruction.as_str()),
                None => EditRequest::document(instruction.as_str()),
            };

            let simplifier = build_simplifier(&cli, output.no_pdf)?;
            let outcome = simplifier.apply(&mut session, &request).await?;

            finish(&session, &outcome, output)?;
        }
    }

    Ok(())
}

fn build_simplifier(cli: &Cli, no_pdf: bool) -> Result<Simplifier> {
    let config = apply_overrides(GeminiConfig::from_env()?, cli);
    tracing::info!("Using model {}", config.model);

    let renderer: Arc<dyn ArtifactRenderer> = if no_pdf {
        Arc::new(HtmlOnlyRenderer)
    } else {
        Arc::new(TypstRenderer::new())
    };

    Ok(
        Simplifier::new(Arc::new(GeminiClient::new(config)?), renderer).with_options(
            SimplifierOptions {
                call_timeout: Some(Duration::from_millis(cli.timeout_ms)),
                source_context: cli.source_context,
            },
        ),
    )
}

/// Command-line model choice and the HTTP timeout on top of the environment
fn apply_overrides(config: GeminiConfig, cli: &Cli) -> GeminiConfig {
    let config = config.with_request_timeout(Duration::from_millis(cli.timeout_ms));
    match &cli.model {
        Some(model) => config.with_model(model.as_str()),
        None => config,
    }
}

fn finish(session: &ContractSession, outcome: &EditOutcome, output: &OutputArgs) -> Result<()> {
    if let Some(error) = &outcome.render_error {
        tracing::warn!("Rendering failed, artifacts not written: {}", error);
    }

    let files = collect_outputs(session, &output.out_dir, !output.no_pdf)?;
    write_outputs(&files)?;

    tracing::info!(
        "Revision {} with {} sections",
        outcome.revision,
        outcome.sections
    );
    for file in &files {
        println!("{}", file.path.display());
    }
    Ok(())
}

/// File name (used to pick the extractor) and contents
fn read_input(path: &Path) -> Result<(String, Vec<u8>)> {
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} is not a file path", path.display()))?;
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok((label, bytes))
}
