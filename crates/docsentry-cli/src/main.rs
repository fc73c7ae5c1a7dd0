//! docsentry CLI: validate, scan and extract text from untrusted documents.
//!
//! Limits come from DOCSENTRY_* environment variables (or a .env file).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use docsentry_cli::{init_tracing, preview, ErrorReport};
use docsentry_core::{IngestConfig, UploadedBlob};
use docsentry_processing::{sanitize_filename, IngestPipeline};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "docsentry", about = "Untrusted document ingestion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate, scan and extract text from one or more files
    Ingest {
        /// Files to ingest, processed as one batch
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Process files in parallel on the blocking pool
        #[arg(long)]
        concurrent: bool,
        /// Print the batch as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Print the sanitized form of a filename
    Sanitize {
        /// Filename as supplied by an uploader
        name: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn read_blobs(files: &[PathBuf]) -> anyhow::Result<Vec<UploadedBlob>> {
    let mut blobs = Vec::with_capacity(files.len());
    for path in files {
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        blobs.push(UploadedBlob::new(filename, content));
    }
    Ok(blobs)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            files,
            concurrent,
            json,
        } => {
            let config = IngestConfig::from_env().context("Invalid DOCSENTRY_* configuration")?;
            let pipeline = Arc::new(IngestPipeline::new(config));
            let blobs = read_blobs(&files).await?;
            tracing::debug!(files = blobs.len(), concurrent, "Starting ingestion");

            let outcome = if concurrent {
                pipeline.ingest_batch_concurrent(blobs).await
            } else {
                pipeline.ingest_batch(&blobs)
            };

            match outcome {
                Ok(batch) if json => print_json(&batch.response())?,
                Ok(batch) => {
                    println!("{}", batch.combined_text);
                    for file in batch.files() {
                        eprintln!(
                            "{}: {} words, {} characters, {} KB",
                            preview(file.filename.as_str(), 60),
                            file.words,
                            file.characters,
                            file.size_kb
                        );
                    }
                }
                Err(err) => {
                    let report = ErrorReport::from(&err);
                    if json {
                        print_json(&report)?;
                    } else {
                        eprintln!("Rejected ({}): {}", report.code, report.error);
                    }
                    std::process::exit(1);
                }
            }
        }
        Commands::Sanitize { name } => {
            println!("{}", sanitize_filename(&name));
        }
    }

    Ok(())
}
