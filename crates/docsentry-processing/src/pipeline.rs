//! Ingestion pipeline orchestrator.
//!
//! Every file runs through the same fixed sequence of stages. Each stage
//! gates the next: the first rejection ends processing of that file, and in
//! a batch it ends the whole batch.

use std::sync::Arc;

use docsentry_core::{
    BatchAccumulator, BatchResult, DocumentKind, ErrorMetadata, ExtractionResult, FileMetadata,
    IngestConfig, IngestError, LogLevel, UploadedBlob,
};
use futures::stream::{self, StreamExt};

use crate::extract::extractor_for;
use crate::sanitize::sanitize_filename;
use crate::scanner::scanner_for;
use crate::signature::verify_signature;
use crate::stats::{size_kb, TextStats};
use crate::validator::UploadValidator;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    ExtensionCheck,
    Sanitize,
    EmptyCheck,
    SizeGuard,
    Signature,
    ThreatScan,
    Extract,
    TextCheck,
    Metadata,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ExtensionCheck => "extension_check",
            Stage::Sanitize => "sanitize",
            Stage::EmptyCheck => "empty_check",
            Stage::SizeGuard => "size_guard",
            Stage::Signature => "signature",
            Stage::ThreatScan => "threat_scan",
            Stage::Extract => "extract",
            Stage::TextCheck => "text_check",
            Stage::Metadata => "metadata",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notified before each stage runs. Lets callers audit the order of
/// operations without touching the pipeline.
pub trait StageObserver: Send + Sync {
    fn stage_started(&self, filename: &str, stage: Stage);
}

/// No-op implementation used when nobody is watching
pub struct NoOpObserver;

impl StageObserver for NoOpObserver {
    fn stage_started(&self, _filename: &str, _stage: Stage) {}
}

pub struct IngestPipeline {
    config: IngestConfig,
    validator: UploadValidator,
    observer: Arc<dyn StageObserver>,
}

impl IngestPipeline {
    pub fn new(config: IngestConfig) -> Self {
        let validator = UploadValidator::from_config(&config);
        Self {
            config,
            validator,
            observer: Arc::new(NoOpObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StageObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Validate, scan and extract a single file.
    pub fn ingest(&self, blob: &UploadedBlob) -> Result<ExtractionResult, IngestError> {
        let mut stage = Stage::ExtensionCheck;
        let result = self.run_stages(blob, &mut stage);

        match &result {
            Ok(extracted) => tracing::debug!(
                filename = %extracted.metadata.filename,
                kind = %extracted.metadata.extension,
                words = extracted.metadata.words,
                "Document ingested"
            ),
            Err(e) => log_rejection(&blob.filename, stage, e),
        }

        result
    }

    fn run_stages(
        &self,
        blob: &UploadedBlob,
        stage: &mut Stage,
    ) -> Result<ExtractionResult, IngestError> {
        let mut enter = |next: Stage| {
            *stage = next;
            self.observer.stage_started(&blob.filename, next);
        };

        enter(Stage::ExtensionCheck);
        let extension = blob.extension();
        self.validator.validate_extension(&extension)?;

        enter(Stage::Sanitize);
        let filename = sanitize_filename(&blob.filename);

        enter(Stage::EmptyCheck);
        self.validator.validate_not_empty(blob.len())?;

        enter(Stage::SizeGuard);
        self.validator.validate_file_size(blob.len())?;

        enter(Stage::Signature);
        verify_signature(&blob.content, &extension)?;
        // Every extension with a registered signature is a known kind
        let kind = DocumentKind::from_extension(&extension)
            .ok_or_else(|| IngestError::SignatureNotRegistered { extension })?;

        enter(Stage::ThreatScan);
        match scanner_for(kind, &self.config) {
            Some(scanner) => scanner.scan(&blob.content)?,
            None => {
                tracing::debug!(kind = %kind, "No threat scanner for kind, signature check only")
            }
        }

        enter(Stage::Extract);
        let raw = extractor_for(kind, &self.config)
            .extract(&blob.content)
            .map_err(|e| IngestError::extraction(kind, e))?;

        enter(Stage::TextCheck);
        let text = raw.trim();
        if text.is_empty() {
            return Err(IngestError::NoExtractableText);
        }

        enter(Stage::Metadata);
        let stats = TextStats::of(text);
        let metadata = FileMetadata {
            filename,
            original_filename: blob.filename.clone(),
            extension: kind,
            size_bytes: blob.len(),
            size_kb: size_kb(blob.len()),
            characters: stats.characters,
            words: stats.words,
            lines: stats.lines,
        };

        Ok(ExtractionResult {
            text: text.to_string(),
            metadata,
        })
    }

    /// Ingest files sequentially in input order. The first rejection fails
    /// the whole batch.
    pub fn ingest_batch(&self, blobs: &[UploadedBlob]) -> Result<BatchResult, IngestError> {
        let mut accumulator = BatchAccumulator::with_capacity(blobs.len());
        for blob in blobs {
            accumulator.push(self.ingest(blob)?);
        }

        let batch = accumulator.finish();
        log_batch(&batch);
        Ok(batch)
    }

    /// Ingest files on the blocking pool with bounded concurrency.
    ///
    /// Results are reassembled in input order, so the outcome is identical
    /// to [`IngestPipeline::ingest_batch`]. The first rejection in input
    /// order fails the batch and nothing partial is returned.
    pub async fn ingest_batch_concurrent(
        self: &Arc<Self>,
        blobs: Vec<UploadedBlob>,
    ) -> Result<BatchResult, IngestError> {
        let concurrency = self.config.batch_concurrency.max(1);
        let mut accumulator = BatchAccumulator::with_capacity(blobs.len());

        let mut results = stream::iter(blobs)
            .map(|blob| {
                let pipeline = Arc::clone(self);
                tokio::task::spawn_blocking(move || pipeline.ingest(&blob))
            })
            .buffered(concurrency);

        while let Some(joined) = results.next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) => match e.try_into_panic() {
                    Ok(payload) => std::panic::resume_unwind(payload),
                    Err(e) => return Err(IngestError::TaskFailed(e.to_string())),
                },
            };
            accumulator.push(result?);
        }

        let batch = accumulator.finish();
        log_batch(&batch);
        Ok(batch)
    }
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::new(IngestConfig::default())
    }
}

fn log_batch(batch: &BatchResult) {
    tracing::info!(
        total_files = batch.total_files,
        total_words = batch.total_words,
        total_characters = batch.total_characters,
        "Batch ingested"
    );
}

/// Log a rejection at the level its error class asks for. The raw filename
/// is attacker-controlled, so it is logged with `Debug` escaping.
fn log_rejection(filename: &str, stage: Stage, err: &IngestError) {
    let error_code = err.error_code();
    let error_type = err.error_type();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(
            filename = ?filename,
            stage = %stage,
            error_code,
            error_type,
            error = %err,
            "Upload rejected"
        ),
        LogLevel::Warn => tracing::warn!(
            filename = ?filename,
            stage = %stage,
            error_code,
            error_type,
            error = %err,
            "Upload rejected by security check"
        ),
        LogLevel::Error => tracing::error!(
            filename = ?filename,
            stage = %stage,
            error_code,
            error_type,
            error = %err.detailed_message(),
            "Upload processing failed"
        ),
    }
}
