//! Per-file extraction pipeline shared by the extract and batch commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use docent_core::{
    build_prompt, download_file_name, is_supported_file, normalize, DocumentType, ExtractionRecord, ExtractionResult,
    SummaryStats, SUPPORTED_FILE_TYPES,
};
use docent_vision::{ImagePayload, VisionProvider, VisionRequest};

use crate::history::HistoryStore;

/// Outcome of running one file through a provider.
pub struct FileExtraction {
    /// File name without directories.
    pub filename: String,
    /// Document type after resolving auto-detect.
    pub document_type: DocumentType,
    pub provider: String,
    pub model: String,
    pub result: ExtractionResult,
    /// Why the provider produced no text, if it failed.
    pub error: Option<String>,
    pub processing_time_ms: u64,
}

/// Check that `path` exists and has a supported extension.
pub fn check_input(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    if !is_supported_file(path) {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        anyhow::bail!(
            "Unsupported file format: '{}' (supported: {})",
            extension,
            SUPPORTED_FILE_TYPES.join(", ")
        );
    }
    Ok(())
}

/// Run `path` through `provider`.
///
/// Reading the file is the only hard failure. Image decoding and provider
/// errors are logged and turned into a "No data" result.
pub async fn extract_file(
    path: &Path,
    document_type: DocumentType,
    provider: &dyn VisionProvider,
    jpeg_quality: u8,
) -> anyhow::Result<FileExtraction> {
    let start = Instant::now();
    let document_type = document_type.resolve();
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    let data = fs::read(path)?;
    info!(
        "Extracting {} as {} with {} ({})",
        filename,
        document_type,
        provider.provider(),
        provider.model()
    );

    let (raw_text, error) = match request_text(&data, document_type, provider, jpeg_quality).await {
        Ok(text) => (Some(text), None),
        Err(e) => {
            warn!("Extraction failed for {}: {}", filename, e);
            (None, Some(e.to_string()))
        }
    };

    let result = normalize(raw_text.as_deref());
    let processing_time_ms = start.elapsed().as_millis() as u64;
    debug!(
        "{} -> {} in {}ms",
        filename,
        result.status(),
        processing_time_ms
    );

    Ok(FileExtraction {
        filename,
        document_type,
        provider: provider.provider().display_name().to_string(),
        model: provider.model().to_string(),
        result,
        error,
        processing_time_ms,
    })
}

async fn request_text(
    data: &[u8],
    document_type: DocumentType,
    provider: &dyn VisionProvider,
    jpeg_quality: u8,
) -> docent_vision::Result<String> {
    let image = ImagePayload::from_bytes(data, jpeg_quality)?;
    let request = VisionRequest::new(build_prompt(document_type), image);
    provider.extract(&request).await
}

impl FileExtraction {
    /// History record for this extraction.
    pub fn to_record(&self) -> ExtractionRecord {
        ExtractionRecord::from_result(
            self.document_type,
            self.filename.clone(),
            &self.result,
            self.provider.clone(),
            self.model.clone(),
        )
    }

    /// Default file name when saving this extraction in `format`.
    pub fn output_name(&self, format: OutputFormat) -> PathBuf {
        Path::new(&download_file_name(&self.filename)).with_extension(format.extension())
    }

    /// Save to `history` if there is text worth keeping.
    pub fn record_in(&self, history: Option<&HistoryStore>) -> anyhow::Result<Option<i64>> {
        match history {
            Some(store) if self.result.is_success() => {
                let id = store.insert(&self.to_record())?;
                debug!("Recorded {} in history as #{}", self.filename, id);
                Ok(Some(id))
            }
            _ => Ok(None),
        }
    }

    /// Render in the requested output format.
    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        match format {
            OutputFormat::Text => Ok(self.result.formatted().to_string()),
            OutputFormat::Raw => Ok(self.result.raw_text().to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonOutput {
                filename: &self.filename,
                document_type: self.document_type.label(),
                provider: &self.provider,
                model: &self.model,
                summary: self.result.stats(),
                extracted_text: self.result.raw_text(),
                error: self.error.as_deref(),
            })?),
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    filename: &'a str,
    document_type: &'a str,
    provider: &'a str,
    model: &'a str,
    summary: &'a SummaryStats,
    extracted_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Extracted text with timestamp header and separators
    Text,
    /// JSON with summary statistics
    Json,
    /// Extracted text only
    Raw,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text | OutputFormat::Raw => "txt",
            OutputFormat::Json => "json",
        }
    }
}
