//! Outline mode: one JSON outline per input PDF.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::BatchConfig;
use crate::decode::SpanSource;
use crate::error::{Error, Result};
use crate::heuristics::{select_title, FontProfile, OutlineBuilder};
use crate::model::{DocumentOutline, TextSpan};

/// Counts for a completed outline batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutlineBatchSummary {
    /// Outline files written
    pub written: usize,
    /// Documents that fell back to the degraded placeholder
    pub degraded: usize,
    /// Documents whose output could not be written at all
    pub failed: usize,
}

/// Extract title and outline for one PDF.
///
/// Never fails: decode errors and anything unexpected degrade to the
/// `"Error Processing Document"` placeholder so one bad file cannot abort
/// a batch.
pub fn extract_document_outline(source: &dyn SpanSource, path: &Path) -> DocumentOutline {
    log::info!("processing PDF: {}", path.display());
    match try_extract(source, path) {
        Ok(outline) => outline,
        Err(e) => {
            log::error!("error processing {}: {}", path.display(), e);
            DocumentOutline::degraded()
        }
    }
}

fn try_extract(source: &dyn SpanSource, path: &Path) -> Result<DocumentOutline> {
    let doc = source.decode_file(path)?;
    let spans: Vec<&TextSpan> = doc.spans().collect();

    if spans.is_empty() {
        return Ok(DocumentOutline::empty_document());
    }

    let profile = FontProfile::from_spans(spans.iter().copied());
    log::info!(
        "font profile: body={:.1}, headings={:?}",
        profile.body_size,
        profile.top_sizes(3)
    );

    let title = select_title(spans.iter().copied());
    log::info!("extracted title: {}", title);

    let outline = OutlineBuilder::default().build(spans.iter().copied(), &profile);
    log::info!("extracted {} headings", outline.len());

    Ok(DocumentOutline { title, outline })
}

/// Process every PDF in the input directory, writing `<stem>.json` next to
/// the outline of each into the output directory.
///
/// A missing input directory is fatal; an input directory without PDFs
/// logs a warning and succeeds without writing anything.
pub fn process_outline_batch(
    source: &dyn SpanSource,
    config: &BatchConfig,
) -> Result<OutlineBatchSummary> {
    if !config.input_dir.is_dir() {
        return Err(Error::MissingInput(config.input_dir.clone()));
    }

    let pdf_files = list_pdf_files(&config.input_dir)?;
    if pdf_files.is_empty() {
        log::warn!("no PDF files found in {}", config.input_dir.display());
        return Ok(OutlineBatchSummary::default());
    }

    fs::create_dir_all(&config.output_dir)?;
    log::info!("found {} PDF files to process", pdf_files.len());

    let outcomes: Vec<Option<bool>> = pdf_files
        .par_iter()
        .map(|path| match write_outline(source, path, &config.output_dir) {
            Ok(degraded) => Some(degraded),
            Err(e) => {
                log::error!("failed to process {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    let mut summary = OutlineBatchSummary::default();
    for outcome in outcomes {
        match outcome {
            Some(true) => {
                summary.written += 1;
                summary.degraded += 1;
            }
            Some(false) => summary.written += 1,
            None => summary.failed += 1,
        }
    }

    Ok(summary)
}

fn write_outline(source: &dyn SpanSource, path: &Path, output_dir: &Path) -> Result<bool> {
    let outline = extract_document_outline(source, path);

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    let output_path = output_dir.join(format!("{}.json", stem));

    let json = serde_json::to_string_pretty(&outline)
        .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
    fs::write(&output_path, json)?;
    log::info!("saved: {}", output_path.display());

    Ok(outline.is_degraded())
}

fn list_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}
