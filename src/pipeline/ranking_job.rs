//! Ranking mode: persona-driven digest across a document collection.

use std::fs;
use std::path::Path;

use chrono::Utc;
use rayon::prelude::*;

use super::BatchConfig;
use crate::decode::SpanSource;
use crate::error::{Error, Result};
use crate::heuristics::{SectionSegmenter, SubsectionExtractor};
use crate::model::{
    RankedSection, RankingManifest, RankingMetadata, RankingOutput, Section,
};
use crate::rank::RelevanceRanker;

const MANIFEST_NAME: &str = "input.json";
const RESULT_NAME: &str = "result.json";

/// Run a full ranking batch: read `input.json`, segment every listed PDF,
/// rank all sections in one pass, and write `result.json`.
///
/// On failure an error result carrying `metadata.error` is still written
/// before the error is returned, so downstream consumers always find a
/// JSON file.
pub fn process_ranking_batch(
    source: &dyn SpanSource,
    ranker: &RelevanceRanker,
    config: &BatchConfig,
) -> Result<RankingOutput> {
    fs::create_dir_all(&config.output_dir)?;

    match collect_and_rank(source, ranker, config) {
        Ok(output) => {
            write_result(&config.output_dir, &output)?;
            log::info!(
                "selected {} sections and {} subsections",
                output.sections.len(),
                output.subsections.len()
            );
            Ok(output)
        }
        Err(e) => {
            log::error!("error during ranking batch: {}", e);
            let fallback = RankingOutput::from_error(&e, Utc::now().to_rfc3339());
            if let Err(write_err) = write_result(&config.output_dir, &fallback) {
                log::warn!("failed to write error result: {}", write_err);
            }
            Err(e)
        }
    }
}

fn collect_and_rank(
    source: &dyn SpanSource,
    ranker: &RelevanceRanker,
    config: &BatchConfig,
) -> Result<RankingOutput> {
    let manifest_path = config.input_dir.join(MANIFEST_NAME);
    if !manifest_path.is_file() {
        return Err(Error::MissingInput(manifest_path));
    }

    let manifest: RankingManifest = serde_json::from_str(&fs::read_to_string(&manifest_path)?)
        .map_err(|e| Error::InvalidManifest(e.to_string()))?;

    let persona = manifest.persona.role;
    let job = manifest.job_to_be_done.task;
    log::info!("persona: {}", persona);
    log::info!("job: {}", job);

    let pdf_files: Vec<String> = manifest
        .documents
        .iter()
        .map(|d| d.filename.clone())
        .filter(|f| f.to_lowercase().ends_with(".pdf"))
        .collect();

    if pdf_files.is_empty() {
        return Err(Error::InvalidManifest(
            "no PDF documents listed in input.json".to_string(),
        ));
    }

    let segmenter = SectionSegmenter::new();
    let all_sections: Vec<Section> = pdf_files
        .par_iter()
        .flat_map(|filename| segment_document(source, &segmenter, &config.input_dir, filename))
        .collect();

    let total_found = all_sections.len();
    let ranked = ranker.rank(all_sections, &persona, &job)?;
    let top: Vec<Section> = ranked.into_iter().take(ranker.top_n()).collect();

    let extractor = SubsectionExtractor::new();
    let mut sections = Vec::with_capacity(top.len());
    let mut subsections = Vec::new();

    for (index, section) in top.iter().enumerate() {
        sections.push(RankedSection {
            document: section.document.clone(),
            page_number: section.page,
            section_title: section.title(),
            importance_rank: index + 1,
            relevance_score: round4(section.relevance_score.unwrap_or(0.0)),
        });
        subsections.extend(extractor.extract(section));
    }

    Ok(RankingOutput {
        metadata: RankingMetadata {
            input_documents: pdf_files,
            persona,
            job,
            timestamp: Utc::now().to_rfc3339(),
            total_sections_found: total_found,
            sections_selected: sections.len(),
            error: None,
        },
        sections,
        subsections,
    })
}

/// Segment one listed document. Missing or unreadable files contribute
/// zero sections instead of failing the batch.
fn segment_document(
    source: &dyn SpanSource,
    segmenter: &SectionSegmenter,
    input_dir: &Path,
    filename: &str,
) -> Vec<Section> {
    let path = input_dir.join(filename);
    if !path.is_file() {
        log::warn!("file not found: {}", filename);
        return Vec::new();
    }

    log::info!("processing {}", filename);
    match source.decode_file(&path) {
        Ok(doc) => {
            let sections = segmenter.segment(filename, &doc);
            log::info!("extracted {} sections from {}", sections.len(), filename);
            sections
        }
        Err(e) => {
            log::warn!("skipping {}: {}", filename, e);
            Vec::new()
        }
    }
}

fn write_result(output_dir: &Path, output: &RankingOutput) -> Result<()> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
    let path = output_dir.join(RESULT_NAME);
    fs::write(&path, json)?;
    log::info!("saved results to {}", path.display());
    Ok(())
}

fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123_456), 0.1235);
        assert_eq!(round4(-0.000_04), -0.0);
        assert_eq!(round4(1.0), 1.0);
    }
}
