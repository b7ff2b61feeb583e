//! Integration tests for the ranking batch pipeline.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use pdfsift::{
    process_ranking_batch, BatchConfig, DecodedDocument, DecodedPage, Error, HashedEmbedder,
    RankingOutput, RelevanceRanker, Result, SpanSource, TextBlock, TextSpan, FLAG_BOLD,
};

/// Decoder stub keyed by filename.
#[derive(Default)]
struct StubDecoder {
    documents: HashMap<String, DecodedDocument>,
}

impl StubDecoder {
    fn with_document(mut self, filename: &str, doc: DecodedDocument) -> Self {
        self.documents.insert(filename.to_string(), doc);
        self
    }
}

impl SpanSource for StubDecoder {
    fn decode_file(&self, path: &Path) -> Result<DecodedDocument> {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        self.documents
            .get(&name)
            .cloned()
            .ok_or_else(|| Error::PdfParse(format!("no stub for {}", name)))
    }
}

/// One heading-delimited section: a bold heading block plus a body block.
fn one_section_document(heading: &str, content: &str) -> DecodedDocument {
    let mut page = DecodedPage::new(1);
    page.add_block(TextBlock::new(vec![TextSpan::new(heading, 1, 16.0, FLAG_BOLD)]));
    page.add_block(TextBlock::new(vec![TextSpan::new(content, 1, 10.0, 0)]));

    let mut doc = DecodedDocument::new();
    doc.add_page(page);
    doc
}

fn travel_document() -> DecodedDocument {
    one_section_document(
        "Planning Your Trip",
        "plan a relaxed four day trip with two coastal walks, a ferry ride, \
         a market morning and plenty of time in the old town cafes",
    )
}

fn budget_document() -> DecodedDocument {
    one_section_document(
        "Quarterly Budget Figures",
        "the finance committee reviewed invoices, depreciation schedules and \
         payroll summaries for the winter accounting period",
    )
}

fn write_manifest(dir: &Path, documents: &[&str]) {
    let docs: Vec<serde_json::Value> = documents
        .iter()
        .map(|f| serde_json::json!({ "filename": f }))
        .collect();
    let manifest = serde_json::json!({
        "persona": { "role": "Travel Planner" },
        "job_to_be_done": { "task": "plan a 4-day trip" },
        "documents": docs,
    });
    fs::write(
        dir.join("input.json"),
        serde_json::to_string_pretty(&manifest).unwrap(),
    )
    .unwrap();
}

fn touch_pdf(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"%PDF-1.7 stub").unwrap();
}

fn ranker() -> RelevanceRanker {
    RelevanceRanker::new(Arc::new(HashedEmbedder::default()))
}

#[test]
fn test_two_document_collection_end_to_end() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_manifest(input.path(), &["south.pdf", "north.pdf"]);
    touch_pdf(input.path(), "south.pdf");
    touch_pdf(input.path(), "north.pdf");

    let decoder = StubDecoder::default()
        .with_document("south.pdf", travel_document())
        .with_document("north.pdf", budget_document());
    let config = BatchConfig::new(input.path(), output.path());

    let result = process_ranking_batch(&decoder, &ranker(), &config).unwrap();

    assert_eq!(result.metadata.total_sections_found, 2);
    assert!(result.metadata.sections_selected <= 2);
    assert_eq!(result.metadata.persona, "Travel Planner");
    assert_eq!(result.metadata.job, "plan a 4-day trip");
    assert!(result.metadata.error.is_none());

    assert_eq!(result.sections[0].importance_rank, 1);
    // The travel section shares far more query vocabulary.
    assert_eq!(result.sections[0].document, "south.pdf");
    for pair in result.sections.windows(2) {
        assert!(pair[0].relevance_score >= pair[1].relevance_score);
        assert_eq!(pair[1].importance_rank, pair[0].importance_rank + 1);
    }

    // Long single-block contents surface as one subsection each.
    assert!(!result.subsections.is_empty());
    for sub in &result.subsections {
        assert!(!sub.refined_text.trim().is_empty());
    }

    // The written file matches the returned value.
    let on_disk: RankingOutput =
        serde_json::from_str(&fs::read_to_string(output.path().join("result.json")).unwrap())
            .unwrap();
    assert_eq!(on_disk, result);
}

#[test]
fn test_missing_manifest_still_writes_error_result() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let config = BatchConfig::new(input.path(), output.path());
    let result = process_ranking_batch(&StubDecoder::default(), &ranker(), &config);
    assert!(matches!(result, Err(Error::MissingInput(_))));

    let on_disk: RankingOutput =
        serde_json::from_str(&fs::read_to_string(output.path().join("result.json")).unwrap())
            .unwrap();
    assert!(on_disk.metadata.error.is_some());
    assert!(on_disk.sections.is_empty());
    assert!(on_disk.subsections.is_empty());
}

#[test]
fn test_manifest_without_pdfs_is_invalid() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_manifest(input.path(), &["notes.txt"]);

    let config = BatchConfig::new(input.path(), output.path());
    let result = process_ranking_batch(&StubDecoder::default(), &ranker(), &config);
    assert!(matches!(result, Err(Error::InvalidManifest(_))));
    assert!(output.path().join("result.json").is_file());
}

#[test]
fn test_listed_but_missing_file_contributes_nothing() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_manifest(input.path(), &["south.pdf", "ghost.pdf"]);
    touch_pdf(input.path(), "south.pdf");

    let decoder = StubDecoder::default().with_document("south.pdf", travel_document());
    let config = BatchConfig::new(input.path(), output.path());

    let result = process_ranking_batch(&decoder, &ranker(), &config).unwrap();
    assert_eq!(result.metadata.total_sections_found, 1);
    assert_eq!(result.sections.len(), 1);
    // The manifest listing is reported even when a file is absent.
    assert_eq!(
        result.metadata.input_documents,
        vec!["south.pdf".to_string(), "ghost.pdf".to_string()]
    );
}

#[test]
fn test_relevance_scores_are_rounded() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_manifest(input.path(), &["south.pdf"]);
    touch_pdf(input.path(), "south.pdf");

    let decoder = StubDecoder::default().with_document("south.pdf", travel_document());
    let config = BatchConfig::new(input.path(), output.path());

    let result = process_ranking_batch(&decoder, &ranker(), &config).unwrap();
    for section in &result.sections {
        let scaled = section.relevance_score * 10_000.0;
        assert!((scaled - scaled.round()).abs() < 1e-3);
    }
}
