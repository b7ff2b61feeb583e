//! Sections, subsections, and the ranking-mode JSON contracts.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A heading plus its accumulated body text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// Heading that opened the section (possibly empty)
    pub heading: String,
    /// Accumulated body text, one line per source block
    pub content: String,
    /// Page the section opened on (1-based)
    pub page: u32,
    /// Source document filename
    pub document: String,
    /// Heading + content, the embedding input
    pub text: String,
    /// Cosine similarity to the persona/job query, set by the ranker
    pub relevance_score: Option<f32>,
}

impl Section {
    /// Display title: the heading, or a content prefix when the section
    /// opened without one.
    pub fn title(&self) -> String {
        if !self.heading.is_empty() {
            return self.heading.clone();
        }
        let prefix: String = self.text.chars().take(100).collect();
        format!("{}...", prefix)
    }
}

/// A bounded fragment of a section's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    /// Source document filename
    pub document: String,
    /// Page of the parent section (1-based)
    pub page_number: u32,
    /// The fragment text
    pub refined_text: String,
}

/// Persona block of the `input.json` manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct Persona {
    /// The requester's role
    pub role: String,
}

/// Task block of the `input.json` manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct JobToBeDone {
    /// The task description
    pub task: String,
}

/// One document listed in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRef {
    /// Filename relative to the input directory
    pub filename: String,
}

/// The `input.json` manifest driving a ranking run.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingManifest {
    /// Who is asking
    pub persona: Persona,
    /// What they need to do
    pub job_to_be_done: JobToBeDone,
    /// Documents to analyze
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
}

/// Metadata block of `result.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingMetadata {
    /// Filenames that were analyzed
    pub input_documents: Vec<String>,
    /// Persona role string
    pub persona: String,
    /// Task string
    pub job: String,
    /// ISO-8601 completion time
    pub timestamp: String,
    /// Sections extracted across all documents
    pub total_sections_found: usize,
    /// Sections kept in the digest
    pub sections_selected: usize,
    /// Present when the batch failed; the digest lists are empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A ranked section row in `result.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSection {
    /// Source document filename
    pub document: String,
    /// Page the section opened on (1-based)
    pub page_number: u32,
    /// Section heading or content prefix
    pub section_title: String,
    /// Position in the digest (1-based)
    pub importance_rank: usize,
    /// Query similarity, rounded to 4 decimals
    pub relevance_score: f32,
}

/// The complete ranking-mode output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOutput {
    /// Run metadata
    pub metadata: RankingMetadata,
    /// Top sections by relevance
    pub sections: Vec<RankedSection>,
    /// Drill-down fragments for the top sections
    pub subsections: Vec<Subsection>,
}

impl RankingOutput {
    /// Error result written when a ranking batch fails, so downstream
    /// consumers always find a JSON file.
    pub fn from_error(err: &Error, timestamp: String) -> Self {
        Self {
            metadata: RankingMetadata {
                timestamp,
                error: Some(err.to_string()),
                ..RankingMetadata::default()
            },
            sections: Vec::new(),
            subsections: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(heading: &str, content: &str) -> Section {
        Section {
            heading: heading.to_string(),
            content: content.to_string(),
            page: 1,
            document: "doc.pdf".to_string(),
            text: format!("{} {}", heading, content).trim().to_string(),
            relevance_score: None,
        }
    }

    #[test]
    fn test_section_title_prefers_heading() {
        let s = section("Overview", "some body text");
        assert_eq!(s.title(), "Overview");
    }

    #[test]
    fn test_section_title_falls_back_to_content_prefix() {
        let long = "x".repeat(300);
        let s = section("", &long);
        let title = s.title();
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 103);
    }

    #[test]
    fn test_manifest_parsing_tolerates_extra_fields() {
        let json = r#"{
            "challenge_info": {"id": "round_1b"},
            "persona": {"role": "Travel Planner"},
            "job_to_be_done": {"task": "plan a 4-day trip"},
            "documents": [{"filename": "guide.pdf", "title": "Guide"}]
        }"#;
        let manifest: RankingManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.persona.role, "Travel Planner");
        assert_eq!(manifest.job_to_be_done.task, "plan a 4-day trip");
        assert_eq!(manifest.documents.len(), 1);
        assert_eq!(manifest.documents[0].filename, "guide.pdf");
    }

    #[test]
    fn test_error_output_carries_error_field() {
        let err = Error::InvalidManifest("input.json not found".to_string());
        let output = RankingOutput::from_error(&err, "2025-01-01T00:00:00Z".to_string());
        let json = serde_json::to_value(&output).unwrap();
        assert!(json["metadata"]["error"]
            .as_str()
            .unwrap()
            .contains("input.json"));
        assert_eq!(json["sections"].as_array().unwrap().len(), 0);
        assert_eq!(json["subsections"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_success_metadata_omits_error_field() {
        let metadata = RankingMetadata {
            input_documents: vec!["a.pdf".to_string()],
            persona: "Analyst".to_string(),
            job: "review".to_string(),
            timestamp: "2025-01-01T00:00:00Z".to_string(),
            total_sections_found: 3,
            sections_selected: 3,
            error: None,
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert!(json.get("error").is_none());
    }
}
