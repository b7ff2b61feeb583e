//! Drill-down fragment extraction.

use regex::Regex;

use crate::model::{Section, Subsection};

/// At most this many fragments per section.
const MAX_SUBSECTIONS: usize = 3;

/// Paragraphs must exceed this length to stand alone.
const MIN_PARAGRAPH_LEN: usize = 100;

/// The sentence fallback only runs for content beyond this length.
const FALLBACK_MIN_CONTENT: usize = 200;

/// Sentence buffers flush once they exceed this length.
const SENTENCE_BUFFER_LEN: usize = 150;

/// Splits a section's content into bounded, human-digestible fragments.
#[derive(Debug)]
pub struct SubsectionExtractor {
    sentence_re: Regex,
}

impl SubsectionExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self {
            sentence_re: Regex::new(r"[.!?]+").unwrap(),
        }
    }

    /// Extract up to three fragments from a section.
    ///
    /// Newlines in the content mark the original block boundaries; long
    /// blocks become fragments directly. When no block qualifies and the
    /// content is still substantial, sentences are greedily re-accumulated
    /// into fragments instead.
    pub fn extract(&self, section: &Section) -> Vec<Subsection> {
        let mut subsections: Vec<Subsection> = section
            .content
            .split('\n')
            .map(str::trim)
            .filter(|p| p.chars().count() > MIN_PARAGRAPH_LEN)
            .map(|p| self.fragment(section, p))
            .collect();

        if subsections.is_empty() && section.content.chars().count() > FALLBACK_MIN_CONTENT {
            subsections = self.accumulate_sentences(section);
        }

        subsections.truncate(MAX_SUBSECTIONS);
        subsections
    }

    fn accumulate_sentences(&self, section: &Section) -> Vec<Subsection> {
        let mut subsections = Vec::new();
        let mut buffer = String::new();

        for sentence in self.sentence_re.split(&section.content) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }
            buffer.push_str(sentence);
            buffer.push_str(". ");
            if buffer.chars().count() > SENTENCE_BUFFER_LEN {
                subsections.push(self.fragment(section, buffer.trim()));
                buffer.clear();
            }
        }

        if !buffer.trim().is_empty() {
            subsections.push(self.fragment(section, buffer.trim()));
        }

        subsections
    }

    fn fragment(&self, section: &Section, text: &str) -> Subsection {
        Subsection {
            document: section.document.clone(),
            page_number: section.page,
            refined_text: text.to_string(),
        }
    }
}

impl Default for SubsectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}
