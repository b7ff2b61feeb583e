//! Outline assembly from classified headings.

use std::collections::HashSet;

use regex::Regex;

use super::{FontProfile, HeadingClassifier};
use crate::model::{OutlineEntry, TextSpan};

/// Builds a deduplicated, ordered outline from a document's spans.
#[derive(Debug)]
pub struct OutlineBuilder {
    classifier: HeadingClassifier,
    prefix_re: Regex,
    whitespace_re: Regex,
}

impl OutlineBuilder {
    /// Create a builder around a classifier.
    pub fn new(classifier: HeadingClassifier) -> Self {
        Self {
            classifier,
            prefix_re: Regex::new(r"^\d+\.?\s*").unwrap(),
            whitespace_re: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Classify every span and collect accepted headings.
    ///
    /// Heading text is normalized (list prefix stripped, whitespace runs
    /// collapsed); the first occurrence of a normalized text wins. Entries
    /// are ordered by page, then level.
    pub fn build<'a, I>(&self, spans: I, profile: &FontProfile) -> Vec<OutlineEntry>
    where
        I: IntoIterator<Item = &'a TextSpan>,
    {
        let min_len = self.classifier.config().min_text_len;
        let max_len = self.classifier.config().max_text_len;

        let mut seen: HashSet<String> = HashSet::new();
        let mut entries = Vec::new();

        for span in spans {
            let Some(candidate) = self.classifier.classify(span, profile) else {
                continue;
            };

            let text = self.prefix_re.replace(span.trimmed(), "");
            let text = self.whitespace_re.replace_all(&text, " ").to_string();

            let len = text.chars().count();
            if len < min_len || len > max_len {
                continue;
            }
            if !seen.insert(text.clone()) {
                continue;
            }

            entries.push(OutlineEntry {
                level: candidate.level,
                text,
                page: span.page,
            });
        }

        entries.sort_by(|a, b| (a.page, a.level).cmp(&(b.page, b.level)));
        entries
    }
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new(HeadingClassifier::default())
    }
}
