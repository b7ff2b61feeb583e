//! Multi-signal heading scoring.
//!
//! The decision rule is an additive integer score over typographic and
//! textual signals; the policy lives in [`ClassifierConfig`] so it can be
//! tuned and tested apart from the I/O pipeline.

use regex::Regex;

use super::FontProfile;
use crate::model::{HeadingLevel, TextSpan, FLAG_BOLD};

/// Bonus points for each heading signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreWeights {
    /// Font size strictly larger than body text
    pub larger_than_body: i32,
    /// Font size within the largest heading-size band
    pub top_size_band: i32,
    /// Bold style bit set
    pub bold: i32,
    /// Any structural pattern matched (applied at most once)
    pub structural_pattern: i32,
    /// Any heading keyword present
    pub keyword: i32,
    /// Short all-uppercase text
    pub uppercase: i32,
    /// Title-case text
    pub title_case: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            larger_than_body: 3,
            top_size_band: 2,
            bold: 2,
            structural_pattern: 3,
            keyword: 1,
            uppercase: 1,
            title_case: 1,
        }
    }
}

/// Tunable policy behind the heading decision.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Structural patterns (numbered prefixes, ALL-CAPS, Title Case,
    /// "Chapter N" and friends); anchored, case-insensitive
    pub patterns: Vec<Regex>,
    /// Heading keywords, matched as lowercase substrings
    pub keywords: Vec<String>,
    /// Page-furniture substrings that disqualify a span outright
    pub stoplist: Vec<String>,
    /// Minimum trimmed text length (chars)
    pub min_text_len: usize,
    /// Maximum trimmed text length (chars)
    pub max_text_len: usize,
    /// Maximum length for the all-uppercase bonus
    pub uppercase_max_len: usize,
    /// How many of the largest heading sizes earn the band bonus
    pub top_size_band: usize,
    /// Score weights
    pub weights: ScoreWeights,
    /// Minimum score for a span to count as a heading
    pub threshold: i32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let patterns = [
            r"^\d+\.?\s+",
            r"^\d+\.\d+\.?\s+",
            r"^\d+\.\d+\.\d+\.?\s+",
            r"^[A-Z][A-Z\s]{2,}$",
            r"^[A-Z][a-z]+(?:\s[A-Z][a-z])*$",
            r"^Chapter\s+\d+",
            r"^Section\s+\d+",
            r"^Part\s+[IVX]+",
        ]
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
        .collect();

        let keywords = [
            "introduction",
            "overview",
            "background",
            "methodology",
            "results",
            "conclusion",
            "abstract",
            "summary",
            "discussion",
            "analysis",
            "chapter",
            "section",
            "part",
            "appendix",
            "references",
            "bibliography",
            "contents",
            "index",
            "preface",
            "acknowledgments",
            "table of contents",
            "はじめに",
            "概要",
            "結論",
            "参考文献",
            "目次",
            "付録",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let stoplist = ["page", "figure", "table", "www.", "http"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        Self {
            patterns,
            keywords,
            stoplist,
            min_text_len: 3,
            max_text_len: 200,
            uppercase_max_len: 50,
            top_size_band: 3,
            weights: ScoreWeights::default(),
            threshold: 4,
        }
    }
}

/// Ephemeral per-span classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingCandidate {
    /// Assigned heading level
    pub level: HeadingLevel,
    /// The accumulated score
    pub score: i32,
}

/// Scores spans as headings against a document's font profile.
#[derive(Debug, Clone, Default)]
pub struct HeadingClassifier {
    config: ClassifierConfig,
}

impl HeadingClassifier {
    /// Create a classifier with an explicit policy.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// The active policy.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a span; `None` when it is not a heading.
    ///
    /// The level is the font size's rank among the largest heading sizes:
    /// largest is H1, second H2, everything else H3. Documents with fewer
    /// than three distinct larger-than-body sizes therefore degrade to
    /// "everything above body text is H3 or better".
    pub fn classify(&self, span: &TextSpan, profile: &FontProfile) -> Option<HeadingCandidate> {
        let score = self.score(span.trimmed(), span.font_size, span.font_flags, profile);
        if score < self.config.threshold {
            return None;
        }

        let rank = profile
            .size_rank(span.font_size)
            .filter(|&r| r < self.config.top_size_band);
        Some(HeadingCandidate {
            level: HeadingLevel::from_size_rank(rank),
            score,
        })
    }

    /// The additive multi-signal score. Bonuses are order-independent and
    /// all applicable ones apply.
    pub fn score(&self, text: &str, font_size: f32, font_flags: u32, profile: &FontProfile) -> i32 {
        let len = text.chars().count();
        if len < self.config.min_text_len || len > self.config.max_text_len {
            return 0;
        }

        let lower = text.to_lowercase();
        if self.config.stoplist.iter().any(|s| lower.contains(s)) {
            return 0;
        }

        let weights = &self.config.weights;
        let mut score = 0;

        if font_size > profile.body_size {
            score += weights.larger_than_body;
            if profile
                .size_rank(font_size)
                .is_some_and(|r| r < self.config.top_size_band)
            {
                score += weights.top_size_band;
            }
        }

        if font_flags & FLAG_BOLD != 0 {
            score += weights.bold;
        }

        if self.config.patterns.iter().any(|p| p.is_match(text)) {
            score += weights.structural_pattern;
        }

        if self.config.keywords.iter().any(|k| lower.contains(k)) {
            score += weights.keyword;
        }

        if is_all_uppercase(text)
            && len >= self.config.min_text_len
            && len <= self.config.uppercase_max_len
        {
            score += weights.uppercase;
        }

        if is_title_case(text) {
            score += weights.title_case;
        }

        score
    }
}

/// True when the text has cased characters and none of them lowercase.
fn is_all_uppercase(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// True when every word starts uppercase and continues lowercase:
/// uppercase may only follow uncased characters, lowercase only cased ones.
fn is_title_case(text: &str) -> bool {
    let mut has_cased = false;
    let mut prev_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            has_cased = true;
            prev_cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            has_cased = true;
        } else {
            prev_cased = false;
        }
    }
    has_cased
}
