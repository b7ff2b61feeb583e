//! Heading-delimited section segmentation.
//!
//! Walks the decoder's layout blocks page by page, opening a new section
//! whenever a heading-like block appears and accumulating everything else
//! into the current section's content.

use regex::Regex;

use crate::model::{DecodedDocument, Section, TextBlock};

/// Blocks at or under this length are stray glyphs or page numbers.
const NOISE_MAX_LEN: usize = 10;

/// Heading-like blocks at or over this length are treated as body text.
const HEADING_MAX_LEN: usize = 200;

/// Sections whose trimmed content is at or under this length are dropped.
const MIN_CONTENT_LEN: usize = 50;

/// Spans above this size are heading-like regardless of the profile.
const HEADING_SIZE_FLOOR: f32 = 12.0;

/// Keywords that mark a block as heading-like.
const HEADING_HINTS: [&str; 6] = [
    "chapter",
    "section",
    "introduction",
    "conclusion",
    "methodology",
    "results",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccumulatorState {
    Accumulating,
    Flushed,
}

/// The in-progress section. Opened with a heading (or empty at page
/// start), closed into the result list exactly once.
#[derive(Debug)]
struct Accumulator {
    heading: String,
    content: String,
    page: u32,
    state: AccumulatorState,
}

impl Accumulator {
    fn open(heading: String, page: u32) -> Self {
        Self {
            heading,
            content: String::new(),
            page,
            state: AccumulatorState::Accumulating,
        }
    }

    fn absorb(&mut self, block_text: &str) {
        self.content.push_str(block_text);
        self.content.push('\n');
    }

    fn close_into(&mut self, document: &str, out: &mut Vec<RawSection>) {
        if self.state == AccumulatorState::Flushed {
            return;
        }
        self.state = AccumulatorState::Flushed;
        if self.content.trim().is_empty() {
            return;
        }
        out.push(RawSection {
            heading: std::mem::take(&mut self.heading),
            content: std::mem::take(&mut self.content),
            page: self.page,
            document: document.to_string(),
        });
    }
}

#[derive(Debug)]
struct RawSection {
    heading: String,
    content: String,
    page: u32,
    document: String,
}

/// Segments decoded documents into heading-delimited sections.
#[derive(Debug)]
pub struct SectionSegmenter {
    heading_re: Regex,
    line_space_re: Regex,
    newline_re: Regex,
}

impl SectionSegmenter {
    /// Create a segmenter with the built-in block heuristics.
    pub fn new() -> Self {
        Self {
            heading_re: Regex::new(r"^\d+\.?\s+|^[A-Z][A-Z\s]{2,}$").unwrap(),
            line_space_re: Regex::new(r"[ \t]+").unwrap(),
            newline_re: Regex::new(r"\s*\n\s*").unwrap(),
        }
    }

    /// Split a document into sections.
    ///
    /// Each page seeds a fresh accumulator with an empty heading; a
    /// heading-like block under 200 characters closes the current section
    /// and opens a new one. Sections with fewer than 50 characters of
    /// trimmed content are dropped.
    pub fn segment(&self, document: &str, doc: &DecodedDocument) -> Vec<Section> {
        let mut raw = Vec::new();

        for page in &doc.pages {
            let mut current = Accumulator::open(String::new(), page.number);

            for block in &page.blocks {
                let block_text = block.text();
                if block_text.chars().count() <= NOISE_MAX_LEN {
                    continue;
                }

                if self.is_heading_block(block) && block_text.chars().count() < HEADING_MAX_LEN {
                    current.close_into(document, &mut raw);
                    current = Accumulator::open(block_text, page.number);
                } else {
                    current.absorb(&block_text);
                }
            }

            current.close_into(document, &mut raw);
        }

        raw.into_iter()
            .filter_map(|s| self.finish_section(s))
            .collect()
    }

    /// A block is heading-like when any of its spans carries a heading
    /// signal: bold style, large font, a numbered or ALL-CAPS shape, or a
    /// structural keyword.
    fn is_heading_block(&self, block: &TextBlock) -> bool {
        block.spans.iter().any(|span| {
            span.is_bold()
                || span.font_size > HEADING_SIZE_FLOOR
                || self.heading_re.is_match(span.trimmed())
                || {
                    let lower = span.text.to_lowercase();
                    HEADING_HINTS.iter().any(|k| lower.contains(k))
                }
        })
    }

    fn finish_section(&self, raw: RawSection) -> Option<Section> {
        let content = raw.content.trim();
        if content.chars().count() <= MIN_CONTENT_LEN {
            return None;
        }

        // Collapse whitespace runs but keep the newlines that mark block
        // boundaries; the subsection extractor splits on them.
        let content = self.line_space_re.replace_all(content, " ");
        let content = self.newline_re.replace_all(&content, "\n").to_string();

        let flat = content.replace('\n', " ");
        let text = format!("{} {}", raw.heading, flat).trim().to_string();

        Some(Section {
            heading: raw.heading,
            content,
            page: raw.page,
            document: raw.document,
            text,
            relevance_score: None,
        })
    }
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new()
    }
}
