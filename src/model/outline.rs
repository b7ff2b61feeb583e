//! Document outline types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse visual-hierarchy rank of a heading.
///
/// Derived `Ord` matches string order ("H1" < "H2" < "H3"), which the
/// outline sort relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top-level heading
    H1,
    /// Second-level heading
    H2,
    /// Third-level heading
    H3,
}

impl HeadingLevel {
    /// Level for a font size's rank among the largest heading sizes.
    ///
    /// Rank 0 is the largest size; anything past the second rank falls
    /// through to `H3`.
    pub fn from_size_rank(rank: Option<usize>) -> Self {
        match rank {
            Some(0) => HeadingLevel::H1,
            Some(1) => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        };
        write!(f, "{}", s)
    }
}

/// A single entry in a document outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Normalized heading text
    pub text: String,
    /// Page the heading appears on (1-based)
    pub page: u32,
}

/// Title plus ordered heading entries for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Document title
    pub title: String,
    /// Heading entries ordered by (page, level)
    pub outline: Vec<OutlineEntry>,
}

impl DocumentOutline {
    /// Title sentinel for documents that decode to zero spans.
    pub const EMPTY_TITLE: &'static str = "Empty Document";

    /// Title sentinel for documents that failed to process.
    pub const DEGRADED_TITLE: &'static str = "Error Processing Document";

    /// Outline for a document with no extractable text.
    pub fn empty_document() -> Self {
        Self {
            title: Self::EMPTY_TITLE.to_string(),
            outline: Vec::new(),
        }
    }

    /// Degraded outline standing in for a document that failed to process.
    pub fn degraded() -> Self {
        Self {
            title: Self::DEGRADED_TITLE.to_string(),
            outline: Vec::new(),
        }
    }

    /// Whether this outline is the degraded placeholder.
    pub fn is_degraded(&self) -> bool {
        self.title == Self::DEGRADED_TITLE && self.outline.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering_matches_string_order() {
        assert!(HeadingLevel::H1 < HeadingLevel::H2);
        assert!(HeadingLevel::H2 < HeadingLevel::H3);
        assert_eq!(HeadingLevel::H1.to_string(), "H1");
    }

    #[test]
    fn test_level_from_size_rank() {
        assert_eq!(HeadingLevel::from_size_rank(Some(0)), HeadingLevel::H1);
        assert_eq!(HeadingLevel::from_size_rank(Some(1)), HeadingLevel::H2);
        assert_eq!(HeadingLevel::from_size_rank(Some(2)), HeadingLevel::H3);
        assert_eq!(HeadingLevel::from_size_rank(Some(7)), HeadingLevel::H3);
        assert_eq!(HeadingLevel::from_size_rank(None), HeadingLevel::H3);
    }

    #[test]
    fn test_outline_serialization_shape() {
        let outline = DocumentOutline {
            title: "Guide".to_string(),
            outline: vec![OutlineEntry {
                level: HeadingLevel::H1,
                text: "Introduction".to_string(),
                page: 1,
            }],
        };

        let json = serde_json::to_value(&outline).unwrap();
        assert_eq!(json["title"], "Guide");
        assert_eq!(json["outline"][0]["level"], "H1");
        assert_eq!(json["outline"][0]["text"], "Introduction");
        assert_eq!(json["outline"][0]["page"], 1);
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(DocumentOutline::empty_document().title, "Empty Document");
        assert!(DocumentOutline::degraded().is_degraded());
    }
}
