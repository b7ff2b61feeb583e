//! Title selection from early-page spans.

use regex::Regex;

use crate::model::TextSpan;

/// Sentinel title for documents where no candidate qualifies.
pub const UNTITLED: &str = "Untitled Document";

/// Only the first pages are considered title territory.
const TITLE_PAGE_LIMIT: u32 = 3;

/// Candidates must carry more than this many trimmed characters.
const MIN_TITLE_LEN: usize = 3;

/// Pick the document title: the first span at the largest font size on
/// pages 1-3, with any leading list prefix stripped.
pub fn select_title<'a, I>(spans: I) -> String
where
    I: IntoIterator<Item = &'a TextSpan>,
{
    let early: Vec<&TextSpan> = spans
        .into_iter()
        .filter(|s| s.page <= TITLE_PAGE_LIMIT)
        .collect();

    let Some(max_size) = early
        .iter()
        .map(|s| s.font_size)
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    else {
        return UNTITLED.to_string();
    };

    let candidate = early
        .iter()
        .filter(|s| s.font_size == max_size)
        .map(|s| s.trimmed())
        .find(|t| t.chars().count() > MIN_TITLE_LEN);

    match candidate {
        Some(text) => {
            let prefix_re = Regex::new(r"^\d+\.?\s*").unwrap();
            prefix_re.replace(text, "").to_string()
        }
        None => UNTITLED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, page: u32, size: f32) -> TextSpan {
        TextSpan::new(text, page, size, 0)
    }

    #[test]
    fn test_largest_early_span_wins() {
        let spans = vec![
            span("small print", 1, 8.0),
            span("The Annual Report", 1, 28.0),
            span("Chapter One", 2, 18.0),
        ];
        assert_eq!(select_title(&spans), "The Annual Report");
    }

    #[test]
    fn test_numeric_prefix_is_stripped() {
        let spans = vec![span("1. Introduction", 1, 18.0), span("body", 1, 10.0)];
        assert_eq!(select_title(&spans), "Introduction");
    }

    #[test]
    fn test_first_candidate_in_document_order() {
        let spans = vec![
            span("First Title", 1, 20.0),
            span("Second Title", 2, 20.0),
        ];
        assert_eq!(select_title(&spans), "First Title");
    }

    #[test]
    fn test_late_pages_are_ignored() {
        let spans = vec![
            span("Modest Opening", 1, 12.0),
            span("HUGE BACK MATTER", 9, 40.0),
        ];
        assert_eq!(select_title(&spans), "Modest Opening");
    }

    #[test]
    fn test_no_early_spans_yields_sentinel() {
        let spans = vec![span("appendix", 7, 30.0)];
        assert_eq!(select_title(&spans), UNTITLED);
        assert_eq!(select_title(std::iter::empty()), UNTITLED);
    }

    #[test]
    fn test_short_candidates_are_skipped() {
        // Both large spans are too short; nothing else is at max size.
        let spans = vec![span("IV", 1, 30.0), span("ok", 1, 30.0), span("text", 1, 10.0)];
        assert_eq!(select_title(&spans), UNTITLED);
    }

    #[test]
    fn test_shorter_large_span_defers_to_next_at_same_size() {
        let spans = vec![span("IX", 1, 30.0), span("Field Guide", 1, 30.0)];
        assert_eq!(select_title(&spans), "Field Guide");
    }
}
