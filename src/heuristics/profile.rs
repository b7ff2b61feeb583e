//! Corpus-wide font statistics.

use crate::model::TextSpan;

/// Font statistics for one document, consumed read-only by the classifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontProfile {
    /// Most frequent span font size (body text)
    pub body_size: f32,
    /// Distinct sizes strictly larger than body, descending
    pub heading_sizes: Vec<f32>,
}

impl FontProfile {
    /// Compute the profile from a document's spans.
    ///
    /// The body size is the mode of the exact size values; frequency ties
    /// keep the first-encountered size. Empty input yields the degenerate
    /// default profile, which callers treat as "no extractable text".
    pub fn from_spans<'a, I>(spans: I) -> Self
    where
        I: IntoIterator<Item = &'a TextSpan>,
    {
        // Distinct sizes stay few enough that a linear scan beats hashing
        // floats.
        let mut counts: Vec<(f32, usize)> = Vec::new();
        for span in spans {
            match counts.iter_mut().find(|(size, _)| *size == span.font_size) {
                Some((_, n)) => *n += 1,
                None => counts.push((span.font_size, 1)),
            }
        }

        let Some(&first) = counts.first() else {
            return Self::default();
        };

        let mut body = first;
        for &(size, n) in &counts[1..] {
            if n > body.1 {
                body = (size, n);
            }
        }

        let mut heading_sizes: Vec<f32> = counts
            .iter()
            .map(|&(size, _)| size)
            .filter(|&size| size > body.0)
            .collect();
        heading_sizes.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            body_size: body.0,
            heading_sizes,
        }
    }

    /// Rank of a size among the heading sizes (0 = largest), if present.
    pub fn size_rank(&self, size: f32) -> Option<usize> {
        self.heading_sizes.iter().position(|&s| s == size)
    }

    /// The largest heading sizes, at most `n` of them.
    pub fn top_sizes(&self, n: usize) -> &[f32] {
        &self.heading_sizes[..n.min(self.heading_sizes.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(size: f32) -> TextSpan {
        TextSpan::new("text", 1, size, 0)
    }

    #[test]
    fn test_body_size_is_mode() {
        let spans: Vec<TextSpan> = [10.0, 10.0, 10.0, 14.0, 18.0, 14.0]
            .iter()
            .map(|&s| span(s))
            .collect();
        let profile = FontProfile::from_spans(&spans);
        assert_eq!(profile.body_size, 10.0);
        assert_eq!(profile.heading_sizes, vec![18.0, 14.0]);
    }

    #[test]
    fn test_frequency_tie_keeps_first_encountered() {
        let spans: Vec<TextSpan> = [12.0, 10.0, 12.0, 10.0].iter().map(|&s| span(s)).collect();
        let profile = FontProfile::from_spans(&spans);
        assert_eq!(profile.body_size, 12.0);
    }

    #[test]
    fn test_heading_sizes_are_strictly_larger_and_descending() {
        let spans: Vec<TextSpan> = [10.0, 10.0, 8.0, 24.0, 16.0, 20.0]
            .iter()
            .map(|&s| span(s))
            .collect();
        let profile = FontProfile::from_spans(&spans);
        assert_eq!(profile.heading_sizes, vec![24.0, 20.0, 16.0]);
        assert_eq!(profile.size_rank(24.0), Some(0));
        assert_eq!(profile.size_rank(16.0), Some(2));
        assert_eq!(profile.size_rank(8.0), None);
        assert_eq!(profile.size_rank(10.0), None);
    }

    #[test]
    fn test_empty_input_degenerates() {
        let profile = FontProfile::from_spans(std::iter::empty());
        assert_eq!(profile, FontProfile::default());
        assert!(profile.heading_sizes.is_empty());
    }

    #[test]
    fn test_top_sizes_clamps() {
        let spans: Vec<TextSpan> = [10.0, 10.0, 14.0].iter().map(|&s| span(s)).collect();
        let profile = FontProfile::from_spans(&spans);
        assert_eq!(profile.top_sizes(3), &[14.0]);
    }
}
