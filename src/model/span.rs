//! Styled text spans and the decoder's native block grouping.

use serde::{Deserialize, Serialize};

/// Font flag bit for italic text.
pub const FLAG_ITALIC: u32 = 1 << 1;

/// Font flag bit for bold text.
pub const FLAG_BOLD: u32 = 1 << 4;

/// Axis-aligned rectangle in page coordinates (PDF points).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A contiguous run of uniformly styled text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Page number (1-based)
    pub page: u32,
    /// Font size in points
    pub font_size: f32,
    /// Style bitmask (`FLAG_BOLD`, `FLAG_ITALIC`)
    pub font_flags: u32,
    /// Position on the page
    pub bbox: BoundingBox,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: impl Into<String>, page: u32, font_size: f32, font_flags: u32) -> Self {
        Self {
            text: text.into(),
            page,
            font_size,
            font_flags,
            bbox: BoundingBox::default(),
        }
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Whether the bold style bit is set.
    pub fn is_bold(&self) -> bool {
        self.font_flags & FLAG_BOLD != 0
    }

    /// Text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// A group of spans adjacent in layout, as emitted by the decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextBlock {
    /// Spans in reading order
    pub spans: Vec<TextSpan>,
}

impl TextBlock {
    /// Create a block from spans.
    pub fn new(spans: Vec<TextSpan>) -> Self {
        Self { spans }
    }

    /// Space-joined text of all spans.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.trimmed())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the block holds no visible text.
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.trimmed().is_empty())
    }
}

/// One decoded page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodedPage {
    /// Page number (1-based)
    pub number: u32,
    /// Layout blocks in stream order
    pub blocks: Vec<TextBlock>,
}

impl DecodedPage {
    /// Create a new page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            blocks: Vec::new(),
        }
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: TextBlock) {
        self.blocks.push(block);
    }
}

/// The decoder's output for a whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodedDocument {
    /// Pages in document order
    pub pages: Vec<DecodedPage>,
}

impl DecodedDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: DecodedPage) {
        self.pages.push(page);
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Flat iterator over every span in document order.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.pages
            .iter()
            .flat_map(|p| p.blocks.iter())
            .flat_map(|b| b.spans.iter())
    }

    /// Whether the document yields no spans at all.
    pub fn is_empty(&self) -> bool {
        self.spans().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_bold_flag() {
        let span = TextSpan::new("Heading", 1, 18.0, FLAG_BOLD);
        assert!(span.is_bold());

        let span = TextSpan::new("body", 1, 10.0, FLAG_ITALIC);
        assert!(!span.is_bold());
    }

    #[test]
    fn test_block_text_joins_spans() {
        let block = TextBlock::new(vec![
            TextSpan::new("Hello ", 1, 10.0, 0),
            TextSpan::new(" world", 1, 10.0, 0),
            TextSpan::new("  ", 1, 10.0, 0),
        ]);
        assert_eq!(block.text(), "Hello world");
        assert!(!block.is_empty());
    }

    #[test]
    fn test_document_span_iteration() {
        let mut doc = DecodedDocument::new();
        let mut page = DecodedPage::new(1);
        page.add_block(TextBlock::new(vec![TextSpan::new("a", 1, 10.0, 0)]));
        page.add_block(TextBlock::new(vec![TextSpan::new("b", 1, 10.0, 0)]));
        doc.add_page(page);
        let mut page2 = DecodedPage::new(2);
        page2.add_block(TextBlock::new(vec![TextSpan::new("c", 2, 10.0, 0)]));
        doc.add_page(page2);

        let texts: Vec<_> = doc.spans().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert!(!doc.is_empty());
        assert!(DecodedDocument::new().is_empty());
    }

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BoundingBox::new(10.0, 20.0, 110.0, 32.0);
        assert_eq!(bbox.width(), 100.0);
        assert_eq!(bbox.height(), 12.0);
    }
}
