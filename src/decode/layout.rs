//! Grouping of positioned spans into lines and layout blocks.
//!
//! Single-column only: spans are ordered top-to-bottom by baseline, merged
//! into lines by baseline proximity, and lines are merged into blocks until
//! a vertical gap or font-size change breaks them.

use crate::model::{BoundingBox, TextBlock, TextSpan};

/// A span with raw page coordinates, before conversion to the model type.
#[derive(Debug, Clone)]
pub(crate) struct PlacedSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
    pub font_flags: u32,
}

impl PlacedSpan {
    fn into_span(self, page: u32) -> TextSpan {
        // Ascender/descender approximated from the font size.
        let bbox = BoundingBox::new(
            self.x,
            self.y - self.font_size * 0.2,
            self.x + self.width,
            self.y + self.font_size * 0.8,
        );
        TextSpan::new(self.text, page, self.font_size, self.font_flags).with_bbox(bbox)
    }
}

#[derive(Debug)]
struct Line {
    spans: Vec<PlacedSpan>,
    y: f32,
    font_size: f32,
}

impl Line {
    fn from_spans(mut spans: Vec<PlacedSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let y = spans[0].y;
        let font_size = spans
            .iter()
            .map(|s| s.font_size)
            .fold(0.0f32, f32::max);
        Self {
            spans,
            y,
            font_size,
        }
    }
}

/// Assemble one page's raw spans into layout blocks.
pub(crate) fn assemble_blocks(page: u32, spans: Vec<PlacedSpan>) -> Vec<TextBlock> {
    let lines = group_into_lines(spans);
    group_into_blocks(lines)
        .into_iter()
        .map(|block_lines| {
            let spans = block_lines
                .into_iter()
                .flat_map(|l| l.spans)
                .map(|s| s.into_span(page))
                .collect();
            TextBlock::new(spans)
        })
        .collect()
}

fn group_into_lines(mut spans: Vec<PlacedSpan>) -> Vec<Line> {
    if spans.is_empty() {
        return Vec::new();
    }

    // PDF Y grows upward, so descending Y is reading order.
    spans.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<PlacedSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(Line::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(Line::from_spans(current));
    }

    lines
}

fn group_into_blocks(lines: Vec<Line>) -> Vec<Vec<Line>> {
    if lines.is_empty() {
        return Vec::new();
    }

    let avg_spacing = average_line_spacing(&lines);
    let mut blocks: Vec<Vec<Line>> = Vec::new();
    let mut current: Vec<Line> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            let gap = (prev.y - line.y).abs();
            let size_change = (prev.font_size - line.font_size).abs() > 1.0;
            if gap > avg_spacing * 1.5 || size_change {
                blocks.push(std::mem::take(&mut current));
            }
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn average_line_spacing(lines: &[Line]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}
