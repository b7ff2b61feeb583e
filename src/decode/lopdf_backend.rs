//! PDF span extraction built on lopdf.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use super::layout::{assemble_blocks, PlacedSpan};
use super::SpanSource;
use crate::error::{Error, Result};
use crate::model::{DecodedDocument, DecodedPage, FLAG_BOLD, FLAG_ITALIC};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Decoder that extracts styled spans from PDF content streams.
#[derive(Debug, Clone, Default)]
pub struct LopdfDecoder;

impl LopdfDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self
    }

    fn decode_document(&self, doc: &LopdfDocument) -> Result<DecodedDocument> {
        let mut decoded = DecodedDocument::new();

        for (page_num, page_id) in doc.get_pages() {
            match self.extract_page_spans(doc, page_id) {
                Ok(spans) => {
                    let mut page = DecodedPage::new(page_num);
                    page.blocks = assemble_blocks(page_num, spans);
                    decoded.add_page(page);
                }
                Err(e) => {
                    // A broken page should not lose the rest of the document.
                    log::warn!("failed to extract text from page {}: {}", page_num, e);
                    decoded.add_page(DecodedPage::new(page_num));
                }
            }
        }

        Ok(decoded)
    }

    fn extract_page_spans(&self, doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<PlacedSpan>> {
        let fonts = doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut font_flags = HashMap::new();
        for (name, font) in &fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_default();
            font_flags.insert(name.clone(), flags_from_font_name(&base_font));
        }

        let content = self.page_content(doc, page_id)?;
        self.parse_content_stream(doc, &content, &font_flags, &fonts)
    }

    fn page_content(&self, doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::PdfParse(e.to_string()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn parse_content_stream(
        &self,
        doc: &LopdfDocument,
        content: &[u8],
        font_flags: &HashMap<Vec<u8>, u32>,
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<PlacedSpan>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font: Vec<u8> = Vec::new();
        let mut current_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            current_font = name.clone();
                        }
                        current_size = number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = number(&op.operands[0]).unwrap_or(0.0);
                        let ty = number(&op.operands[1]).unwrap_or(0.0);
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            number(&op.operands[0]).unwrap_or(1.0),
                            number(&op.operands[1]).unwrap_or(0.0),
                            number(&op.operands[2]).unwrap_or(0.0),
                            number(&op.operands[3]).unwrap_or(1.0),
                            number(&op.operands[4]).unwrap_or(0.0),
                            number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    matrix.next_line();
                }
                "Tj" | "TJ" => {
                    if !in_text {
                        continue;
                    }
                    let encoding = fonts
                        .get(&current_font)
                        .and_then(|f| f.get_font_encoding(doc).ok());

                    let text = if op.operator == "TJ" {
                        decode_tj_array(op.operands.first(), &encoding)
                    } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                        decode_string(bytes, &encoding)
                    } else {
                        String::new()
                    };

                    push_span(&mut spans, text, &matrix, current_size, font_flags, &current_font);
                }
                "'" | "\"" => {
                    matrix.next_line();
                    if !in_text {
                        continue;
                    }
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let encoding = fonts
                            .get(&current_font)
                            .and_then(|f| f.get_font_encoding(doc).ok());
                        let text = decode_string(bytes, &encoding);
                        push_span(&mut spans, text, &matrix, current_size, font_flags, &current_font);
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }
}

impl SpanSource for LopdfDecoder {
    fn decode_file(&self, path: &Path) -> Result<DecodedDocument> {
        verify_pdf_header(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        self.decode_document(&doc)
    }
}

/// Reject non-PDF files before handing them to lopdf.
fn verify_pdf_header(path: &Path) -> Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 8];
    if reader.read_exact(&mut header).is_err() || !header.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }
    Ok(())
}

/// Style bits inferred from a base font name.
fn flags_from_font_name(name: &str) -> u32 {
    let lower = name.to_lowercase();
    let mut flags = 0;
    if lower.contains("bold") || lower.contains("black") || lower.contains("heavy") {
        flags |= FLAG_BOLD;
    }
    if lower.contains("italic") || lower.contains("oblique") {
        flags |= FLAG_ITALIC;
    }
    flags
}

fn push_span(
    spans: &mut Vec<PlacedSpan>,
    text: String,
    matrix: &TextMatrix,
    font_size: f32,
    font_flags: &HashMap<Vec<u8>, u32>,
    current_font: &[u8],
) {
    if text.trim().is_empty() {
        return;
    }
    let text: String = text.nfc().collect();
    let (x, y) = matrix.position();
    let effective_size = font_size * matrix.scale();
    let width = effective_size * 0.5 * text.chars().count() as f32;
    spans.push(PlacedSpan {
        text,
        x,
        y,
        width,
        font_size: effective_size,
        font_flags: font_flags.get(current_font).copied().unwrap_or(0),
    });
}

fn decode_tj_array(
    operand: Option<&Object>,
    encoding: &Option<lopdf::Encoding>,
) -> String {
    let Some(Object::Array(arr)) = operand else {
        return String::new();
    };

    // Kerning adjustments beyond this (in 1/1000 text-space units) are
    // treated as word spaces.
    let space_threshold = 200.0;
    let mut combined = String::new();

    for item in arr {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode_string(bytes, encoding)),
            Object::Integer(n) => {
                if -(*n as f32) > space_threshold && !combined.ends_with(' ') && !combined.is_empty()
                {
                    combined.push(' ');
                }
            }
            Object::Real(n) => {
                if -n > space_threshold && !combined.ends_with(' ') && !combined.is_empty() {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }

    combined
}

fn decode_string(bytes: &[u8], encoding: &Option<lopdf::Encoding>) -> String {
    if let Some(enc) = encoding {
        if let Ok(decoded) = LopdfDocument::decode_text(enc, bytes) {
            return decoded;
        }
    }
    decode_text_simple(bytes)
}

/// Fallback decoding when no font encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading when no TL was seen.
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_from_font_name() {
        assert_eq!(flags_from_font_name("Helvetica-Bold"), FLAG_BOLD);
        assert_eq!(flags_from_font_name("Times-BoldItalic"), FLAG_BOLD | FLAG_ITALIC);
        assert_eq!(flags_from_font_name("Helvetica-Oblique"), FLAG_ITALIC);
        assert_eq!(flags_from_font_name("Helvetica"), 0);
    }

    #[test]
    fn test_text_matrix_translation() {
        let mut m = TextMatrix::default();
        m.translate(100.0, 700.0);
        assert_eq!(m.position(), (100.0, 700.0));
        m.translate(0.0, -12.0);
        assert_eq!(m.position(), (100.0, 688.0));
    }

    #[test]
    fn test_text_matrix_scale() {
        let mut m = TextMatrix::default();
        m.set(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        assert!((m.scale() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_verify_pdf_header_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_pdf.pdf");
        std::fs::write(&path, b"<!DOCTYPE html>").unwrap();
        assert!(matches!(
            verify_pdf_header(&path),
            Err(Error::UnknownFormat)
        ));
    }
}
