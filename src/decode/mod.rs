//! PDF decoding: the span-stream collaborator boundary.
//!
//! The pipeline only depends on the [`SpanSource`] trait; the production
//! implementation is [`LopdfDecoder`], and tests substitute stubs.

mod layout;
mod lopdf_backend;

pub use lopdf_backend::LopdfDecoder;

use std::path::Path;

use crate::error::Result;
use crate::model::DecodedDocument;

/// Source of styled text spans for a document.
pub trait SpanSource: Send + Sync {
    /// Decode a PDF file into pages of layout blocks.
    fn decode_file(&self, path: &Path) -> Result<DecodedDocument>;
}
