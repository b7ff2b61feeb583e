//! Value objects shared across the pipeline.

mod outline;
mod section;
mod span;

pub use outline::{DocumentOutline, HeadingLevel, OutlineEntry};
pub use section::{
    DocumentRef, JobToBeDone, Persona, RankedSection, RankingManifest, RankingMetadata,
    RankingOutput, Section, Subsection,
};
pub use span::{
    BoundingBox, DecodedDocument, DecodedPage, TextBlock, TextSpan, FLAG_BOLD, FLAG_ITALIC,
};
