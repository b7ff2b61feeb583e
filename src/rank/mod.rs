//! Semantic relevance ranking.

mod embed;
mod ranker;

pub use embed::{cosine_similarity, EmbeddingProvider, HashedEmbedder};
pub use ranker::{RankOptions, RelevanceRanker};
