//! Persona-driven relevance ranking.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::bounded;

use super::{cosine_similarity, EmbeddingProvider};
use crate::error::{Error, Result};
use crate::model::Section;

/// Options for the ranking pass.
#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Deadline for the batched embedding call; `None` waits indefinitely.
    pub embed_timeout: Option<Duration>,
    /// Number of sections kept in the final digest.
    pub top_n: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            embed_timeout: Some(Duration::from_secs(120)),
            top_n: 10,
        }
    }
}

/// Scores sections against a persona/job query and orders them by
/// descending similarity.
pub struct RelevanceRanker {
    embedder: Arc<dyn EmbeddingProvider>,
    options: RankOptions,
}

impl RelevanceRanker {
    /// Create a ranker with default options.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_options(embedder, RankOptions::default())
    }

    /// Create a ranker with explicit options.
    pub fn with_options(embedder: Arc<dyn EmbeddingProvider>, options: RankOptions) -> Self {
        Self { embedder, options }
    }

    /// Number of sections the digest keeps.
    pub fn top_n(&self) -> usize {
        self.options.top_n
    }

    /// The query sentence built from the persona and task.
    pub fn query_text(persona: &str, job: &str) -> String {
        format!("{} needs to {}", persona, job)
    }

    /// Score every section by query similarity and sort descending.
    ///
    /// Returns a permutation of the input: nothing is filtered here, and
    /// the sort is stable so ties keep their aggregation order. Empty
    /// input returns empty without touching the embedding provider.
    pub fn rank(&self, mut sections: Vec<Section>, persona: &str, job: &str) -> Result<Vec<Section>> {
        if sections.is_empty() {
            return Ok(sections);
        }

        log::info!("encoding {} sections", sections.len());

        let mut texts = Vec::with_capacity(sections.len() + 1);
        texts.push(Self::query_text(persona, job));
        texts.extend(sections.iter().map(|s| s.text.clone()));

        let vectors = self.embed_with_deadline(texts)?;
        let (query, section_vectors) = vectors
            .split_first()
            .ok_or_else(|| Error::Embedding("provider returned no vectors".to_string()))?;

        if section_vectors.len() != sections.len() {
            return Err(Error::Embedding(format!(
                "provider returned {} vectors for {} sections",
                section_vectors.len(),
                sections.len()
            )));
        }

        for (section, vector) in sections.iter_mut().zip(section_vectors) {
            section.relevance_score = Some(cosine_similarity(query, vector));
        }

        sections.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(sections)
    }

    /// Run the batched embedding call, bounded by the configured deadline.
    ///
    /// The provider runs on a worker thread; if the deadline passes the
    /// batch fails with `Error::Embedding` and the worker is abandoned.
    fn embed_with_deadline(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let Some(timeout) = self.options.embed_timeout else {
            return self.embedder.embed_batch(&texts);
        };

        let (tx, rx) = bounded(1);
        let embedder = Arc::clone(&self.embedder);
        std::thread::spawn(move || {
            let _ = tx.send(embedder.embed_batch(&texts));
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(_) => Err(Error::Embedding(format!(
                "embedding did not complete within {:?}",
                timeout
            ))),
        }
    }
}
