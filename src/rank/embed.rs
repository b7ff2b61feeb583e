//! Embedding capability and the built-in offline provider.

use crate::error::Result;

/// Batched text-to-vector capability.
///
/// Injected into the ranker so tests can substitute a fake and deployments
/// can swap in a transformer-backed provider.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed each text into a fixed-length vector, one call per batch.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Vector dimension.
    fn dimension(&self) -> usize;
}

/// Cosine similarity between two vectors.
///
/// Returns a value in [-1.0, 1.0]; mismatched lengths or zero vectors
/// yield 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Deterministic feature-hashing bag-of-words embedder.
///
/// Tokens are lowercased alphanumeric runs hashed (FNV-1a) into a fixed
/// dimension; vectors are term-frequency weighted and L2-normalized. No
/// model download, no state, identical output across runs and platforms.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dimension: usize,
}

impl HashedEmbedder {
    /// Matches the dimension of the small sentence-transformer models this
    /// provider stands in for.
    pub const DEFAULT_DIMENSION: usize = 384;

    /// Create an embedder with a custom dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let lower = token.to_lowercase();
            let slot = (fnv1a(lower.as_bytes()) % self.dimension as u64) as usize;
            vector[slot] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION)
    }
}

impl EmbeddingProvider for HashedEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// FNV-1a hash, 64-bit.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
