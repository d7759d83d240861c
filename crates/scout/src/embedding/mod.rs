//! Embedding service for topic similarity search.
//!
//! The store consumes embeddings through the [`Embedder`] trait so tests
//! can inject deterministic vectors. The production implementation
//! ([`NeuralEmbedder`]) runs an ONNX sentence-transformer behind the
//! `neural` feature; the pure math helpers below are feature-independent.

use anyhow::Result;
use async_trait::async_trait;

#[cfg(feature = "neural")]
mod neural;
#[cfg(feature = "neural")]
pub use neural::NeuralEmbedder;

/// Output dimension of the default model (all-MiniLM-L6-v2).
pub const EMBEDDING_DIM: usize = 384;

/// Produces unit-length embedding vectors for topic strings.
///
/// Implementations must L2-normalize their output; the store's
/// distance-to-similarity conversion assumes unit vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
  async fn embed(&self, text: &str) -> Result<Vec<f32>>;

  /// Dimension of the vectors this embedder produces.
  fn dimension(&self) -> usize;
}

/// Stand-in for the ONNX embedder when the `neural` feature is off.
/// Construction succeeds so store handles can still be built for
/// non-embedding operations (stats, clear); embedding itself errors.
#[cfg(not(feature = "neural"))]
pub struct NeuralEmbedder;

#[cfg(not(feature = "neural"))]
impl NeuralEmbedder {
  pub fn new() -> Self {
    Self
  }
}

#[cfg(not(feature = "neural"))]
impl Default for NeuralEmbedder {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(not(feature = "neural"))]
#[async_trait]
impl Embedder for NeuralEmbedder {
  async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
    Err(anyhow::anyhow!("neural embeddings not available - rebuild with the `neural` feature"))
  }

  fn dimension(&self) -> usize {
    EMBEDDING_DIM
  }
}

/// Mean-pool token embeddings into a single sentence vector.
///
/// `shape` is `[batch, seq_length, hidden_size]` as reported by the
/// model output tensor.
pub fn mean_pool(shape: &[i64], data: &[f32]) -> Result<Vec<f32>> {
  anyhow::ensure!(shape.len() == 3, "expected a rank-3 hidden-state tensor, got {:?}", shape);

  let seq_length = shape[1] as usize;
  let hidden_size = shape[2] as usize;
  anyhow::ensure!(seq_length > 0, "cannot pool an empty token sequence");

  let mut pooled = vec![0.0f32; hidden_size];
  for token_idx in 0..seq_length {
    let start = token_idx * hidden_size;
    for (i, &value) in data[start..start + hidden_size].iter().enumerate() {
      pooled[i] += value;
    }
  }

  for value in pooled.iter_mut() {
    *value /= seq_length as f32;
  }

  Ok(pooled)
}

/// Scale a vector to unit length. Zero vectors are returned unchanged
/// rather than dividing by zero.
pub fn normalize(mut embedding: Vec<f32>) -> Vec<f32> {
  let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

  if magnitude < f32::EPSILON {
    herald::warn!("zero-magnitude embedding - returning unchanged");
    return embedding;
  }

  for value in embedding.iter_mut() {
    *value /= magnitude;
  }

  embedding
}

/// Cosine similarity between two vectors, in [-1, 1].
///
/// Mismatched or empty inputs score 0.0 instead of erroring; a useless
/// similarity is the right degradation for a cache probe.
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

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mean_pool_averages_tokens() -> Result<()> {
    // Two tokens, three hidden dims each.
    let shape = vec![1i64, 2, 3];
    let data = vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];

    let pooled = mean_pool(&shape, &data)?;

    assert_eq!(pooled, vec![2.5, 3.5, 4.5]);
    Ok(())
  }

  #[test]
  fn test_mean_pool_single_token_is_identity() -> Result<()> {
    let shape = vec![1i64, 1, 4];
    let data = vec![10.0f32, 20.0, 30.0, 40.0];

    let pooled = mean_pool(&shape, &data)?;

    assert_eq!(pooled, data);
    Ok(())
  }

  #[test]
  fn test_mean_pool_rejects_empty_sequence() {
    let shape = vec![1i64, 0, 3];
    assert!(mean_pool(&shape, &[]).is_err());
  }

  #[test]
  fn test_mean_pool_rejects_wrong_rank() {
    let shape = vec![2i64, 3];
    assert!(mean_pool(&shape, &[1.0; 6]).is_err());
  }

  #[test]
  fn test_normalize_produces_unit_length() {
    let normalized = normalize(vec![3.0, 4.0, 0.0]);

    assert!((normalized[0] - 0.6).abs() < f32::EPSILON);
    assert!((normalized[1] - 0.8).abs() < f32::EPSILON);

    let magnitude: f32 = normalized.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((magnitude - 1.0).abs() < f32::EPSILON);
  }

  #[test]
  fn test_normalize_keeps_zero_vector() {
    let zero = vec![0.0, 0.0, 0.0];
    assert_eq!(normalize(zero.clone()), zero);
  }

  #[test]
  fn test_cosine_similarity_identical_vectors() {
    let v = vec![1.0, 2.0, 3.0];
    assert!((cosine_similarity(&v, &v) - 1.0).abs() < 0.001);
  }

  #[test]
  fn test_cosine_similarity_orthogonal_vectors() {
    let a = vec![1.0, 0.0];
    let b = vec![0.0, 1.0];
    assert!(cosine_similarity(&a, &b).abs() < 0.001);
  }

  #[test]
  fn test_cosine_similarity_opposite_vectors() {
    let a = vec![1.0, 2.0];
    let b = vec![-1.0, -2.0];
    assert!((cosine_similarity(&a, &b) + 1.0).abs() < 0.001);
  }

  #[test]
  fn test_cosine_similarity_degenerate_inputs() {
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
    assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
  }
}
