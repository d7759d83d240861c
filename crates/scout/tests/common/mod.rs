//! Shared test doubles: a deterministic embedder, a canned research
//! provider, and a store that always fails.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use scout::embedding::{cosine_similarity, normalize, Embedder};
use scout::research::provider::{CompetitiveAnalysis, ProviderError, ResearchProvider};
use scout::store::{ScoredRecord, TopicRecord, TopicStore};
use scout::types::{Competitor, ResearchPayload, TrendingTopic};

/// Deterministic embedder. Known texts map to engineered vectors so
/// tests can dial in exact cosine similarities; unknown texts hash to a
/// stable pseudo-random unit vector.
pub struct StubEmbedder {
  dimension: usize,
  vectors: HashMap<String, Vec<f32>>,
}

impl StubEmbedder {
  pub fn new(dimension: usize) -> Self {
    Self { dimension, vectors: HashMap::new() }
  }

  pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
    assert_eq!(vector.len(), self.dimension, "engineered vector has the wrong dimension");
    self.vectors.insert(text.to_string(), normalize(vector));
    self
  }
}

#[async_trait]
impl Embedder for StubEmbedder {
  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    if let Some(vector) = self.vectors.get(text) {
      return Ok(vector.clone());
    }

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let mut state = hasher.finish() | 1;

    let raw: Vec<f32> = (0..self.dimension)
      .map(|_| {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 33) as f32 / (1u64 << 31) as f32) - 0.5
      })
      .collect();

    Ok(normalize(raw))
  }

  fn dimension(&self) -> usize {
    self.dimension
  }
}

/// Shared call counters for [`MockProvider`], cloned out before the
/// provider is boxed into the orchestrator.
#[derive(Clone, Default)]
pub struct CallCounts {
  pub organic: Arc<AtomicUsize>,
  pub news: Arc<AtomicUsize>,
}

impl CallCounts {
  pub fn organic_calls(&self) -> usize {
    self.organic.load(Ordering::SeqCst)
  }

  pub fn news_calls(&self) -> usize {
    self.news.load(Ordering::SeqCst)
  }
}

/// Provider returning canned data and counting calls.
pub struct MockProvider {
  analysis: CompetitiveAnalysis,
  trending: Vec<TrendingTopic>,
  counts: CallCounts,
}

impl MockProvider {
  pub fn new(analysis: CompetitiveAnalysis, trending: Vec<TrendingTopic>) -> Self {
    Self { analysis, trending, counts: CallCounts::default() }
  }

  pub fn counts(&self) -> CallCounts {
    self.counts.clone()
  }
}

#[async_trait]
impl ResearchProvider for MockProvider {
  async fn organic_search(&self, _query: &str) -> Result<CompetitiveAnalysis, ProviderError> {
    self.counts.organic.fetch_add(1, Ordering::SeqCst);
    Ok(self.analysis.clone())
  }

  async fn news_search(&self, _query: &str) -> Result<Vec<TrendingTopic>, ProviderError> {
    self.counts.news.fetch_add(1, Ordering::SeqCst);
    Ok(self.trending.clone())
  }
}

/// Provider that simulates an outage on every call.
pub struct FailingProvider;

#[async_trait]
impl ResearchProvider for FailingProvider {
  async fn organic_search(&self, _query: &str) -> Result<CompetitiveAnalysis, ProviderError> {
    Err(ProviderError::Malformed("simulated provider outage".to_string()))
  }

  async fn news_search(&self, _query: &str) -> Result<Vec<TrendingTopic>, ProviderError> {
    Err(ProviderError::Malformed("simulated provider outage".to_string()))
  }
}

/// Store whose every operation fails, for fail-open tests.
pub struct FailingStore;

#[async_trait]
impl TopicStore for FailingStore {
  async fn add(&self, _record: &TopicRecord) -> Result<()> {
    Err(anyhow!("store offline"))
  }

  async fn query(&self, _text: &str, _k: usize) -> Result<Vec<ScoredRecord>> {
    Err(anyhow!("store offline"))
  }

  async fn list_all(&self) -> Result<Vec<TopicRecord>> {
    Err(anyhow!("store offline"))
  }

  async fn delete(&self, _id: &str) -> Result<()> {
    Err(anyhow!("store offline"))
  }

  async fn prune_before(&self, _cutoff: &str) -> Result<usize> {
    Err(anyhow!("store offline"))
  }

  async fn count(&self) -> Result<usize> {
    Err(anyhow!("store offline"))
  }

  async fn clear(&self) -> Result<()> {
    Err(anyhow!("store offline"))
  }

  fn location(&self) -> String {
    "offline".to_string()
  }
}

/// The research payload used across the integration tests, mirroring
/// the end-to-end scenario: one competitor, one on-topic question.
pub fn sample_payload() -> ResearchPayload {
  ResearchPayload {
    top_competitors: vec![Competitor {
      title: "Top 10 Email Tips".to_string(),
      snippet: "The best email advice".to_string(),
      link: "https://x".to_string(),
      position: 1,
    }],
    people_also_ask: vec!["What is email marketing for ecommerce?".to_string()],
    related_searches: vec!["email marketing tools".to_string()],
    trending_topics: vec![TrendingTopic {
      title: "Email automation on the rise".to_string(),
      source: "Example News".to_string(),
      date: "2026-08-01".to_string(),
    }],
  }
}

pub fn sample_analysis() -> CompetitiveAnalysis {
  let payload = sample_payload();
  CompetitiveAnalysis {
    top_competitors: payload.top_competitors,
    people_also_ask: payload.people_also_ask,
    related_searches: payload.related_searches,
  }
}

/// A unit vector along one axis of an 8-dimensional space.
pub fn axis_vector(axis: usize) -> Vec<f32> {
  let mut vector = vec![0.0; 8];
  vector[axis] = 1.0;
  vector
}

/// A unit vector whose cosine similarity with `axis_vector(0)` is
/// exactly `similarity`.
pub fn vector_at_similarity(similarity: f32) -> Vec<f32> {
  let mut vector = vec![0.0; 8];
  vector[0] = similarity;
  vector[1] = (1.0 - similarity * similarity).sqrt();

  let actual = cosine_similarity(&vector, &axis_vector(0));
  assert!((actual - similarity).abs() < 1e-6, "engineered vector is off: {actual}");
  vector
}
