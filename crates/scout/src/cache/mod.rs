//! Similarity cache over the topic store.
//!
//! Lookups embed the query topic, pull the nearest few prior topics,
//! and return the closest one above the similarity threshold together
//! with its deserialized research payload. Errors are explicit
//! [`CacheError`] values so callers can tell "nothing similar cached"
//! from "the store is broken"; the orchestrator chooses to treat both
//! as misses.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{TopicRecord, TopicStore};
use crate::types::{Competitor, ResearchPayload, TrendingTopic};

/// How many nearest candidates a lookup considers before giving up.
pub const CANDIDATE_POOL: usize = 3;

#[derive(Debug, Error)]
pub enum CacheError {
  #[error("vector store error: {0}")]
  Store(String),

  #[error("metadata serialization failed: {0}")]
  Serialization(#[from] serde_json::Error),
}

/// Persisted JSON layout of a record's `metadata` column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMetadata {
  pub competitors: Vec<Competitor>,
  pub people_also_ask: Vec<String>,
  pub related_searches: Vec<String>,
  pub trending_topics: Vec<TrendingTopic>,
  pub cached_at: String,
}

/// A decoded cache entry returned from a successful lookup.
#[derive(Debug, Clone)]
pub struct CachedAnalysis {
  pub id: String,
  pub topic_text: String,
  pub payload: ResearchPayload,
  pub cached_at: String,
}

/// A qualifying lookup result.
#[derive(Debug, Clone)]
pub struct CacheHit {
  /// `1 - cosine_distance`, in [0, 1].
  pub similarity: f32,
  pub analysis: CachedAnalysis,
}

#[derive(Debug, Clone)]
pub struct CacheStats {
  pub record_count: usize,
  pub location: String,
}

/// Bound on cache growth, applied before each insert.
///
/// `Disabled` reproduces the original unbounded behavior and is the
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
  Disabled,
  /// Keep at most this many records; the oldest are dropped first.
  MaxRecords(usize),
  /// Drop records older than this many days.
  MaxAgeDays(i64),
}

pub struct SimilarityCache {
  store: Box<dyn TopicStore>,
  eviction: EvictionPolicy,
}

impl SimilarityCache {
  pub fn new(store: Box<dyn TopicStore>) -> Self {
    Self { store, eviction: EvictionPolicy::Disabled }
  }

  pub fn with_eviction(store: Box<dyn TopicStore>, eviction: EvictionPolicy) -> Self {
    Self { store, eviction }
  }

  /// Find the closest cached topic with similarity >= `threshold`.
  ///
  /// Candidates arrive in ascending-distance order, so the first one
  /// below the threshold ends the scan. A candidate whose metadata no
  /// longer parses is skipped rather than failing the whole lookup.
  pub async fn lookup(&self, topic: &str, threshold: f32) -> Result<Option<CacheHit>, CacheError> {
    let candidates = self
      .store
      .query(topic, CANDIDATE_POOL)
      .await
      .map_err(|e| CacheError::Store(format!("{e:#}")))?;

    for candidate in candidates {
      let similarity = 1.0 - candidate.distance;
      if similarity < threshold {
        break;
      }

      match serde_json::from_str::<StoredMetadata>(&candidate.record.metadata) {
        Ok(metadata) => {
          return Ok(Some(CacheHit {
            similarity,
            analysis: CachedAnalysis {
              id: candidate.record.id,
              topic_text: candidate.record.topic_text,
              cached_at: metadata.cached_at.clone(),
              payload: ResearchPayload {
                top_competitors: metadata.competitors,
                people_also_ask: metadata.people_also_ask,
                related_searches: metadata.related_searches,
                trending_topics: metadata.trending_topics,
              },
            },
          }));
        }
        Err(e) => {
          herald::warn!(&format!(
            "skipping cached record {} with unreadable metadata: {e}",
            candidate.record.id
          ));
          continue;
        }
      }
    }

    Ok(None)
  }

  /// Cache a research payload under `topic`. The record id combines a
  /// content hash with the insertion time, so re-caching the same
  /// literal topic adds a new record instead of colliding.
  pub async fn insert(&self, topic: &str, payload: &ResearchPayload) -> Result<(), CacheError> {
    if let Err(e) = self.apply_eviction().await {
      // A failed pruning pass should not lose the fresh data.
      herald::warn!(&format!("eviction pass failed, inserting anyway: {e}"));
    }

    let cached_at = Utc::now().to_rfc3339();
    let metadata = StoredMetadata {
      competitors: payload.top_competitors.clone(),
      people_also_ask: payload.people_also_ask.clone(),
      related_searches: payload.related_searches.clone(),
      trending_topics: payload.trending_topics.clone(),
      cached_at: cached_at.clone(),
    };

    let record = TopicRecord::new(topic, serde_json::to_string(&metadata)?, cached_at);
    self.store.add(&record).await.map_err(|e| CacheError::Store(format!("{e:#}")))
  }

  /// Remove every cached record.
  pub async fn clear(&self) -> Result<(), CacheError> {
    self.store.clear().await.map_err(|e| CacheError::Store(format!("{e:#}")))
  }

  pub async fn stats(&self) -> Result<CacheStats, CacheError> {
    let record_count =
      self.store.count().await.map_err(|e| CacheError::Store(format!("{e:#}")))?;

    Ok(CacheStats { record_count, location: self.store.location() })
  }

  async fn apply_eviction(&self) -> anyhow::Result<()> {
    match self.eviction {
      EvictionPolicy::Disabled => Ok(()),
      EvictionPolicy::MaxAgeDays(days) => {
        let cutoff = (Utc::now() - Duration::days(days)).to_rfc3339();
        let removed = self.store.prune_before(&cutoff).await?;
        if removed > 0 {
          herald::info!(&format!("evicted {removed} records older than {days} days"));
        }
        Ok(())
      }
      EvictionPolicy::MaxRecords(cap) => self.evict_to_capacity(cap).await,
    }
  }

  /// Delete the oldest records so that after one more insert the cache
  /// holds at most `cap` records.
  async fn evict_to_capacity(&self, cap: usize) -> anyhow::Result<()> {
    let count = self.store.count().await?;
    if count < cap || cap == 0 {
      return Ok(());
    }

    let mut records = self.store.list_all().await?;
    records.sort_by(|a, b| a.cached_at.cmp(&b.cached_at));

    let overflow = count + 1 - cap;
    for record in records.iter().take(overflow) {
      self.store.delete(&record.id).await?;
    }

    herald::info!(&format!("evicted {overflow} records to stay within capacity {cap}"));
    Ok(())
  }
}
