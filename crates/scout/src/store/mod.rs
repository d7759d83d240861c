//! Topic store abstraction for embedding-backed nearest-neighbor search.
//!
//! The cache talks to a [`TopicStore`] trait object so the index
//! implementation (LanceDB here) can be swapped without touching the
//! similarity logic, and so tests can inject failing or in-memory
//! stores.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};

pub mod lancedb;

pub use self::lancedb::LanceTopicStore;

/// One persisted cache entry. Immutable once stored: re-caching a topic
/// inserts a new record with a fresh id rather than updating in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRecord {
  /// Content-hash + insertion-time identifier.
  pub id: String,
  /// The original natural-language query; this is what gets embedded.
  pub topic_text: String,
  /// Serialized JSON research metadata.
  pub metadata: String,
  /// RFC 3339 insertion timestamp.
  pub cached_at: String,
}

impl TopicRecord {
  pub fn new(topic_text: &str, metadata: String, cached_at: String) -> Self {
    Self { id: record_id(topic_text), topic_text: topic_text.to_string(), metadata, cached_at }
  }
}

/// A query candidate with its distance from the query embedding.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
  pub record: TopicRecord,
  /// Cosine distance in [0, 1]; smaller is closer.
  pub distance: f32,
}

/// Embedding-backed text index for topic records.
#[async_trait]
pub trait TopicStore: Send + Sync {
  /// Embed the record's topic text and persist it.
  async fn add(&self, record: &TopicRecord) -> Result<()>;

  /// Return up to `k` nearest records by ascending distance. An empty
  /// index yields an empty list, not an error.
  async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredRecord>>;

  /// Every stored record, in unspecified order.
  async fn list_all(&self) -> Result<Vec<TopicRecord>>;

  /// Delete a single record by id.
  async fn delete(&self, id: &str) -> Result<()>;

  /// Delete records cached strictly before the RFC 3339 cutoff.
  /// Returns how many were removed.
  async fn prune_before(&self, cutoff: &str) -> Result<usize>;

  async fn count(&self) -> Result<usize>;

  /// Remove every record.
  async fn clear(&self) -> Result<()>;

  /// Human-readable description of where the index lives.
  fn location(&self) -> String;
}

/// Derive a record id from the topic content plus the current time.
///
/// The hash half is deterministic per topic string; the millisecond
/// timestamp keeps repeated caching of the same literal topic from
/// colliding. Near-duplicate topics intentionally get distinct records;
/// deduplication happens at query time via the similarity threshold.
fn record_id(topic_text: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(topic_text.as_bytes());
  let digest = hex::encode(hasher.finalize());

  format!("topic-{}-{}", &digest[..16], Utc::now().timestamp_millis())
}
