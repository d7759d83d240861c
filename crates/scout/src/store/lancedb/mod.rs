//! LanceDB implementation of the topic store.
//!
//! Records live in a single table whose embedding column is filled by
//! an injected [`Embedder`]; nearest-neighbor queries embed the query
//! text with the same embedder.

pub mod connection;
pub mod records;
pub mod search;
pub mod table_manager;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::embedding::Embedder;
use crate::store::{ScoredRecord, TopicRecord, TopicStore};
use connection::create_connection;
use records::TopicRow;
use table_manager::TableManager;

/// Default table name for the research cache.
pub const TOPIC_TABLE: &str = "research_topics";

pub struct LanceTopicStore {
  manager: TableManager,
  embedder: Arc<dyn Embedder>,
  data_dir: PathBuf,
}

impl LanceTopicStore {
  /// Open (or create) the index under `data_dir`. The table itself is
  /// created lazily with the first stored record.
  pub async fn new(
    data_dir: PathBuf,
    table_name: &str,
    embedder: Arc<dyn Embedder>,
  ) -> Result<Self> {
    let connection = create_connection(data_dir.clone()).await?;
    let manager = TableManager::new(connection, table_name.to_string(), embedder.dimension());

    Ok(Self { manager, embedder, data_dir })
  }

  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    let embedding =
      self.embedder.embed(text).await.map_err(|e| anyhow!("embedding failed: {}", e))?;

    if embedding.len() != self.embedder.dimension() {
      return Err(anyhow!(
        "embedder returned {} dimensions, expected {}",
        embedding.len(),
        self.embedder.dimension()
      ));
    }
    Ok(embedding)
  }
}

#[async_trait]
impl TopicStore for LanceTopicStore {
  async fn add(&self, record: &TopicRecord) -> Result<()> {
    let embedding = self.embed(&record.topic_text).await?;
    self.manager.store_row(TopicRow { record: record.clone(), embedding }).await
  }

  async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredRecord>> {
    if !self.manager.table_exists().await? {
      return Ok(Vec::new());
    }

    let embedding = self.embed(text).await?;
    let table = self.manager.get_table().await?;
    search::search_nearest(&table, &embedding, k).await
  }

  async fn list_all(&self) -> Result<Vec<TopicRecord>> {
    if !self.manager.table_exists().await? {
      return Ok(Vec::new());
    }

    let table = self.manager.get_table().await?;
    search::scan_records(&table).await
  }

  async fn delete(&self, id: &str) -> Result<()> {
    self.manager.delete_where(&format!("id = '{id}'")).await
  }

  async fn prune_before(&self, cutoff: &str) -> Result<usize> {
    let before = self.manager.count_rows().await?;
    self.manager.delete_where(&format!("cached_at < '{cutoff}'")).await?;
    let after = self.manager.count_rows().await?;

    Ok(before.saturating_sub(after))
  }

  async fn count(&self) -> Result<usize> {
    self.manager.count_rows().await
  }

  async fn clear(&self) -> Result<()> {
    self.manager.delete_where("id IS NOT NULL").await?;
    herald::info!("cleared all cached topics");
    Ok(())
  }

  fn location(&self) -> String {
    self.data_dir.display().to_string()
  }
}
