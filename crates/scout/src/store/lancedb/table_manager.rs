//! Table lifecycle operations for the LanceDB index.

use anyhow::{anyhow, Result};
use arrow::record_batch::RecordBatchIterator;
use lancedb::{Connection, Table};

use super::records::{rows_to_batch, TopicRow};

/// Owns the connection and the create-or-append logic for the topic
/// table. The table does not exist until the first record is stored.
pub struct TableManager {
  connection: Connection,
  table_name: String,
  dimension: usize,
}

impl TableManager {
  pub fn new(connection: Connection, table_name: String, dimension: usize) -> Self {
    Self { connection, table_name, dimension }
  }

  pub async fn table_exists(&self) -> Result<bool> {
    let tables = self
      .connection
      .table_names()
      .execute()
      .await
      .map_err(|e| anyhow!("failed to list tables: {}", e))?;
    Ok(tables.contains(&self.table_name))
  }

  pub async fn get_table(&self) -> Result<Table> {
    self
      .connection
      .open_table(&self.table_name)
      .execute()
      .await
      .map_err(|e| anyhow!("failed to open table '{}': {}", self.table_name, e))
  }

  /// Store a row, creating the table from it when this is the first
  /// record ever cached.
  pub async fn store_row(&self, row: TopicRow) -> Result<()> {
    if self.table_exists().await? {
      self.append_row(row).await
    } else {
      self.create_table_with_first_row(row).await
    }
  }

  async fn create_table_with_first_row(&self, row: TopicRow) -> Result<()> {
    let id = row.record.id.clone();
    let batch = rows_to_batch(&[row], self.dimension)?;
    let schema = batch.schema();
    let batch_iter = RecordBatchIterator::new(vec![Ok(batch)], schema);

    self
      .connection
      .create_table(&self.table_name, batch_iter)
      .execute()
      .await
      .map_err(|e| anyhow!("failed to create table with first record: {}", e))?;

    herald::info!(&format!("created table '{}' with first record {}", self.table_name, id));
    Ok(())
  }

  async fn append_row(&self, row: TopicRow) -> Result<()> {
    let id = row.record.id.clone();
    let batch = rows_to_batch(&[row], self.dimension)?;
    let schema = batch.schema();
    let batch_iter = RecordBatchIterator::new(vec![Ok(batch)], schema);

    let table = self.get_table().await?;
    table
      .add(batch_iter)
      .execute()
      .await
      .map_err(|e| anyhow!("failed to store record: {}", e))?;

    herald::verbose!(&format!("stored record {id}"));
    Ok(())
  }

  /// Row count; zero when the table has never been created.
  pub async fn count_rows(&self) -> Result<usize> {
    if !self.table_exists().await? {
      return Ok(0);
    }
    let table = self.get_table().await?;
    Ok(table.count_rows(None).await?)
  }

  /// Delete rows matching a SQL predicate. A no-op when the table does
  /// not exist yet.
  pub async fn delete_where(&self, predicate: &str) -> Result<()> {
    if !self.table_exists().await? {
      return Ok(());
    }
    let table = self.get_table().await?;
    table.delete(predicate).await.map_err(|e| anyhow!("delete failed: {}", e))?;
    Ok(())
  }
}
