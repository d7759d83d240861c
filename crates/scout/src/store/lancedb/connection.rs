//! Database connection management for the LanceDB index.

use anyhow::{anyhow, Result};
use lancedb::{connect, Connection};
use std::path::PathBuf;

/// Open a LanceDB connection, creating the data directory if needed.
pub async fn create_connection(data_dir: PathBuf) -> Result<Connection> {
  ensure_data_directory(&data_dir)?;

  connect(&data_dir.to_string_lossy())
    .execute()
    .await
    .map_err(|e| anyhow!("failed to connect to LanceDB at {}: {}", data_dir.display(), e))
}

fn ensure_data_directory(data_dir: &PathBuf) -> Result<()> {
  if !data_dir.exists() {
    std::fs::create_dir_all(data_dir)
      .map_err(|e| anyhow!("failed to create cache directory {}: {}", data_dir.display(), e))?;
  }
  Ok(())
}
