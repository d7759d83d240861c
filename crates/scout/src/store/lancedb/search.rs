//! Vector search and scan operations over the topic table.

use anyhow::{anyhow, Result};
use arrow::array::{Array, Float32Array};
use arrow::record_batch::RecordBatch;
use futures::stream::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::Table;

use super::records::decode_topic_records;
use crate::store::{ScoredRecord, TopicRecord};

/// Run a nearest-neighbor search and return candidates by ascending
/// distance.
pub async fn search_nearest(
  table: &Table,
  query_embedding: &[f32],
  k: usize,
) -> Result<Vec<ScoredRecord>> {
  let mut stream = table
    .vector_search(query_embedding)?
    .column("embedding")
    .limit(k)
    .execute()
    .await
    .map_err(|e| anyhow!("vector search failed: {}", e))?;

  let mut results = Vec::new();
  while let Some(batch) = stream.next().await {
    let batch = batch.map_err(|e| anyhow!("error reading search batch: {}", e))?;
    results.extend(decode_scored_batch(&batch)?);
  }

  if results.is_empty() {
    herald::verbose!("no nearby topics in the index");
  }
  Ok(results)
}

/// Read every record in the table, without distances.
pub async fn scan_records(table: &Table) -> Result<Vec<TopicRecord>> {
  let mut stream =
    table.query().execute().await.map_err(|e| anyhow!("table scan failed: {}", e))?;

  let mut records = Vec::new();
  while let Some(batch) = stream.next().await {
    let batch = batch.map_err(|e| anyhow!("error reading scan batch: {}", e))?;
    records.extend(decode_topic_records(&batch)?);
  }

  Ok(records)
}

fn decode_scored_batch(batch: &RecordBatch) -> Result<Vec<ScoredRecord>> {
  let records = decode_topic_records(batch)?;
  let distance_array = distance_column(batch);

  let scored = records
    .into_iter()
    .enumerate()
    .map(|(i, record)| ScoredRecord {
      distance: cosine_distance_from_l2(raw_distance(distance_array, i)),
      record,
    })
    .collect();

  Ok(scored)
}

fn distance_column(batch: &RecordBatch) -> Option<&Float32Array> {
  batch.column_by_name("_distance").and_then(|col| col.as_any().downcast_ref::<Float32Array>())
}

fn raw_distance(distance_array: Option<&Float32Array>, row: usize) -> f32 {
  // A missing distance column would make every candidate look like an
  // exact hit; treat it as maximally distant instead.
  const MISSING_DISTANCE: f32 = 2.0;

  match distance_array {
    Some(array) if row < array.len() && !array.is_null(row) => array.value(row),
    _ => MISSING_DISTANCE,
  }
}

/// LanceDB reports squared L2 distance. For unit vectors that equals
/// `2 - 2cos`, i.e. twice the cosine distance, so halving recovers the
/// cosine distance the cache contract is defined in.
fn cosine_distance_from_l2(distance: f32) -> f32 {
  (distance / 2.0).clamp(0.0, 1.0)
}
