//! Arrow RecordBatch conversion for topic records.

use anyhow::{anyhow, Result};
use arrow::array::{Array, Float32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

use crate::store::TopicRecord;

/// A topic record paired with its embedding, ready for storage.
#[derive(Debug, Clone)]
pub struct TopicRow {
  pub record: TopicRecord,
  pub embedding: Vec<f32>,
}

/// Arrow schema for the topic table. `cached_at` is a plain string
/// column so age pruning can run as a SQL predicate; RFC 3339 strings
/// order lexicographically.
pub fn topic_schema(dimension: usize) -> Arc<Schema> {
  Arc::new(Schema::new(vec![
    Field::new("id", DataType::Utf8, false),
    Field::new("topic_text", DataType::Utf8, false),
    Field::new("metadata", DataType::Utf8, false),
    Field::new(
      "embedding",
      DataType::FixedSizeList(
        Arc::new(Field::new("item", DataType::Float32, true)),
        dimension as i32,
      ),
      false,
    ),
    Field::new("cached_at", DataType::Utf8, false),
  ]))
}

/// Convert rows into a single Arrow batch for insertion.
pub fn rows_to_batch(rows: &[TopicRow], dimension: usize) -> Result<RecordBatch> {
  if rows.is_empty() {
    return Err(anyhow!("cannot build a RecordBatch from zero rows"));
  }

  let schema = topic_schema(dimension);

  let id_array = string_column(rows, |r| &r.record.id);
  let topic_array = string_column(rows, |r| &r.record.topic_text);
  let metadata_array = string_column(rows, |r| &r.record.metadata);
  let embedding_array = embedding_column(rows, dimension);
  let cached_at_array = string_column(rows, |r| &r.record.cached_at);

  RecordBatch::try_new(
    schema,
    vec![
      Arc::new(id_array),
      Arc::new(topic_array),
      Arc::new(metadata_array),
      Arc::new(embedding_array),
      Arc::new(cached_at_array),
    ],
  )
  .map_err(|e| anyhow!("failed to assemble RecordBatch: {}", e))
}

fn string_column<F>(rows: &[TopicRow], field: F) -> StringArray
where
  F: Fn(&TopicRow) -> &str,
{
  let values: Vec<Option<&str>> = rows.iter().map(|r| Some(field(r))).collect();
  StringArray::from(values)
}

fn embedding_column(rows: &[TopicRow], dimension: usize) -> arrow::array::FixedSizeListArray {
  use arrow::array::FixedSizeListBuilder;

  let mut builder =
    FixedSizeListBuilder::new(Float32Array::builder(dimension * rows.len()), dimension as i32);

  for row in rows {
    for &value in &row.embedding {
      builder.values().append_value(value);
    }
    builder.append(true);
  }

  builder.finish()
}

/// Decode the topic-record columns of a result batch. Works for both
/// scans and vector-search results (the latter carry an extra
/// `_distance` column handled separately).
pub fn decode_topic_records(batch: &RecordBatch) -> Result<Vec<TopicRecord>> {
  let id_array = string_array(batch, "id")?;
  let topic_array = string_array(batch, "topic_text")?;
  let metadata_array = string_array(batch, "metadata")?;
  let cached_at_array = string_array(batch, "cached_at")?;

  let mut records = Vec::with_capacity(batch.num_rows());
  for i in 0..batch.num_rows() {
    records.push(TopicRecord {
      id: id_array.value(i).to_string(),
      topic_text: topic_array.value(i).to_string(),
      metadata: metadata_array.value(i).to_string(),
      cached_at: cached_at_array.value(i).to_string(),
    });
  }

  Ok(records)
}

fn string_array<'a>(batch: &'a RecordBatch, column: &str) -> Result<&'a StringArray> {
  batch
    .column_by_name(column)
    .ok_or_else(|| anyhow!("missing '{}' column in result batch", column))?
    .as_any()
    .downcast_ref::<StringArray>()
    .ok_or_else(|| anyhow!("'{}' column is not a string array", column))
}
