//! CLI command handlers: wire configuration, store, embedder, and
//! provider together and print the results.

use anyhow::{anyhow, Result};
use colored::*;
use std::sync::Arc;

use crate::cache::SimilarityCache;
use crate::cli::display;
use crate::config::Config;
use crate::embedding::{Embedder, NeuralEmbedder};
use crate::research::provider::ResearchProvider;
use crate::research::serp::SerpClient;
use crate::research::SmartResearch;
use crate::store::lancedb::TOPIC_TABLE;
use crate::store::LanceTopicStore;

/// Build the cache over the configured index directory. The neural
/// embedder initializes lazily, so cache-only commands (stats, clear)
/// never pay for a model load.
async fn open_cache(config: &Config) -> Result<SimilarityCache> {
  let embedder: Arc<dyn Embedder> = Arc::new(NeuralEmbedder::new());
  let store = LanceTopicStore::new(config.cache_dir.clone(), TOPIC_TABLE, embedder).await?;
  Ok(SimilarityCache::new(Box::new(store)))
}

fn build_provider(config: &Config) -> Result<Box<dyn ResearchProvider>> {
  let api_key = config
    .serp_api_key
    .clone()
    .ok_or_else(|| anyhow!("SERP_API_KEY is not set - research commands need a search API key"))?;
  Ok(Box::new(SerpClient::new(api_key)))
}

pub async fn analyze(topic: &str, threshold: Option<f32>, fresh: bool, json: bool) -> Result<()> {
  let config = Config::from_env()?;
  let cache = open_cache(&config).await?;
  let provider = build_provider(&config)?;
  let research =
    SmartResearch::new(cache, provider, threshold.unwrap_or(config.similarity_threshold));

  let report =
    if fresh { research.force_fresh(topic).await? } else { research.analyze(topic).await? };

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    display::print_report(&report);
  }
  Ok(())
}

/// Cache-only probe: report what a lookup would reuse, without ever
/// touching the provider.
pub async fn lookup(topic: &str, threshold: Option<f32>) -> Result<()> {
  let config = Config::from_env()?;
  let cache = open_cache(&config).await?;

  let hit = cache.lookup(topic, threshold.unwrap_or(config.similarity_threshold)).await?;
  display::print_hit(topic, hit.as_ref());
  Ok(())
}

pub async fn trending(topic: &str) -> Result<()> {
  let config = Config::from_env()?;
  let cache = open_cache(&config).await?;
  let provider = build_provider(&config)?;
  let research = SmartResearch::new(cache, provider, config.similarity_threshold);

  let items = research.trending(topic).await?;
  if items.is_empty() {
    println!("No trending items found for {}", topic.cyan());
  } else {
    display::print_trending(&items);
  }
  Ok(())
}

pub async fn stats() -> Result<()> {
  let config = Config::from_env()?;
  let cache = open_cache(&config).await?;

  let stats = cache.stats().await?;
  println!("{} cached topics: {}", "●".blue(), stats.record_count.to_string().bold());
  println!("  index location: {}", stats.location.dimmed());
  Ok(())
}

pub async fn clear(force: bool) -> Result<()> {
  let config = Config::from_env()?;

  if !force {
    print!("Delete every cached analysis? (y/N): ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    let answer = input.trim().to_lowercase();
    if answer != "y" && answer != "yes" {
      println!("Clear operation cancelled.");
      return Ok(());
    }
  }

  let cache = open_cache(&config).await?;
  cache.clear().await?;
  println!("{} cache cleared", "✓".green());
  Ok(())
}
