//! Smart research orchestration: cache first, paid API second.

pub mod provider;
pub mod serp;

use serde::Serialize;
use thiserror::Error;

use crate::adapt::{adapt, AdaptedPayload};
use crate::cache::{CacheError, CacheStats, SimilarityCache};
use crate::types::{ResearchPayload, TrendingTopic};
use provider::{ProviderError, ResearchProvider};

/// Analysis failures visible to callers. Cache trouble never appears
/// here; the orchestrator absorbs it as a miss.
#[derive(Debug, Error)]
pub enum ResearchError {
  #[error(transparent)]
  Provider(#[from] ProviderError),
}

/// The outcome of one analysis, tagged with where the data came from.
#[derive(Debug, Serialize)]
#[serde(tag = "source")]
pub enum ResearchReport {
  #[serde(rename = "cache_adapted")]
  CacheAdapted(AdaptedPayload),

  #[serde(rename = "fresh_api")]
  FreshApi {
    topic: String,
    #[serde(flatten)]
    payload: ResearchPayload,
  },
}

impl ResearchReport {
  pub fn source(&self) -> &'static str {
    match self {
      ResearchReport::CacheAdapted(_) => "cache_adapted",
      ResearchReport::FreshApi { .. } => "fresh_api",
    }
  }
}

/// Cache-aware competitive analysis.
///
/// One lookup, then either an adaptation (hit) or two provider round
/// trips plus a best-effort write-back (miss). Strictly sequential; a
/// best-effort content pipeline has no need for internal parallelism.
pub struct SmartResearch {
  cache: SimilarityCache,
  provider: Box<dyn ResearchProvider>,
  threshold: f32,
}

impl SmartResearch {
  pub fn new(cache: SimilarityCache, provider: Box<dyn ResearchProvider>, threshold: f32) -> Self {
    Self { cache, provider, threshold }
  }

  /// Analyze a topic at the configured similarity threshold.
  pub async fn analyze(&self, topic: &str) -> Result<ResearchReport, ResearchError> {
    self.analyze_with_threshold(topic, self.threshold).await
  }

  /// Analyze a topic, reusing cached research when a prior topic is at
  /// least `threshold` similar. Store failures are logged and treated
  /// as misses: a miss only costs an extra fetch, not correctness.
  pub async fn analyze_with_threshold(
    &self,
    topic: &str,
    threshold: f32,
  ) -> Result<ResearchReport, ResearchError> {
    herald::info!(&format!("searching for analysis similar to '{topic}'"));

    let hit = match self.cache.lookup(topic, threshold).await {
      Ok(hit) => hit,
      Err(e) => {
        herald::warn!(&format!("cache lookup failed, treating as miss: {e}"));
        None
      }
    };

    if let Some(hit) = hit {
      herald::info!(&format!(
        "reusing '{}' at {:.0}% similarity - no API calls needed",
        hit.analysis.topic_text,
        hit.similarity * 100.0
      ));

      let adapted = adapt(
        &hit.analysis.topic_text,
        topic,
        hit.similarity,
        &hit.analysis.cached_at,
        &hit.analysis.payload,
      );
      return Ok(ResearchReport::CacheAdapted(adapted));
    }

    herald::info!("no similar topic cached - performing fresh analysis");
    self.fresh_analysis(topic).await
  }

  /// Fetch fresh results, bypassing the cache read. The result is
  /// still written back for future lookups.
  pub async fn force_fresh(&self, topic: &str) -> Result<ResearchReport, ResearchError> {
    herald::info!("forcing fresh analysis (ignoring cache)");
    self.fresh_analysis(topic).await
  }

  /// Trending items only: cached ones when a similar topic exists,
  /// otherwise a single fresh news fetch (not written back - trending
  /// data alone is not a full analysis).
  pub async fn trending(&self, topic: &str) -> Result<Vec<TrendingTopic>, ResearchError> {
    let hit = match self.cache.lookup(topic, self.threshold).await {
      Ok(hit) => hit,
      Err(e) => {
        herald::warn!(&format!("cache lookup failed, treating as miss: {e}"));
        None
      }
    };

    match hit {
      Some(hit) => Ok(hit.analysis.payload.trending_topics),
      None => Ok(self.provider.news_search(&trending_query(topic)).await?),
    }
  }

  pub async fn cache_stats(&self) -> Result<CacheStats, CacheError> {
    self.cache.stats().await
  }

  pub async fn clear_cache(&self) -> Result<(), CacheError> {
    self.cache.clear().await
  }

  async fn fresh_analysis(&self, topic: &str) -> Result<ResearchReport, ResearchError> {
    let analysis = self.provider.organic_search(topic).await?;
    let trending = self.provider.news_search(&trending_query(topic)).await?;

    let payload = ResearchPayload {
      top_competitors: analysis.top_competitors,
      people_also_ask: analysis.people_also_ask,
      related_searches: analysis.related_searches,
      trending_topics: trending,
    };

    // Write-back is best effort: failing to cache must not fail the
    // analysis that already succeeded.
    match self.cache.insert(topic, &payload).await {
      Ok(()) => herald::info!("fresh analysis cached for future use"),
      Err(e) => herald::warn!(&format!("could not cache fresh analysis: {e}")),
    }

    Ok(ResearchReport::FreshApi { topic: topic.to_string(), payload })
  }
}

fn trending_query(topic: &str) -> String {
  format!("{topic} trends")
}
