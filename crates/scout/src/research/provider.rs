//! Research provider boundary.
//!
//! The orchestrator only knows this trait; the concrete SerpAPI client
//! lives in [`super::serp`] and tests substitute canned providers.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Competitor, TrendingTopic};

/// Competitive results for one organic search.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitiveAnalysis {
  pub top_competitors: Vec<Competitor>,
  pub people_also_ask: Vec<String>,
  pub related_searches: Vec<String>,
}

/// Provider failures are fatal for the request that triggered them:
/// no retry, no backoff.
#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("SERP_API_KEY is not configured")]
  MissingApiKey,

  #[error("search request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("unexpected provider response: {0}")]
  Malformed(String),
}

/// External keyword-to-structured-results search service.
#[async_trait]
pub trait ResearchProvider: Send + Sync {
  /// Organic results, people-also-ask questions, and related searches
  /// for a query.
  async fn organic_search(&self, query: &str) -> Result<CompetitiveAnalysis, ProviderError>;

  /// Recent news items for a query.
  async fn news_search(&self, query: &str) -> Result<Vec<TrendingTopic>, ProviderError>;
}
