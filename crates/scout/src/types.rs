//! Research payload types shared across the cache, adaptation, and
//! provider boundaries.

use serde::{Deserialize, Serialize};

/// A single organic competitor entry from a SERP analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
  /// Result title as returned by the search provider.
  pub title: String,
  /// Result snippet text.
  pub snippet: String,
  /// Result URL.
  pub link: String,
  /// Organic ranking position, retained as returned.
  pub position: u32,
}

/// A trending news item related to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingTopic {
  pub title: String,
  pub source: String,
  pub date: String,
}

/// The complete competitive-research payload for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchPayload {
  pub top_competitors: Vec<Competitor>,
  pub people_also_ask: Vec<String>,
  pub related_searches: Vec<String>,
  pub trending_topics: Vec<TrendingTopic>,
}

impl ResearchPayload {
  /// An empty payload, mostly useful as a test fixture.
  pub fn empty() -> Self {
    Self {
      top_competitors: Vec::new(),
      people_also_ask: Vec::new(),
      related_searches: Vec::new(),
      trending_topics: Vec::new(),
    }
  }
}
