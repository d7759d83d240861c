//! SerpAPI-wire-format search client.
//!
//! Speaks the `search.json` endpoint: organic results, people-also-ask
//! boxes, related searches, and (with `tbm=nws`) news results. Decoding
//! is split into pure functions so the wire handling stays testable
//! without a network.

use async_trait::async_trait;
use serde::Deserialize;

use super::provider::{CompetitiveAnalysis, ProviderError, ResearchProvider};
use crate::types::{Competitor, TrendingTopic};

const SERP_ENDPOINT: &str = "https://serpapi.com/search.json";

// Only the leading results carry signal for competitive analysis.
const MAX_COMPETITORS: usize = 5;
const MAX_TRENDING: usize = 5;

pub struct SerpClient {
  api_key: String,
  base_url: String,
  http: reqwest::Client,
}

impl SerpClient {
  pub fn new(api_key: String) -> Self {
    Self { api_key, base_url: SERP_ENDPOINT.to_string(), http: reqwest::Client::new() }
  }

  /// Point the client at a different endpoint (tests, proxies).
  pub fn with_base_url(api_key: String, base_url: String) -> Self {
    Self { api_key, base_url, http: reqwest::Client::new() }
  }

  async fn fetch(&self, query: &str, news: bool) -> Result<SerpResponse, ProviderError> {
    let mut params = vec![
      ("q", query.to_string()),
      ("api_key", self.api_key.clone()),
      ("num", "10".to_string()),
      ("hl", "en".to_string()),
      ("gl", "us".to_string()),
    ];
    if news {
      params.push(("tbm", "nws".to_string()));
    }

    let response = self.http.get(&self.base_url).query(&params).send().await?;
    let response = response.error_for_status()?;

    Ok(response.json::<SerpResponse>().await?)
  }
}

#[async_trait]
impl ResearchProvider for SerpClient {
  async fn organic_search(&self, query: &str) -> Result<CompetitiveAnalysis, ProviderError> {
    herald::verbose!(&format!("fetching organic results for '{query}'"));
    let response = self.fetch(query, false).await?;
    Ok(decode_competitive(response))
  }

  async fn news_search(&self, query: &str) -> Result<Vec<TrendingTopic>, ProviderError> {
    herald::verbose!(&format!("fetching news results for '{query}'"));
    let response = self.fetch(query, true).await?;
    Ok(decode_trending(response))
  }
}

// Wire structs. Every field defaults so a sparse response (no news box,
// no related searches) decodes to empty lists instead of failing.

#[derive(Debug, Default, Deserialize)]
struct SerpResponse {
  #[serde(default)]
  organic_results: Vec<SerpOrganicResult>,
  #[serde(default)]
  people_also_ask: Vec<SerpQuestion>,
  #[serde(default)]
  related_searches: Vec<SerpRelatedSearch>,
  #[serde(default)]
  news_results: Vec<SerpNewsResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SerpOrganicResult {
  #[serde(default)]
  title: String,
  #[serde(default)]
  snippet: String,
  #[serde(default)]
  link: String,
  #[serde(default)]
  position: u32,
}

#[derive(Debug, Default, Deserialize)]
struct SerpQuestion {
  #[serde(default)]
  question: String,
}

#[derive(Debug, Default, Deserialize)]
struct SerpRelatedSearch {
  #[serde(default)]
  query: String,
}

#[derive(Debug, Default, Deserialize)]
struct SerpNewsResult {
  #[serde(default)]
  title: String,
  #[serde(default)]
  source: String,
  #[serde(default)]
  date: String,
}

fn decode_competitive(response: SerpResponse) -> CompetitiveAnalysis {
  let top_competitors = response
    .organic_results
    .into_iter()
    .take(MAX_COMPETITORS)
    .map(|result| Competitor {
      title: result.title,
      snippet: result.snippet,
      link: result.link,
      position: result.position,
    })
    .collect();

  CompetitiveAnalysis {
    top_competitors,
    people_also_ask: response.people_also_ask.into_iter().map(|paa| paa.question).collect(),
    related_searches: response.related_searches.into_iter().map(|rs| rs.query).collect(),
  }
}

fn decode_trending(response: SerpResponse) -> Vec<TrendingTopic> {
  response
    .news_results
    .into_iter()
    .take(MAX_TRENDING)
    .map(|news| TrendingTopic { title: news.title, source: news.source, date: news.date })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_decode_competitive_from_fixture() {
    let fixture = r#"{
      "organic_results": [
        {"title": "Top 10 Email Tips", "snippet": "The best advice", "link": "https://x", "position": 1},
        {"title": "Second", "snippet": "", "link": "https://y", "position": 2}
      ],
      "people_also_ask": [
        {"question": "What is email marketing?"},
        {"question": "Is email marketing dead?"}
      ],
      "related_searches": [
        {"query": "email marketing tools"}
      ]
    }"#;

    let response: SerpResponse = serde_json::from_str(fixture).unwrap();
    let analysis = decode_competitive(response);

    assert_eq!(analysis.top_competitors.len(), 2);
    assert_eq!(analysis.top_competitors[0].title, "Top 10 Email Tips");
    assert_eq!(analysis.top_competitors[0].position, 1);
    assert_eq!(analysis.people_also_ask, vec![
      "What is email marketing?".to_string(),
      "Is email marketing dead?".to_string(),
    ]);
    assert_eq!(analysis.related_searches, vec!["email marketing tools".to_string()]);
  }

  #[test]
  fn test_decode_caps_competitors_at_five() {
    let results: Vec<String> = (1..=8)
      .map(|i| format!(r#"{{"title": "r{i}", "snippet": "", "link": "", "position": {i}}}"#))
      .collect();
    let fixture = format!(r#"{{"organic_results": [{}]}}"#, results.join(","));

    let response: SerpResponse = serde_json::from_str(&fixture).unwrap();
    let analysis = decode_competitive(response);

    assert_eq!(analysis.top_competitors.len(), 5);
    assert_eq!(analysis.top_competitors[4].position, 5);
  }

  #[test]
  fn test_decode_sparse_response_yields_empty_lists() {
    let response: SerpResponse = serde_json::from_str("{}").unwrap();
    let analysis = decode_competitive(response);

    assert!(analysis.top_competitors.is_empty());
    assert!(analysis.people_also_ask.is_empty());
    assert!(analysis.related_searches.is_empty());
  }

  #[test]
  fn test_decode_missing_fields_default() {
    let fixture = r#"{"organic_results": [{"title": "No link or position"}]}"#;

    let response: SerpResponse = serde_json::from_str(fixture).unwrap();
    let analysis = decode_competitive(response);

    assert_eq!(analysis.top_competitors[0].link, "");
    assert_eq!(analysis.top_competitors[0].position, 0);
  }

  #[test]
  fn test_decode_trending_from_fixture() {
    let fixture = r#"{
      "news_results": [
        {"title": "Email automation on the rise", "source": "Example News", "date": "2026-08-01"},
        {"title": "Another story", "source": "Daily", "date": "2026-08-02"}
      ]
    }"#;

    let response: SerpResponse = serde_json::from_str(fixture).unwrap();
    let trending = decode_trending(response);

    assert_eq!(trending.len(), 2);
    assert_eq!(trending[0].source, "Example News");
  }
}
