//! Adaptation of cached research data to a new, similar topic.
//!
//! Everything here is pure, synchronous string work: given the cached
//! payload for "email marketing for ecommerce" and a new topic
//! "content marketing for ecommerce", rewrite the textual fields by
//! substituting one topic's main term for the other's. Structured
//! competitor data is never rewritten; it gains provenance fields
//! instead, because competitor titles and links are factual.

use chrono::Utc;
use serde::Serialize;

use crate::types::{Competitor, ResearchPayload, TrendingTopic};

// Tokens that never qualify as a topic's main term.
const STOP_WORDS: &[&str] =
  &["for", "in", "on", "with", "the", "a", "an", "and", "or", "but", "to", "of"];

/// Provenance for an adapted payload.
#[derive(Debug, Clone, Serialize)]
pub struct AdaptationInfo {
  /// The cached topic this data was derived from.
  pub based_on: String,
  /// The topic the data was rewritten for.
  pub adapted_for: String,
  pub similarity: f32,
  /// When the source record was cached (RFC 3339).
  pub cached_at: String,
  /// When this adaptation was produced (RFC 3339).
  pub adapted_at: String,
}

/// A competitor entry carried over verbatim, with provenance appended.
#[derive(Debug, Clone, Serialize)]
pub struct AdaptedCompetitor {
  #[serde(flatten)]
  pub competitor: Competitor,
  pub adapted_from: String,
  pub adaptation_note: String,
}

/// The adapted research payload. Always a new structure; the cached
/// source is never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct AdaptedPayload {
  pub adaptation: AdaptationInfo,
  pub top_competitors: Vec<AdaptedCompetitor>,
  pub people_also_ask: Vec<String>,
  pub related_searches: Vec<String>,
  pub trending_topics: Vec<TrendingTopic>,
}

/// Extract the substitution anchor from a topic: the first token that
/// survives lowercasing and stop-word filtering. A topic made entirely
/// of stop words falls back to the original string unchanged.
pub fn extract_main_term(topic: &str) -> String {
  topic
    .to_lowercase()
    .split_whitespace()
    .find(|word| !STOP_WORDS.contains(word))
    .map(str::to_string)
    .unwrap_or_else(|| topic.to_string())
}

/// Rewrite `payload` for `new_topic`.
///
/// Questions and related searches get a literal main-term substitution;
/// when the old term does not occur the original string is kept but
/// prefixed with a `[Similar to {old_term}]` marker so downstream
/// consumers never present unrelated cached text as topic-specific.
/// (The original system marked only questions; both lists follow the
/// same policy here.)
pub fn adapt(
  original_topic: &str,
  new_topic: &str,
  similarity: f32,
  cached_at: &str,
  payload: &ResearchPayload,
) -> AdaptedPayload {
  let old_term = extract_main_term(original_topic);
  let new_term = extract_main_term(new_topic);

  let top_competitors = payload
    .top_competitors
    .iter()
    .map(|competitor| AdaptedCompetitor {
      competitor: competitor.clone(),
      adapted_from: original_topic.to_string(),
      adaptation_note: format!("Structure from {old_term} analysis"),
    })
    .collect();

  let people_also_ask = payload
    .people_also_ask
    .iter()
    .map(|question| substitute_or_mark(question, &old_term, &new_term))
    .collect();

  let related_searches = payload
    .related_searches
    .iter()
    .map(|search| substitute_or_mark(search, &old_term, &new_term))
    .collect();

  AdaptedPayload {
    adaptation: AdaptationInfo {
      based_on: original_topic.to_string(),
      adapted_for: new_topic.to_string(),
      similarity,
      cached_at: cached_at.to_string(),
      adapted_at: Utc::now().to_rfc3339(),
    },
    top_competitors,
    people_also_ask,
    related_searches,
    trending_topics: payload.trending_topics.clone(),
  }
}

fn substitute_or_mark(text: &str, old_term: &str, new_term: &str) -> String {
  let rewritten = text.replace(old_term, new_term);
  if rewritten != text {
    rewritten
  } else {
    format!("[Similar to {old_term}] {text}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_payload() -> ResearchPayload {
    ResearchPayload {
      top_competitors: vec![Competitor {
        title: "Top 10 Email Tips".to_string(),
        snippet: "The best email advice".to_string(),
        link: "https://x".to_string(),
        position: 1,
      }],
      people_also_ask: vec![
        "What is email marketing for ecommerce?".to_string(),
        "How do I measure ROI?".to_string(),
      ],
      related_searches: vec!["email marketing tools".to_string(), "best CRM software".to_string()],
      trending_topics: vec![TrendingTopic {
        title: "Email automation on the rise".to_string(),
        source: "Example News".to_string(),
        date: "2026-08-01".to_string(),
      }],
    }
  }

  #[test]
  fn test_extract_main_term_skips_stop_words() {
    assert_eq!(extract_main_term("the best email marketing"), "best");
    assert_eq!(extract_main_term("email marketing for ecommerce"), "email");
  }

  #[test]
  fn test_extract_main_term_lowercases() {
    assert_eq!(extract_main_term("Email Marketing"), "email");
  }

  #[test]
  fn test_extract_main_term_all_stop_words_returns_topic() {
    assert_eq!(extract_main_term("of the and"), "of the and");
    assert_eq!(extract_main_term(""), "");
  }

  #[test]
  fn test_extract_main_term_idempotent_on_single_token() {
    let term = extract_main_term("ecommerce");
    assert_eq!(extract_main_term(&term), term);
  }

  #[test]
  fn test_question_with_term_is_rewritten_without_marker() {
    let adapted = adapt(
      "email marketing for ecommerce",
      "content marketing for ecommerce",
      0.85,
      "2026-08-01T00:00:00Z",
      &sample_payload(),
    );

    assert_eq!(adapted.people_also_ask[0], "What is content marketing for ecommerce?");
    assert!(!adapted.people_also_ask[0].starts_with("[Similar to"));
  }

  #[test]
  fn test_question_without_term_gets_marker() {
    let adapted = adapt(
      "email marketing for ecommerce",
      "content marketing for ecommerce",
      0.85,
      "2026-08-01T00:00:00Z",
      &sample_payload(),
    );

    assert_eq!(adapted.people_also_ask[1], "[Similar to email] How do I measure ROI?");
  }

  #[test]
  fn test_related_searches_follow_the_same_policy() {
    let adapted = adapt(
      "email marketing for ecommerce",
      "content marketing for ecommerce",
      0.85,
      "2026-08-01T00:00:00Z",
      &sample_payload(),
    );

    assert_eq!(adapted.related_searches[0], "content marketing tools");
    assert_eq!(adapted.related_searches[1], "[Similar to email] best CRM software");
  }

  #[test]
  fn test_competitors_keep_factual_fields_and_gain_provenance() {
    let payload = sample_payload();
    let adapted =
      adapt("email marketing", "content marketing", 0.9, "2026-08-01T00:00:00Z", &payload);

    let competitor = &adapted.top_competitors[0];
    assert_eq!(competitor.competitor, payload.top_competitors[0]);
    assert_eq!(competitor.adapted_from, "email marketing");
    assert_eq!(competitor.adaptation_note, "Structure from email analysis");
  }

  #[test]
  fn test_trending_topics_pass_through() {
    let payload = sample_payload();
    let adapted =
      adapt("email marketing", "content marketing", 0.9, "2026-08-01T00:00:00Z", &payload);

    assert_eq!(adapted.trending_topics, payload.trending_topics);
  }

  #[test]
  fn test_adaptation_does_not_mutate_the_source() {
    let payload = sample_payload();
    let before = payload.clone();

    let _ = adapt(
      "email marketing for ecommerce",
      "content marketing for ecommerce",
      0.85,
      "2026-08-01T00:00:00Z",
      &payload,
    );

    assert_eq!(payload, before);
  }

  #[test]
  fn test_provenance_fields_are_populated() {
    let adapted = adapt(
      "email marketing",
      "content marketing",
      0.85,
      "2026-08-01T00:00:00Z",
      &sample_payload(),
    );

    assert_eq!(adapted.adaptation.based_on, "email marketing");
    assert_eq!(adapted.adaptation.adapted_for, "content marketing");
    assert!((adapted.adaptation.similarity - 0.85).abs() < f32::EPSILON);
    assert_eq!(adapted.adaptation.cached_at, "2026-08-01T00:00:00Z");
    assert!(!adapted.adaptation.adapted_at.is_empty());
  }
}
