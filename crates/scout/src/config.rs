//! Environment-driven configuration.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Minimum cosine similarity for reusing a cached topic, matching the
/// production default of the original pipeline.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.82;

const CACHE_DIR_VAR: &str = "SCOUT_CACHE_DIR";
const THRESHOLD_VAR: &str = "SCOUT_SIMILARITY_THRESHOLD";
const SERP_API_KEY_VAR: &str = "SERP_API_KEY";

#[derive(Debug, Clone)]
pub struct Config {
  /// Where the LanceDB index lives.
  pub cache_dir: PathBuf,
  pub similarity_threshold: f32,
  /// Absent is fine for cache-only commands; provider calls fail
  /// without it.
  pub serp_api_key: Option<String>,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    Ok(Self {
      cache_dir: resolve_cache_dir()?,
      similarity_threshold: resolve_threshold(),
      serp_api_key: std::env::var(SERP_API_KEY_VAR).ok().filter(|key| !key.is_empty()),
    })
  }
}

fn resolve_cache_dir() -> Result<PathBuf> {
  if let Ok(dir) = std::env::var(CACHE_DIR_VAR) {
    if !dir.is_empty() {
      return Ok(PathBuf::from(dir));
    }
  }

  let home = dirs::home_dir().ok_or_else(|| anyhow!("failed to determine home directory"))?;
  Ok(home.join(".scout").join("cache"))
}

fn resolve_threshold() -> f32 {
  let Ok(raw) = std::env::var(THRESHOLD_VAR) else {
    return DEFAULT_SIMILARITY_THRESHOLD;
  };

  match raw.parse::<f32>() {
    Ok(value) if (0.0..=1.0).contains(&value) => value,
    _ => {
      herald::warn!(&format!(
        "ignoring invalid {THRESHOLD_VAR}='{raw}', using {DEFAULT_SIMILARITY_THRESHOLD}"
      ));
      DEFAULT_SIMILARITY_THRESHOLD
    }
  }
}
