//! Pipeline configuration (config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Main pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    // Legacy site
    /// Hostname of the legacy WordPress site (no scheme)
    pub legacy_host: String,
    /// Path fragment under which WordPress stores uploaded media
    pub uploads_path: String,

    // Local site
    /// Local path prefix that replaces the legacy uploads URL
    pub media_root: String,
    /// Route prefix for blog post pages
    pub blog_route: String,

    // Reading time
    pub words_per_minute: usize,

    // Related-post matching
    pub max_keywords: usize,
    pub min_keyword_len: usize,
    /// Words excluded from keyword extraction: English function words plus
    /// terms that appear in nearly every post on this site and would
    /// otherwise dominate the match score.
    #[serde(default)]
    pub stop_words: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            legacy_host: "www.elmesondepepe.com".to_string(),
            uploads_path: "wp-content/uploads".to_string(),

            media_root: "/images/".to_string(),
            blog_route: "/story/blog".to_string(),

            words_per_minute: 200,

            max_keywords: 10,
            min_keyword_len: 3,
            stop_words: default_stop_words(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Stop words as a lookup set
    pub fn stop_word_set(&self) -> HashSet<&str> {
        self.stop_words.iter().map(|s| s.as_str()).collect()
    }

    /// Full legacy uploads URL prefix, e.g.
    /// `www.elmesondepepe.com/wp-content/uploads/`
    pub fn uploads_prefix(&self) -> String {
        format!(
            "{}/{}/",
            self.legacy_host.trim_end_matches('/'),
            self.uploads_path.trim_matches('/')
        )
    }
}

fn default_stop_words() -> Vec<String> {
    [
        // English function words
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
        "did", "will", "would", "could", "should", "may", "might", "must", "can", "this", "that",
        "these", "those",
        // Site-generic terms
        "key", "west", "cuban", "cuba", "best", "guide", "ultimate", "complete",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
