//! Related-post matching
//!
//! Keyword overlap scoring with a title bonus, backfilled by recency when
//! too few posts score. The stop-word list comes from configuration so the
//! site-generic vocabulary can be tuned without touching this module.

use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::content::{Post, PostCollection};
use crate::helpers::strip_html;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\b[a-z]{3,}\b").unwrap();
}

/// Extract the keyword set for a piece of text: markup stripped,
/// lowercased, alphabetic runs of three or more letters, stop words
/// removed, deduplicated in first-seen order, capped at
/// `config.max_keywords`.
pub fn extract_keywords(config: &PipelineConfig, text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let clean = strip_html(text).to_lowercase();
    let stop_words = config.stop_word_set();

    let mut keywords: IndexSet<String> = IndexSet::new();
    for word in WORD_RE.find_iter(&clean) {
        let word = word.as_str();
        if word.len() < config.min_keyword_len || stop_words.contains(word) {
            continue;
        }
        keywords.insert(word.to_string());
        if keywords.len() == config.max_keywords {
            break;
        }
    }

    keywords.into_iter().collect()
}

/// Score a candidate against the target's keywords. Body overlap counts
/// once; a keyword echoed in the candidate's title counts double on top,
/// with substring matching in both directions.
fn score(config: &PipelineConfig, target_keywords: &[String], candidate: &Post) -> usize {
    let text = format!("{} {} {}", candidate.title, candidate.excerpt, candidate.content);
    let keywords = extract_keywords(config, &text);

    let matches = target_keywords
        .iter()
        .filter(|kw| keywords.contains(*kw))
        .count();

    let title = candidate.title.to_lowercase();
    let title_words: Vec<&str> = title.split_whitespace().collect();
    let title_matches = target_keywords
        .iter()
        .filter(|kw| {
            title_words
                .iter()
                .any(|word| word.contains(kw.as_str()) || kw.contains(*word))
        })
        .count();

    matches + title_matches * 2
}

/// Find up to `limit` published posts related to the post with this slug.
///
/// A missing slug or an empty collection yields an empty list, never an
/// error. The target itself and unpublished posts are never returned.
/// Relevant matches come first (stable order for score ties, so equal
/// scores keep dataset order), then recency-ordered backfill.
pub fn find_related<'a>(
    config: &PipelineConfig,
    posts: &'a PostCollection,
    slug: &str,
    limit: usize,
) -> Vec<&'a Post> {
    let Some(target) = posts.find_by_slug(slug) else {
        return Vec::new();
    };

    let target_text = format!("{} {} {}", target.title, target.excerpt, target.content);
    let target_keywords = extract_keywords(config, &target_text);

    let mut scored: Vec<(&Post, usize)> = posts
        .published()
        .filter(|p| p.slug != slug)
        .filter_map(|p| {
            let s = score(config, &target_keywords, p);
            (s > 0).then_some((p, s))
        })
        .collect();

    // sort_by is stable: ties keep collection order
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let mut result: Vec<&Post> = scored.into_iter().take(limit).map(|(p, _)| p).collect();

    if result.len() < limit {
        let mut recent: Vec<&Post> = posts
            .published()
            .filter(|p| p.slug != slug && !result.iter().any(|r| r.slug == p.slug))
            .collect();
        recent.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));

        for post in recent {
            if result.len() == limit {
                break;
            }
            result.push(post);
        }
    }

    result
}
