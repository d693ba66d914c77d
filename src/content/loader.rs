//! Dataset loader - reads the exported post records from a JSON file

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::{Post, PostCollection};

/// Load the post dataset from a JSON export file.
///
/// Records that fail to deserialize are skipped with a warning so one
/// malformed entry cannot sink the whole dataset. Duplicate slugs are kept
/// (lookup returns the first) but reported.
pub fn load_posts<P: AsRef<Path>>(path: P) -> Result<PostCollection> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {:?}", path))?;

    let records: Vec<serde_json::Value> = serde_json::from_str(&content)
        .with_context(|| format!("dataset {:?} is not a JSON array", path))?;

    let mut posts = Vec::with_capacity(records.len());
    let mut seen_slugs = HashSet::new();

    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Post>(record) {
            Ok(post) => {
                if !seen_slugs.insert(post.slug.clone()) {
                    tracing::warn!("duplicate slug {:?} in dataset (record {})", post.slug, index);
                }
                posts.push(post);
            }
            Err(e) => {
                tracing::warn!("skipping malformed post record {}: {}", index, e);
            }
        }
    }

    tracing::debug!("loaded {} posts from {:?}", posts.len(), path);
    Ok(PostCollection::new(posts))
}
