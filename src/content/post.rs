//! Post model and the immutable collection it lives in

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Publication status from the WordPress export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostStatus {
    /// Visible on the site; the only status listing and matching consider
    Publish,
    /// Draft, private, trashed - anything else the export carries
    Other(String),
}

impl From<String> for PostStatus {
    fn from(s: String) -> Self {
        if s == "publish" {
            PostStatus::Publish
        } else {
            PostStatus::Other(s)
        }
    }
}

impl From<PostStatus> for String {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Publish => "publish".to_string(),
            PostStatus::Other(s) => s,
        }
    }
}

/// A blog post record from the exported dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// WordPress post ID
    pub id: u64,

    /// WordPress author ID (unused by the pipeline, kept from the export)
    #[serde(default)]
    pub author: u64,

    /// Publication timestamp as exported (e.g. "2019-05-14T16:20:00")
    pub date: String,

    /// Post title
    pub title: String,

    /// URL-safe unique key
    pub slug: String,

    /// Hand-written excerpt; may be empty in the export
    #[serde(default)]
    pub excerpt: String,

    /// Raw body markup, with shortcodes and absolute media URLs intact
    #[serde(default)]
    pub content: String,

    /// Last-modified timestamp as exported
    #[serde(default)]
    pub modified: String,

    /// WordPress post type ("post", "page", ...)
    #[serde(default)]
    pub post_type: String,

    /// Publication status
    #[serde(default = "default_status")]
    pub post_status: PostStatus,

    /// Parent post ID (unused by the pipeline)
    #[serde(default)]
    pub parent: u64,

    /// Explicit featured image file, relative to the media root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

fn default_status() -> PostStatus {
    PostStatus::Other(String::new())
}

impl Post {
    /// Whether the post is publicly visible
    pub fn is_published(&self) -> bool {
        self.post_status == PostStatus::Publish
    }

    /// Publication date parsed for ordering. Malformed timestamps sort as
    /// the epoch rather than erroring.
    pub fn parsed_date(&self) -> DateTime<FixedOffset> {
        parse_export_date(&self.date)
    }
}

/// Parse a timestamp as the WordPress JSON export writes them. The export
/// omits the offset, so try RFC 3339 first and fall back to a naive parse
/// treated as UTC.
pub fn parse_export_date(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .map(|naive| naive.and_utc().fixed_offset())
        })
        .unwrap_or_else(|_| DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset())
}

/// Immutable snapshot of the post dataset, loaded once per process
#[derive(Debug, Clone, Default)]
pub struct PostCollection {
    posts: Vec<Post>,
}

impl PostCollection {
    /// Wrap an already-loaded list of posts
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// All posts, in dataset order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Published posts only, in dataset order
    pub fn published(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| p.is_published())
    }

    /// Look up a post by slug, regardless of status. With duplicate slugs
    /// the first record wins.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
