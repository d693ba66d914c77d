//! Content module - the post dataset and its loader

pub mod loader;
mod post;

pub use loader::load_posts;
pub use post::{parse_export_date, Post, PostCollection, PostStatus};
