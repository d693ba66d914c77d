//! wp-pipeline: content pipeline for a site migrated off WordPress
//!
//! Takes the JSON export of a legacy WordPress blog and provides the pieces
//! a static site needs at build time: conversion of raw post bodies into a
//! sanitized, link-rewritten, image-localized node tree; keyword-based
//! related-post matching with recency backfill; and the small derived
//! values (featured image, reading time, route conversion) the blog pages
//! display.
//!
//! Everything operates over an immutable, load-once post collection. No
//! operation here performs I/O after loading, and none of the content
//! functions return errors: malformed legacy markup degrades to a
//! displayable fallback instead.

pub mod config;
pub mod content;
pub mod convert;
pub mod helpers;
pub mod related;

use anyhow::Result;
use std::path::Path;

use config::PipelineConfig;
use content::{Post, PostCollection};
use convert::ContentConverter;

pub use convert::{Element, Node};

/// The loaded site: configuration plus the immutable post snapshot
#[derive(Debug, Clone)]
pub struct Site {
    /// Pipeline configuration
    pub config: PipelineConfig,
    /// Post dataset, loaded once
    pub posts: PostCollection,
}

impl Site {
    /// Assemble a site from already-loaded parts
    pub fn new(config: PipelineConfig, posts: PostCollection) -> Self {
        Self { config, posts }
    }

    /// Load the site from a dataset file, with an optional config file
    pub fn load<P: AsRef<Path>>(data_path: P, config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        let posts = content::load_posts(data_path)?;
        Ok(Self { config, posts })
    }

    /// Convert a raw legacy body into a renderable node tree
    pub fn convert(&self, raw: &str) -> Node {
        ContentConverter::new(&self.config, &self.posts).convert(raw)
    }

    /// Related published posts for a slug, best matches first
    pub fn related(&self, slug: &str, limit: usize) -> Vec<&Post> {
        related::find_related(&self.config, &self.posts, slug, limit)
    }

    /// Featured image path for a post, if one can be resolved
    pub fn featured_image(&self, post: &Post) -> Option<String> {
        helpers::featured_image(&self.config, post)
    }

    /// Estimated reading time of a body in minutes
    pub fn reading_time(&self, body: &str) -> usize {
        helpers::reading_time(&self.config, body)
    }

    /// Convert a legacy URL to a site route
    pub fn to_route(&self, url: &str) -> String {
        helpers::to_route(&self.config, &self.posts, url)
    }
}
