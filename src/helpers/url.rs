//! URL and route helpers

use crate::config::PipelineConfig;
use crate::content::PostCollection;

/// Convert a legacy absolute URL to a site route.
///
/// Strips the scheme and legacy host, drops the trailing slash, and maps
/// paths that match a published post slug onto the blog route. Anything
/// else comes back as the bare path (the root normalizes to `/`).
///
/// # Examples
/// ```ignore
/// to_route(&config, &posts, "https://www.elmesondepepe.com/cuban-coffee/")
///     // -> "/story/blog/cuban-coffee"
/// to_route(&config, &posts, "https://www.elmesondepepe.com/menu")
///     // -> "/menu"
/// ```
pub fn to_route(config: &PipelineConfig, posts: &PostCollection, url: &str) -> String {
    let mut route = url;
    for scheme in ["https://", "http://"] {
        if let Some(rest) = route
            .strip_prefix(scheme)
            .and_then(|r| r.strip_prefix(config.legacy_host.as_str()))
        {
            route = rest;
            break;
        }
    }
    let route = route.trim_end_matches('/');

    if let Some(post) = posts
        .published()
        .find(|p| route == format!("/{}", p.slug))
    {
        return format!(
            "{}/{}",
            config.blog_route.trim_end_matches('/'),
            post.slug
        );
    }

    if route.is_empty() {
        "/".to_string()
    } else {
        route.to_string()
    }
}

/// Whether a URL resolves to a blog post page
pub fn is_post_url(config: &PipelineConfig, posts: &PostCollection, url: &str) -> bool {
    let route = to_route(config, posts, url);
    route.starts_with(&format!("{}/", config.blog_route.trim_end_matches('/')))
}

/// Convert a legacy uploads URL to the local media path. Local paths and
/// external URLs pass through unchanged.
pub fn convert_image_path(config: &PipelineConfig, src: &str) -> String {
    if src.is_empty() {
        return src.to_string();
    }

    for scheme in ["https://", "http://"] {
        let prefix = format!("{}{}", scheme, config.uploads_prefix());
        if let Some(rest) = src.strip_prefix(&prefix) {
            return format!("{}{}", config.media_root, rest);
        }
    }

    src.to_string()
}
