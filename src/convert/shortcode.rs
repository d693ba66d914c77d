//! Legacy shortcode and block-comment rewriting
//!
//! The WordPress export embeds block comments (`<!-- wp:... -->`) and
//! bracket shortcodes (`[row]...[/row]`) in post bodies. Both are rewritten
//! to plain markup before the body is parsed. The rules form an ordered
//! table so new shortcodes can be added without touching control flow.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;

lazy_static! {
    /// Ordered rewrite rules. Applied top to bottom; the final rule sweeps
    /// away any shortcode the table does not recognize.
    static ref REWRITE_RULES: Vec<(Regex, &'static str)> = vec![
        // Block comments around structural regions
        (Regex::new(r"<!-- wp:[^>]+ -->").unwrap(), ""),
        (Regex::new(r"<!-- /wp:[^>]+ -->").unwrap(), ""),
        // Quotes escaped by the JSON export
        (Regex::new(r#"\\""#).unwrap(), "\""),
        // Layout shortcodes
        (Regex::new(r"\[row[^\]]*\]").unwrap(), r#"<div class="wp-row">"#),
        (Regex::new(r"\[/row\]").unwrap(), "</div>"),
        (Regex::new(r"\[col[^\]]*\]").unwrap(), r#"<div class="wp-col">"#),
        (Regex::new(r"\[/col\]").unwrap(), "</div>"),
        // Buttons carrying a link target
        (
            Regex::new(r#"\[button[^\]]*link="([^"]+)"[^\]]*\]"#).unwrap(),
            r#"<a href="${1}" class="wp-button">"#,
        ),
        (Regex::new(r"\[/button\]").unwrap(), "</a>"),
        // Heading with subtitle/title attribute pair
        (
            Regex::new(r#"\[heading[^\]]*subtitle="([^"]+)"[^\]]*title="([^"]+)"[^\]]*\]"#)
                .unwrap(),
            r#"<h2><span class="subtitle">${1}</span>${2}</h2>"#,
        ),
        (Regex::new(r"\[hr[^\]]*\]").unwrap(), "<hr />"),
        // Third-party embeds are neutralized, never passed through
        (
            Regex::new(r"\[gravityforms[^\]]*\]").unwrap(),
            r#"<p class="wp-form-placeholder">Form removed</p>"#,
        ),
        (
            Regex::new(r"\[instagram-feed[^\]]*\]").unwrap(),
            r#"<p class="wp-instagram-placeholder">Instagram feed removed</p>"#,
        ),
        // Restaurant menu sections, optionally typed
        (
            Regex::new(r#"\[restaurantmenu[^\]]*type="([^"]+)"[^\]]*\]"#).unwrap(),
            r#"<div class="menu menu-${1}">"#,
        ),
        (Regex::new(r"\[restaurantmenu[^\]]*\]").unwrap(), r#"<div class="menu">"#),
        (Regex::new(r"\[/restaurantmenu\]").unwrap(), "</div>"),
        // Anything still in brackets is an unmapped shortcode; it vanishes
        (Regex::new(r"\[[^\]]+\]").unwrap(), ""),
    ];
}

/// Apply the rewrite table in order
pub fn rewrite_shortcodes(content: &str) -> String {
    let mut result = content.to_string();
    for (pattern, replacement) in REWRITE_RULES.iter() {
        result = pattern.replace_all(&result, *replacement).into_owned();
    }
    result
}

/// Regex matching an absolute legacy media URL, capturing the file path
/// segment under the uploads directory
pub fn media_url_regex(config: &PipelineConfig) -> Regex {
    Regex::new(&format!(
        r#"https?://{}/([^"'\s)]+)"#,
        regex::escape(config.uploads_prefix().trim_end_matches('/'))
    ))
    .expect("uploads prefix is escaped, pattern is valid")
}

/// Rewrite every absolute legacy media URL to a local media path
pub fn rewrite_media_urls(media_re: &Regex, media_root: &str, content: &str) -> String {
    media_re
        .replace_all(content, format!("{}${{1}}", media_root))
        .into_owned()
}
