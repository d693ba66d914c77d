//! Derived post values: reading time, featured image, display dates

use chrono::{DateTime, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

use super::html::strip_html;
use crate::config::PipelineConfig;
use crate::content::Post;

lazy_static! {
    static ref IMG_TAG_RE: Regex =
        Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["']"#).unwrap();
}

/// Estimate reading time in whole minutes. Empty content reads in zero
/// minutes; anything else takes at least one.
pub fn reading_time(config: &PipelineConfig, content: &str) -> usize {
    if content.is_empty() {
        return 0;
    }

    let text = strip_html(content);
    let words = text.split_whitespace().count();
    let wpm = config.words_per_minute.max(1);

    words.div_ceil(wpm).max(1)
}

/// First image referenced in a body, as a local media path.
///
/// Prefers an absolute legacy uploads URL with an image extension; falls
/// back to the first `<img src>` attribute (converted if it points at the
/// legacy uploads directory).
pub fn first_image(config: &PipelineConfig, content: &str) -> Option<String> {
    if content.is_empty() {
        return None;
    }

    let uploads_re = Regex::new(&format!(
        r#"(?i)https?://{}/([^"'\s)]+\.(?:jpg|jpeg|png|webp|gif))"#,
        regex::escape(config.uploads_prefix().trim_end_matches('/'))
    ))
    .expect("uploads prefix is escaped, pattern is valid");

    if let Some(captures) = uploads_re.captures(content) {
        return Some(format!("{}{}", config.media_root, &captures[1]));
    }

    if let Some(captures) = IMG_TAG_RE.captures(content) {
        let src = &captures[1];
        return Some(super::url::convert_image_path(config, src));
    }

    None
}

/// Featured image for a post: the explicit field when set, otherwise the
/// first image found in the body.
pub fn featured_image(config: &PipelineConfig, post: &Post) -> Option<String> {
    if let Some(file) = &post.featured_image {
        return Some(format!("{}{}", config.media_root, file.trim_start_matches('/')));
    }

    first_image(config, &post.content)
}

/// Format an export timestamp for display as "Month D, YYYY". Unparseable
/// input comes back unchanged rather than erroring.
pub fn format_display_date(date: &str) -> String {
    DateTime::parse_from_rfc3339(date)
        .map(|d| d.format("%B %-d, %Y").to_string())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S")
                .map(|d| d.format("%B %-d, %Y").to_string())
        })
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostStatus;

    fn sample_post(content: &str, featured: Option<&str>) -> Post {
        Post {
            id: 1,
            author: 1,
            date: "2024-01-15T10:30:00".to_string(),
            title: "Sample".to_string(),
            slug: "sample".to_string(),
            excerpt: String::new(),
            content: content.to_string(),
            modified: String::new(),
            post_type: "post".to_string(),
            post_status: PostStatus::Publish,
            parent: 0,
            featured_image: featured.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_reading_time_empty() {
        let config = PipelineConfig::default();
        assert_eq!(reading_time(&config, ""), 0);
    }

    #[test]
    fn test_reading_time_short_floors_at_one() {
        let config = PipelineConfig::default();
        assert_eq!(reading_time(&config, "word"), 1);
        assert_eq!(reading_time(&config, "<p></p>"), 1);
    }

    #[test]
    fn test_reading_time_word_counts() {
        let config = PipelineConfig::default();
        let four_hundred = vec!["palabra"; 400].join(" ");
        assert_eq!(reading_time(&config, &four_hundred), 2);

        let two_hundred = vec!["palabra"; 200].join(" ");
        assert_eq!(reading_time(&config, &two_hundred), 1);

        let two_o_one = vec!["palabra"; 201].join(" ");
        assert_eq!(reading_time(&config, &two_o_one), 2);
    }

    #[test]
    fn test_first_image_uploads_url() {
        let config = PipelineConfig::default();
        let content = r#"<p>Look:</p>
            https://www.elmesondepepe.com/wp-content/uploads/2019/05/patio.jpg done"#;
        assert_eq!(
            first_image(&config, content).unwrap(),
            "/images/2019/05/patio.jpg"
        );
    }

    #[test]
    fn test_first_image_img_tag() {
        let config = PipelineConfig::default();
        let content = r#"<img src="/images/local/cafe.png" alt="">"#;
        assert_eq!(first_image(&config, content).unwrap(), "/images/local/cafe.png");
    }

    #[test]
    fn test_first_image_none() {
        let config = PipelineConfig::default();
        assert!(first_image(&config, "<p>No pictures here</p>").is_none());
        assert!(first_image(&config, "").is_none());
    }

    #[test]
    fn test_featured_image_explicit_field_wins() {
        let config = PipelineConfig::default();
        let post = sample_post(
            r#"<img src="/images/from-body.jpg">"#,
            Some("explicit.jpg"),
        );
        assert_eq!(featured_image(&config, &post).unwrap(), "/images/explicit.jpg");

        let post = sample_post(r#"<img src="/images/from-body.jpg">"#, None);
        assert_eq!(featured_image(&config, &post).unwrap(), "/images/from-body.jpg");
    }

    #[test]
    fn test_format_display_date() {
        assert_eq!(format_display_date("2024-01-15T10:30:00"), "January 15, 2024");
        assert_eq!(format_display_date("2019-05-05T00:00:00"), "May 5, 2019");
        assert_eq!(format_display_date("garbage"), "garbage");
    }
}
