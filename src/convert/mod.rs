//! Legacy content conversion
//!
//! Turns a raw WordPress body string into a render-ready node tree:
//! shortcodes and block comments rewritten, media URLs localized, and
//! per-element transforms applied (lazy images, internal link routing,
//! styling classes). Conversion never fails - an untokenizable body
//! degrades to the preprocessed string in a plain container.

mod node;
mod parser;
mod shortcode;
mod style;

pub use node::{Element, Node};
pub use parser::ParseError;
pub use style::parse_style;

use regex::Regex;

use crate::config::PipelineConfig;
use crate::content::PostCollection;
use crate::helpers::url::{convert_image_path, is_post_url, to_route};

/// Closed set of element kinds the converter treats specially
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Image,
    Anchor,
    Heading(u8),
    Paragraph,
    List,
    ListItem,
    Strong,
    Emphasis,
    Other,
}

fn classify(tag: &str) -> NodeKind {
    match tag {
        "img" => NodeKind::Image,
        "a" => NodeKind::Anchor,
        "h1" => NodeKind::Heading(1),
        "h2" => NodeKind::Heading(2),
        "h3" => NodeKind::Heading(3),
        "h4" => NodeKind::Heading(4),
        "h5" => NodeKind::Heading(5),
        "h6" => NodeKind::Heading(6),
        "p" => NodeKind::Paragraph,
        "ul" | "ol" => NodeKind::List,
        "li" => NodeKind::ListItem,
        "strong" | "b" => NodeKind::Strong,
        "em" | "i" => NodeKind::Emphasis,
        _ => NodeKind::Other,
    }
}

// Styling classes appended per element kind
const HEADING_CLASSES: &str = "font-bold text-primary mt-8 mb-4";
const PARAGRAPH_CLASSES: &str = "mb-4 leading-relaxed";
const LIST_CLASSES: &str = "mb-4 ml-6 space-y-2";
const LIST_ITEM_CLASSES: &str = "leading-relaxed";
const STRONG_CLASSES: &str = "font-semibold";
const EMPHASIS_CLASSES: &str = "italic";
const IMAGE_WRAPPER_CLASSES: &str = "my-6 relative w-full rounded-lg overflow-hidden shadow-lg";
const IMAGE_SIZES: &str = "(max-width: 768px) 100vw, 700px";

/// Converts legacy post bodies against a loaded post collection
pub struct ContentConverter<'a> {
    config: &'a PipelineConfig,
    posts: &'a PostCollection,
    media_re: Regex,
}

impl<'a> ContentConverter<'a> {
    /// Create a converter over the given collection. The collection is only
    /// consulted for internal-link slug matching.
    pub fn new(config: &'a PipelineConfig, posts: &'a PostCollection) -> Self {
        let media_re = shortcode::media_url_regex(config);
        Self {
            config,
            posts,
            media_re,
        }
    }

    /// Convert a raw body into a renderable fragment. Never errors: a body
    /// the tokenizer cannot handle is returned as preprocessed raw markup
    /// in a minimal container, with a logged diagnostic.
    pub fn convert(&self, raw: &str) -> Node {
        let mut fragment = Element::new("div");
        fragment.append_class("prose-content");

        if raw.is_empty() {
            return Node::Element(fragment);
        }

        let processed = shortcode::rewrite_shortcodes(raw);
        let processed =
            shortcode::rewrite_media_urls(&self.media_re, &self.config.media_root, &processed);

        match parser::parse_fragment(&processed) {
            Ok(children) => {
                for child in children {
                    fragment.children.push(self.transform(child));
                }
                Node::Element(fragment)
            }
            Err(e) => {
                tracing::warn!("content did not parse, passing through raw: {}", e);
                Node::Element(Element::new("div").child(Node::RawHtml(processed)))
            }
        }
    }

    fn transform(&self, node: Node) -> Node {
        let Node::Element(element) = node else {
            // Text passes through verbatim; comments never reach here
            return node;
        };

        match classify(&element.tag) {
            NodeKind::Image => self.transform_image(element),
            NodeKind::Anchor => self.transform_anchor(element),
            NodeKind::Heading(_) => self.transform_styled(element, HEADING_CLASSES),
            NodeKind::Paragraph => self.transform_styled(element, PARAGRAPH_CLASSES),
            NodeKind::List => self.transform_styled(element, LIST_CLASSES),
            NodeKind::ListItem => self.transform_styled(element, LIST_ITEM_CLASSES),
            NodeKind::Strong => self.transform_styled(element, STRONG_CLASSES),
            NodeKind::Emphasis => self.transform_styled(element, EMPHASIS_CLASSES),
            NodeKind::Other => Node::Element(self.transform_children(element)),
        }
    }

    /// Recurse into children, leaving the element itself untouched
    fn transform_children(&self, mut element: Element) -> Element {
        let children = std::mem::take(&mut element.children);
        element.children = children.into_iter().map(|child| self.transform(child)).collect();
        element
    }

    /// Append styling classes and recurse
    fn transform_styled(&self, element: Element, classes: &str) -> Node {
        let mut element = self.transform_children(element);
        element.append_class(classes);
        Node::Element(element)
    }

    /// Images: external URLs stay plain lazy `<img>` tags; local media gets
    /// an aspect-ratio wrapper around a lazily loaded cover image.
    fn transform_image(&self, element: Element) -> Node {
        // Strip stray quotes the export sometimes leaves around src values
        let src = element
            .attrs
            .get("src")
            .map(|s| s.trim_matches(|c| c == '"' || c == '\'').to_string())
            .unwrap_or_default();

        let alt = element.attrs.get("alt").cloned().unwrap_or_default();
        let class = element.attrs.get("class").cloned().unwrap_or_default();
        let width = parse_dimension(element.attrs.get("width"), 800);
        let height = parse_dimension(element.attrs.get("height"), 600);

        let src = convert_image_path(self.config, &src);

        if src.starts_with("http://") || src.starts_with("https://") {
            let mut img = Element::new("img")
                .attr("src", &src)
                .attr("alt", &alt)
                .attr("width", &width.to_string())
                .attr("height", &height.to_string());
            if !class.is_empty() {
                img.append_class(&class);
            }
            img.attrs.insert("loading".to_string(), "lazy".to_string());
            return Node::Element(img);
        }

        // Invalid declared dimensions fall back to 16:9
        let aspect_ratio = if width > 0 && height > 0 {
            format!("{} / {}", width, height)
        } else {
            "16 / 9".to_string()
        };

        let mut img = Element::new("img").attr("src", &src).attr("alt", &alt);
        img.append_class(&format!("object-cover {}", class).trim().to_string());
        img.attrs.insert("sizes".to_string(), IMAGE_SIZES.to_string());
        img.attrs.insert("loading".to_string(), "lazy".to_string());

        let mut wrapper = Element::new("div");
        wrapper.append_class(IMAGE_WRAPPER_CLASSES);
        wrapper.style.insert("aspectRatio".to_string(), aspect_ratio);
        wrapper.children.push(Node::Element(img));
        Node::Element(wrapper)
    }

    /// Anchors: internal post links are rewritten to the blog route;
    /// external links keep (or gain) new-tab and no-opener attributes.
    fn transform_anchor(&self, element: Element) -> Node {
        let Some(href) = element.attrs.get("href").cloned() else {
            return Node::Element(self.transform_children(element));
        };

        let class = element.attrs.get("class").cloned().unwrap_or_default();
        let target = element.attrs.get("target").cloned();
        let rel = element.attrs.get("rel").cloned();

        let mut children: Vec<Node> = element
            .children
            .into_iter()
            .map(|child| self.transform(child))
            .collect();
        if children.is_empty() {
            // A link with nothing to show falls back to the raw href
            children.push(Node::Text(href.clone()));
        }

        let is_external = href.starts_with("http://") || href.starts_with("https://");
        let is_post = is_post_url(self.config, self.posts, &href);

        let mut anchor = if is_external && !is_post {
            Element::new("a")
                .attr("href", &href)
                .attr("target", target.as_deref().unwrap_or("_blank"))
                .attr("rel", rel.as_deref().unwrap_or("noopener noreferrer"))
        } else {
            let route = to_route(self.config, self.posts, &href);
            Element::new("a").attr("href", &route)
        };
        if !class.is_empty() {
            anchor.append_class(&class);
        }
        anchor.children = children;
        Node::Element(anchor)
    }
}

/// Missing dimensions take the default; a declared value that is not a
/// number is invalid (0), which the aspect-ratio check treats as such.
fn parse_dimension(value: Option<&String>, default: u32) -> u32 {
    match value {
        Some(v) => v.trim().parse::<u32>().unwrap_or(0),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Post, PostStatus};

    fn sample_post(slug: &str, title: &str) -> Post {
        Post {
            id: 1,
            author: 1,
            date: "2024-01-15T10:30:00".to_string(),
            title: title.to_string(),
            slug: slug.to_string(),
            excerpt: String::new(),
            content: String::new(),
            modified: "2024-01-15T10:30:00".to_string(),
            post_type: "post".to_string(),
            post_status: PostStatus::Publish,
            parent: 0,
            featured_image: None,
        }
    }

    fn setup() -> (PipelineConfig, PostCollection) {
        let config = PipelineConfig::default();
        let posts = PostCollection::new(vec![sample_post("cuban-coffee", "Cuban Coffee")]);
        (config, posts)
    }

    fn find_tag<'n>(node: &'n Node, tag: &str) -> Option<&'n Element> {
        match node {
            Node::Element(el) => {
                if el.tag == tag {
                    return Some(el);
                }
                el.children.iter().find_map(|c| find_tag(c, tag))
            }
            _ => None,
        }
    }

    #[test]
    fn test_convert_wraps_in_fragment() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        let node = converter.convert("<p>Hello</p>");
        let Node::Element(fragment) = &node else {
            panic!("expected element");
        };
        assert_eq!(fragment.class(), "prose-content");
        let p = find_tag(&node, "p").unwrap();
        assert_eq!(p.class(), PARAGRAPH_CLASSES);
    }

    #[test]
    fn test_empty_body() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        let Node::Element(fragment) = converter.convert("") else {
            panic!("expected element");
        };
        assert!(fragment.children.is_empty());
    }

    #[test]
    fn test_block_comments_never_survive() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        let html = converter
            .convert("<!-- wp:paragraph --><p>Text</p><!-- /wp:paragraph -->")
            .to_html();
        assert!(!html.contains("wp:"));
    }

    #[test]
    fn test_local_image_gets_wrapper() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        let node = converter.convert(
            r#"<img src="https://www.elmesondepepe.com/wp-content/uploads/2019/05/patio.jpg" width="1200" height="800">"#,
        );

        let wrapper = find_tag(&node, "div").unwrap();
        let inner = wrapper.children.iter().find_map(|c| find_tag(c, "img"));
        let img = find_tag(&node, "img").unwrap();
        assert_eq!(img.attrs.get("src").unwrap(), "/images/2019/05/patio.jpg");
        assert_eq!(img.attrs.get("loading").unwrap(), "lazy");
        assert!(inner.is_some());
    }

    #[test]
    fn test_image_aspect_ratio_defaults() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);

        let node = converter.convert(r#"<img src="/images/a.jpg" width="1200" height="800">"#);
        let wrapper = find_tag(&node, "div").unwrap();
        // The fragment itself is a div with no style; find the styled one
        let styled = if wrapper.style.is_empty() {
            wrapper
                .children
                .iter()
                .find_map(|c| match c {
                    Node::Element(el) if !el.style.is_empty() => Some(el),
                    _ => None,
                })
                .unwrap()
        } else {
            wrapper
        };
        assert_eq!(styled.style.get("aspectRatio").unwrap(), "1200 / 800");

        let node = converter.convert(r#"<img src="/images/a.jpg" width="zero" height="0">"#);
        let html = node.to_html();
        assert!(html.contains("16 / 9"), "got {}", html);
    }

    #[test]
    fn test_image_unparseable_dimension_never_mixes_with_default() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);

        // A junk width must not pair the 800 default with the declared
        // height; the whole ratio falls back
        let node = converter.convert(r#"<img src="/images/a.jpg" width="abc" height="500">"#);
        let html = node.to_html();
        assert!(html.contains("16 / 9"), "got {}", html);
        assert!(!html.contains("800 / 500"), "got {}", html);

        // Omitting both still takes the 800x600 default
        let node = converter.convert(r#"<img src="/images/a.jpg">"#);
        let html = node.to_html();
        assert!(html.contains("800 / 600"), "got {}", html);
    }

    #[test]
    fn test_external_image_plain() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        let node = converter.convert(r#"<img src="https://example.com/photo.jpg">"#);
        let img = find_tag(&node, "img").unwrap();
        assert_eq!(img.attrs.get("src").unwrap(), "https://example.com/photo.jpg");
        assert_eq!(img.attrs.get("loading").unwrap(), "lazy");
        // No aspect-ratio wrapper for external images
        assert!(!node.to_html().contains("aspect-ratio"));
    }

    #[test]
    fn test_internal_link_rewritten() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        let node = converter
            .convert(r#"<a href="https://www.elmesondepepe.com/cuban-coffee/">Read more</a>"#);
        let a = find_tag(&node, "a").unwrap();
        assert_eq!(a.attrs.get("href").unwrap(), "/story/blog/cuban-coffee");
        assert!(a.attrs.get("target").is_none());
    }

    #[test]
    fn test_external_link_defaults() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        let node = converter.convert(r#"<a href="https://example.com/">Visit</a>"#);
        let a = find_tag(&node, "a").unwrap();
        assert_eq!(a.attrs.get("target").unwrap(), "_blank");
        assert_eq!(a.attrs.get("rel").unwrap(), "noopener noreferrer");

        let node = converter
            .convert(r#"<a href="https://example.com/" target="_self" rel="nofollow">x</a>"#);
        let a = find_tag(&node, "a").unwrap();
        assert_eq!(a.attrs.get("target").unwrap(), "_self");
        assert_eq!(a.attrs.get("rel").unwrap(), "nofollow");
    }

    #[test]
    fn test_childless_link_shows_href() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        let node = converter.convert(r#"<a href="https://example.com/menu"></a>"#);
        let a = find_tag(&node, "a").unwrap();
        assert_eq!(a.children[0], Node::Text("https://example.com/menu".to_string()));
    }

    #[test]
    fn test_heading_levels_preserved() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        let node = converter.convert("<h3>Our Menu</h3>");
        let h3 = find_tag(&node, "h3").unwrap();
        assert!(h3.class().contains("font-bold"));
    }

    #[test]
    fn test_unknown_element_passthrough() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        let node = converter.convert("<blockquote><p>Quote</p></blockquote>");
        let bq = find_tag(&node, "blockquote").unwrap();
        assert_eq!(bq.class(), "");
        let p = find_tag(&node, "p").unwrap();
        assert!(p.class().contains("mb-4"));
    }

    #[test]
    fn test_plain_content_structure_preserved() {
        // No shortcodes, no images: only styling classes are added
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        let body = "<h2>Menu</h2><p>Try the <strong>ropa vieja</strong> with <em>tostones</em>.</p>";
        let node = converter.convert(body);

        for tag in ["h2", "p", "strong", "em"] {
            assert!(find_tag(&node, tag).is_some(), "missing {}", tag);
        }
        assert_eq!(
            node.text_content(),
            "MenuTry the ropa vieja with tostones."
        );
        assert_eq!(find_tag(&node, "strong").unwrap().class(), STRONG_CLASSES);
    }

    #[test]
    fn test_degrades_instead_of_failing() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        // A tag left open at end of input is not tokenizable markup
        let node = converter.convert(r#"some text <img src="x"#);
        match &node {
            Node::Element(el) => {
                assert!(matches!(el.children.first(), Some(Node::RawHtml(_))));
            }
            other => panic!("expected container, got {:?}", other),
        }
    }

    #[test]
    fn test_full_shortcode_body() {
        let (config, posts) = setup();
        let converter = ContentConverter::new(&config, &posts);
        let body = r#"[row][col][heading subtitle="Est. 1985" title="The Patio"][/col][/row][gravityforms id="1"]"#;
        let html = converter.convert(body).to_html();
        assert!(html.contains("wp-row"));
        assert!(html.contains("The Patio"));
        assert!(html.contains("Form removed"));
        assert!(!html.contains('['));
    }
}
