//! Shared blog utilities
//!
//! URL/route conversion, HTML text helpers, and the small derived-value
//! computations (reading time, featured image) the blog pages use.

mod html;
mod text;
pub mod url;

pub use html::{html_escape, strip_html};
pub use text::{featured_image, first_image, format_display_date, reading_time};
pub use url::{convert_image_path, is_post_url, to_route};
