//! Tolerant HTML fragment parsing
//!
//! Legacy post bodies are not well-formed XML, so the quick-xml reader runs
//! with end-name checking off and a forgiving tree builder on top: void
//! elements close themselves, stray end tags are ignored, and elements left
//! open at the end of input are closed implicitly. A reader error aborts the
//! parse; the converter handles that by degrading, never by propagating.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use super::node::{is_void_element, Element, Node};
use super::style::parse_style;

/// Markup the reader could not tokenize
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("markup tokenization failed at byte {position}: {source}")]
    Tokenize {
        position: u64,
        source: quick_xml::Error,
    },
}

/// Parse an HTML fragment into a list of top-level nodes.
///
/// Comments, processing instructions, and doctype declarations are dropped.
/// Text and CDATA become text nodes; unescaping falls back to the raw bytes
/// when an entity is not XML-valid (`&nbsp;` and friends).
pub fn parse_fragment(html: &str) -> Result<Vec<Node>, ParseError> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let element = element_from_tag(&e);
                if is_void_element(&element.tag) {
                    // <img ...> without a slash still never nests
                    push_node(&mut stack, &mut roots, Node::Element(element));
                } else {
                    stack.push(element);
                }
            }
            Ok(Event::Empty(e)) => {
                let element = element_from_tag(&e);
                push_node(&mut stack, &mut roots, Node::Element(element));
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
                close_element(&mut stack, &mut roots, &name);
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map(|cow| cow.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                if !text.is_empty() {
                    push_node(&mut stack, &mut roots, Node::Text(text));
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                push_node(&mut stack, &mut roots, Node::Text(text));
            }
            Ok(Event::Comment(_))
            | Ok(Event::Decl(_))
            | Ok(Event::PI(_))
            | Ok(Event::DocType(_)) => {}
            Ok(Event::Eof) => break,
            Err(source) => {
                return Err(ParseError::Tokenize {
                    position: reader.buffer_position(),
                    source,
                });
            }
        }
    }

    // Close whatever the input left open
    while let Some(element) = stack.pop() {
        push_node(&mut stack, &mut roots, Node::Element(element));
    }

    Ok(roots)
}

/// Build an element from a start tag, splitting the style attribute into
/// the parsed style map. Attributes that fail to decode are skipped.
fn element_from_tag(tag: &BytesStart<'_>) -> Element {
    let name = String::from_utf8_lossy(tag.name().as_ref()).to_lowercase();
    let mut element = Element::new(&name);

    for attr in tag.attributes().with_checks(false).flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
        let value = attr
            .unescape_value()
            .map(|cow| cow.into_owned())
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());

        if key == "style" {
            element.style = parse_style(&value);
        } else {
            element.attrs.insert(key, value);
        }
    }

    element
}

fn push_node(stack: &mut Vec<Element>, roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Pop the stack down to the nearest element with this tag name, attaching
/// everything closed along the way. A stray end tag with no matching open
/// element is ignored.
fn close_element(stack: &mut Vec<Element>, roots: &mut Vec<Node>, name: &str) {
    let Some(pos) = stack.iter().rposition(|el| el.tag == name) else {
        return;
    };
    while stack.len() > pos {
        let element = stack.pop().expect("stack has at least pos+1 elements");
        push_node(stack, roots, Node::Element(element));
    }
}
