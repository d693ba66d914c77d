//! Inline style attribute parsing

use indexmap::IndexMap;

/// Parse a `style` attribute value into an ordered property map with
/// camelCased keys. Declarations that do not split into a `property: value`
/// pair are skipped; the rest of the string still parses.
pub fn parse_style(style: &str) -> IndexMap<String, String> {
    let mut map = IndexMap::new();

    for decl in style.split(';') {
        let Some((key, value)) = decl.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        map.insert(kebab_to_camel(key), value.to_string());
    }

    map
}

fn kebab_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
