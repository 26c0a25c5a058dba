//! Canonical serialization of conf nodes.
//!
//! The output is the conf file format itself: parsing it again yields a tree
//! equal to the one that was serialized.

use crate::lexer::ESCAPES;
use crate::value::{Map, Node};

/// Layout options for serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Style {
    /// Text repeated once per nesting level before each map entry.
    pub indent: String,
    /// Write radix prefixes and hexadecimal digits in upper case.
    pub uppercase_digits: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            uppercase_digits: false,
        }
    }
}

/// Encode a node in the given style.
pub fn encode(node: &Node, style: &Style) -> String {
    encode_node(node, 0, style)
}

impl Node {
    /// Canonical text of this node at nesting depth `depth`.
    pub fn serialize(&self, depth: usize) -> String {
        encode_node(self, depth, &Style::default())
    }
}

impl Map {
    /// Canonical text of this map at depth 0; a document for root maps.
    pub fn serialize(&self) -> String {
        encode_map(self, 0, &Style::default())
    }

    pub fn encode(&self, style: &Style) -> String {
        encode_map(self, 0, style)
    }
}

/// Encode the outermost node. A root map here is a whole document.
fn encode_node(node: &Node, depth: usize, style: &Style) -> String {
    match node {
        Node::Map(map) => encode_map(map, depth, style),
        other => encode_value(other, depth, style),
    }
}

/// Encode a node inside an entry or array, where maps always take braces.
fn encode_value(node: &Node, depth: usize, style: &Style) -> String {
    match node {
        Node::String(s) => encode_string(s),
        Node::Integer(n) => n.system.format(n.value, style.uppercase_digits),
        Node::Float(f) => encode_float(*f),
        Node::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| encode_value(v, depth, style)).collect();
            format!("[{}]", items.join(", "))
        }
        Node::Map(map) => encode_braced(map, depth, style),
    }
}

fn encode_map(map: &Map, depth: usize, style: &Style) -> String {
    if map.is_root() {
        encode_entries(map, depth, style)
    } else {
        encode_braced(map, depth, style)
    }
}

fn encode_braced(map: &Map, depth: usize, style: &Style) -> String {
    if map.is_empty() {
        return "{}".to_string();
    }
    format!(
        "{{\n{}{}}}",
        encode_entries(map, depth + 1, style),
        style.indent.repeat(depth)
    )
}

fn encode_entries(map: &Map, depth: usize, style: &Style) -> String {
    let pad = style.indent.repeat(depth);
    map.iter()
        .map(|(name, value)| format!("{}{}={};\n", pad, name, encode_value(value, depth, style)))
        .collect()
}

fn encode_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        }
    } else {
        let s = format!("{}", f);
        if s.contains(['.', 'e']) {
            s
        } else {
            format!("{}.0", s)
        }
    }
}

fn encode_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        let named = ESCAPES
            .iter()
            .find(|&&(letter, decoded)| decoded == c && letter != '/');
        match named {
            Some(&(letter, _)) => {
                result.push('\\');
                result.push(letter);
            }
            None if c.is_ascii_control() => {
                result.push_str(&format!("\\x{:02x}", c as u32));
            }
            None => result.push(c),
        }
    }
    result.push('"');
    result
}
