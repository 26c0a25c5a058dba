//! conf node representation.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::numeral::{NumeralSystem, DECIMAL};

/// A conf value.
#[derive(Clone)]
pub enum Node {
    /// Escape-decoded string.
    String(String),
    /// 64-bit integer tagged with the radix it was written in.
    Integer(Integer),
    /// 64-bit floating-point number, including infinities and NaN.
    Float(f64),
    /// Array of values of any kinds.
    Array(Vec<Node>),
    /// Named section.
    Map(Map),
}

/// An integer and the numeral system of its literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Integer {
    pub value: i64,
    pub system: &'static NumeralSystem,
}

impl Integer {
    pub fn new(value: i64, system: &'static NumeralSystem) -> Self {
        Self { value, system }
    }

    pub fn decimal(value: i64) -> Self {
        Self::new(value, &DECIMAL)
    }
}

impl Node {
    /// Name of the node's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::String(_) => "string",
            Node::Integer(_) => "integer",
            Node::Float(_) => "float",
            Node::Array(_) => "array",
            Node::Map(_) => "map",
        }
    }

    /// Returns a reference to the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value if this is an `Integer`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Node::Integer(n) => Some(n.value),
            _ => None,
        }
    }

    /// Returns the numeral system if this is an `Integer`.
    pub fn numeral_system(&self) -> Option<&'static NumeralSystem> {
        match self {
            Node::Integer(n) => Some(n.system),
            _ => None,
        }
    }

    /// Returns the float value if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Node::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns a reference to the array if this is an `Array`.
    pub fn as_array(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns a reference to the map if this is a `Map`.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `name` if this is a `Map`.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.as_map().and_then(|map| map.get(name))
    }
}

/// Deep structural equality. Integers must agree on value and numeral
/// system; NaN floats are equal to each other.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::String(a), Node::String(b)) => a == b,
            (Node::Integer(a), Node::Integer(b)) => a == b,
            (Node::Float(a), Node::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Node::Array(a), Node::Array(b)) => a == b,
            (Node::Map(a), Node::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::String(s) => write!(f, "{:?}", s),
            Node::Integer(n) => write!(f, "{}", n.system.format(n.value, false)),
            Node::Float(n) => {
                if n.is_nan() {
                    write!(f, "nan")
                } else if n.is_infinite() {
                    if *n > 0.0 {
                        write!(f, "inf")
                    } else {
                        write!(f, "-inf")
                    }
                } else {
                    write!(f, "{:?}", n)
                }
            }
            Node::Array(arr) => f.debug_list().entries(arr).finish(),
            Node::Map(map) => fmt::Debug::fmt(map, f),
        }
    }
}

impl From<Integer> for Node {
    fn from(n: Integer) -> Self {
        Node::Integer(n)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Integer(Integer::decimal(n))
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Node::Float(f)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<Vec<Node>> for Node {
    fn from(arr: Vec<Node>) -> Self {
        Node::Array(arr)
    }
}

impl From<Map> for Node {
    fn from(map: Map) -> Self {
        Node::Map(map)
    }
}

// ============================================================================
// Maps
// ============================================================================

/// True for characters allowed in entry names: `[A-Za-z0-9_-]`.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// Why [`Map::try_insert`] refused an entry.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum MapInsertError {
    #[error("duplicate name {0:?}")]
    Duplicate(String),

    #[error("invalid name {0:?}")]
    InvalidName(String),
}

/// An insertion-ordered scope of named nodes.
///
/// The document root is a map with the `root` flag set; it serializes
/// without enclosing braces.
#[derive(Clone, Default)]
pub struct Map {
    entries: IndexMap<String, Node>,
    root: bool,
}

impl Map {
    /// An empty nested map.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty document root.
    pub fn root() -> Self {
        Self {
            entries: IndexMap::new(),
            root: true,
        }
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    pub fn set_root(&mut self, root: bool) {
        self.root = root;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.entries.get_mut(name)
    }

    /// Add an entry at the end. Existing names and names outside
    /// `[A-Za-z0-9_-]+` are refused.
    pub fn try_insert(
        &mut self,
        name: impl Into<String>,
        node: Node,
    ) -> Result<(), MapInsertError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(MapInsertError::InvalidName(name));
        }
        if self.entries.contains_key(&name) {
            return Err(MapInsertError::Duplicate(name));
        }
        self.entries.insert(name, nested(node));
        Ok(())
    }

    /// Set an entry, replacing and returning any previous value in place.
    pub fn insert_or_replace(
        &mut self,
        name: impl Into<String>,
        node: Node,
    ) -> Result<Option<Node>, MapInsertError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(MapInsertError::InvalidName(name));
        }
        Ok(self.entries.insert(name, nested(node)))
    }

    /// Remove an entry, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.entries.shift_remove(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Entries compare in order.
/// Clear the root flag on every map inside `node`; only the document itself
/// is a root.
fn nested(mut node: Node) -> Node {
    fn demote(node: &mut Node) {
        match node {
            Node::Map(map) => {
                map.root = false;
                map.entries.values_mut().for_each(demote);
            }
            Node::Array(items) => items.iter_mut().for_each(demote),
            _ => {}
        }
    }
    demote(&mut node);
    node
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
            && self.entries.len() == other.entries.len()
            && self.entries.iter().zip(other.entries.iter()).all(|(a, b)| a == b)
    }
}

impl IntoIterator for Map {
    type Item = (String, Node);
    type IntoIter = indexmap::map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeral::HEXADECIMAL;

    #[test]
    fn test_integer_equality_needs_same_system() {
        let hex = Node::Integer(Integer::new(26, &HEXADECIMAL));
        let dec = Node::from(26);
        assert_ne!(hex, dec);
        assert_eq!(hex, Node::Integer(Integer::new(26, &HEXADECIMAL)));
    }

    #[test]
    fn test_nan_equals_nan() {
        assert_eq!(Node::Float(f64::NAN), Node::Float(f64::NAN));
        assert_eq!(Node::Float(0.0), Node::Float(-0.0));
        assert_ne!(Node::Float(1.0), Node::from(1));
    }

    #[test]
    fn test_kind_mismatch() {
        assert_ne!(Node::from("1"), Node::from(1));
        assert_ne!(Node::Array(vec![]), Node::Map(Map::new()));
    }

    #[test]
    fn test_map_rejects_duplicates() {
        let mut map = Map::new();
        map.try_insert("a", Node::from(1)).unwrap();
        assert_eq!(
            map.try_insert("a", Node::from(2)),
            Err(MapInsertError::Duplicate("a".to_string()))
        );
        assert_eq!(map.get("a"), Some(&Node::from(1)));
        assert_eq!(
            map.try_insert("a b", Node::from(2)),
            Err(MapInsertError::InvalidName("a b".to_string()))
        );
    }

    #[test]
    fn test_inserted_root_map_becomes_nested() {
        let mut inner = Map::root();
        inner.try_insert("k", Node::from(1)).unwrap();
        let mut root = Map::root();
        root.try_insert("m", Node::Map(inner.clone())).unwrap();
        root.insert_or_replace("list", Node::Array(vec![Node::Map(inner)]))
            .unwrap();

        assert!(root.is_root());
        assert!(!root.get("m").unwrap().as_map().unwrap().is_root());
        let list = root.get("list").unwrap().as_array().unwrap();
        assert!(!list[0].as_map().unwrap().is_root());
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let mut map = Map::new();
        for name in ["zeta", "alpha", "mid"] {
            map.try_insert(name, Node::from(name)).unwrap();
        }
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        map.remove("alpha");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "mid"]);
        let previous = map.insert_or_replace("zeta", Node::from(1)).unwrap();
        assert_eq!(previous, Some(Node::from("zeta")));
        assert_eq!(map.keys().next(), Some("zeta"));
    }

    #[test]
    fn test_map_equality_is_ordered_and_root_aware() {
        let mut a = Map::new();
        a.try_insert("x", Node::from(1)).unwrap();
        a.try_insert("y", Node::from(2)).unwrap();
        let mut b = Map::new();
        b.try_insert("y", Node::from(2)).unwrap();
        b.try_insert("x", Node::from(1)).unwrap();
        assert_ne!(a, b);

        let mut c = a.clone();
        assert_eq!(a, c);
        c.set_root(true);
        assert_ne!(a, c);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut inner = Map::new();
        inner.try_insert("k", Node::from("v")).unwrap();
        let original = Node::Array(vec![Node::Map(inner)]);
        let mut copy = original.clone();
        if let Some(Node::Map(map)) = copy.as_array_mut().and_then(|arr| arr.first_mut()) {
            map.insert_or_replace("k", Node::from("changed")).unwrap();
        }
        assert_eq!(original.as_array().unwrap()[0].get("k"), Some(&Node::from("v")));
        assert_ne!(original, copy);
    }

    #[test]
    fn test_debug_rendering() {
        let node = Node::Array(vec![
            Node::Integer(Integer::new(26, &HEXADECIMAL)),
            Node::Float(f64::NEG_INFINITY),
            Node::from("s"),
        ]);
        assert_eq!(format!("{:?}", node), "[0x1a, -inf, \"s\"]");
    }
}
