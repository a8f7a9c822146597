//! Lists and dictionaries composed from their children's fingerprints.
//!
//! A compound value never re-serializes its children: its encoding length is the sum
//! of the children's lengths plus framing, and its digest hashes the children's
//! serialized fingerprints. Children may be [`Offloaded`], held only by fingerprint,
//! so re-fingerprinting after a local change touches only the loaded path.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::fingerprint::{DigestHasher, Fingerprint};
use crate::kind::ValueKind;
use crate::value::{
    binary_encoding_length, binary_fingerprint, inspect_binary, inspect_text,
    text_encoding_length, text_fingerprint, CanonicalValue, Value,
};

/// `l` / `d` marker plus `e` terminator.
const FRAMING_LENGTH: u64 = 2;

/// Resolves offloaded children by fingerprint.
pub trait Loader: Send + Sync {
    /// Returns the value with the given fingerprint, if known.
    fn load(&self, fingerprint: &Fingerprint) -> Option<Value>;
}

impl<F> Loader for F
where
    F: Fn(&Fingerprint) -> Option<Value> + Send + Sync,
{
    fn load(&self, fingerprint: &Fingerprint) -> Option<Value> {
        self(fingerprint)
    }
}

/// A child known only by its fingerprint.
#[derive(Clone)]
pub struct Offloaded {
    fingerprint: Fingerprint,
    loader: Option<Arc<dyn Loader>>,
}

impl Offloaded {
    /// Reference with no way to load the content.
    pub fn new(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            loader: None,
        }
    }

    /// Reference that can be materialized through `loader`.
    pub fn with_loader(fingerprint: Fingerprint, loader: Arc<dyn Loader>) -> Self {
        Self {
            fingerprint,
            loader: Some(loader),
        }
    }

    /// Fingerprint of the referenced value.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Loads the referenced value.
    ///
    /// Returns `None` without a loader, on a loader miss, or when the loaded value
    /// does not match the stored fingerprint.
    pub fn load(&self) -> Option<Value> {
        let loader = self.loader.as_ref()?;
        let Some(value) = loader.load(&self.fingerprint) else {
            tracing::debug!(fingerprint = %self.fingerprint, "loader miss");
            return None;
        };
        let actual = value.fingerprint();
        if actual != self.fingerprint {
            tracing::warn!(
                expected = %self.fingerprint,
                actual = %actual,
                "loaded value does not match its fingerprint"
            );
            return None;
        }
        Some(value)
    }
}

impl fmt::Debug for Offloaded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Offloaded")
            .field("fingerprint", &self.fingerprint)
            .field("loadable", &self.loader.is_some())
            .finish()
    }
}

/// Child of a list or dictionary.
#[derive(Debug, Clone)]
pub enum Node {
    /// Value held in memory.
    Loaded(Value),
    /// Value held by fingerprint only.
    Offloaded(Offloaded),
}

impl Node {
    /// The in-memory value, if loaded.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Node::Loaded(value) => Some(value),
            Node::Offloaded(_) => None,
        }
    }

    /// Loaded value, or the result of the offloaded reference's loader.
    pub fn resolve(&self) -> Option<Value> {
        match self {
            Node::Loaded(value) => Some(value.clone()),
            Node::Offloaded(offloaded) => offloaded.load(),
        }
    }

    /// Reference to this node by fingerprint, keeping any existing loader.
    pub fn offload(&self) -> Offloaded {
        match self {
            Node::Loaded(value) => Offloaded::new(value.fingerprint()),
            Node::Offloaded(offloaded) => offloaded.clone(),
        }
    }
}

impl CanonicalValue for Node {
    fn kind(&self) -> ValueKind {
        match self {
            Node::Loaded(value) => value.kind(),
            Node::Offloaded(offloaded) => offloaded.fingerprint.kind(),
        }
    }

    fn encoding_length(&self) -> u64 {
        match self {
            Node::Loaded(value) => value.encoding_length(),
            Node::Offloaded(offloaded) => offloaded.fingerprint.encoding_length(),
        }
    }

    fn fingerprint(&self) -> Fingerprint {
        match self {
            Node::Loaded(value) => value.fingerprint(),
            Node::Offloaded(offloaded) => offloaded.fingerprint,
        }
    }

    fn inspect(&self, load_all: bool) -> String {
        match self {
            Node::Loaded(value) => value.inspect(load_all),
            Node::Offloaded(offloaded) => match load_all.then(|| offloaded.load()).flatten() {
                Some(value) => value.inspect(true),
                None => format!("<{}>", offloaded.fingerprint),
            },
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}

impl Eq for Node {}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::Loaded(value)
    }
}

impl From<Offloaded> for Node {
    fn from(offloaded: Offloaded) -> Self {
        Node::Offloaded(offloaded)
    }
}

/// Ordered sequence of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    nodes: Vec<Node>,
}

impl List {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value.
    pub fn push(mut self, value: impl Into<Value>) -> Self {
        self.nodes.push(Node::Loaded(value.into()));
        self
    }

    /// Appends an offloaded reference.
    pub fn push_offloaded(mut self, offloaded: Offloaded) -> Self {
        self.nodes.push(Node::Offloaded(offloaded));
        self
    }

    /// Replaces the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(mut self, index: usize, node: impl Into<Node>) -> Self {
        self.nodes[index] = node.into();
        self
    }

    /// Replaces the element at `index`, or returns `None` if it is out of bounds.
    pub fn try_set(mut self, index: usize, node: impl Into<Node>) -> Option<Self> {
        let slot = self.nodes.get_mut(index)?;
        *slot = node.into();
        Some(self)
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

impl CanonicalValue for List {
    fn kind(&self) -> ValueKind {
        ValueKind::List
    }

    fn encoding_length(&self) -> u64 {
        FRAMING_LENGTH + self.nodes.iter().map(Node::encoding_length).sum::<u64>()
    }

    fn fingerprint(&self) -> Fingerprint {
        let mut hasher = DigestHasher::new();
        hasher.update_count(self.nodes.len());
        for node in &self.nodes {
            hasher.update_fingerprint(&node.fingerprint());
        }
        hasher.finish(ValueKind::List, self.encoding_length())
    }

    fn inspect(&self, load_all: bool) -> String {
        let items: Vec<String> = self.nodes.iter().map(|n| n.inspect(load_all)).collect();
        format!("[{}]", items.join(", "))
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().map(Node::Loaded).collect(),
        }
    }
}

impl FromIterator<Node> for List {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

/// Dictionary key: binary keys sort before text keys, each group byte-wise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Byte-string key.
    Binary(Vec<u8>),
    /// Text key, ordered by its UTF-8 bytes.
    Text(String),
}

impl CanonicalValue for Key {
    fn kind(&self) -> ValueKind {
        match self {
            Key::Binary(_) => ValueKind::Binary,
            Key::Text(_) => ValueKind::Text,
        }
    }

    fn encoding_length(&self) -> u64 {
        match self {
            Key::Binary(bytes) => binary_encoding_length(bytes),
            Key::Text(text) => text_encoding_length(text),
        }
    }

    fn fingerprint(&self) -> Fingerprint {
        match self {
            Key::Binary(bytes) => binary_fingerprint(bytes),
            Key::Text(text) => text_fingerprint(text),
        }
    }

    fn inspect(&self, _load_all: bool) -> String {
        match self {
            Key::Binary(bytes) => inspect_binary(bytes),
            Key::Text(text) => inspect_text(text),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

impl From<Vec<u8>> for Key {
    fn from(value: Vec<u8>) -> Self {
        Key::Binary(value)
    }
}

impl From<&[u8]> for Key {
    fn from(value: &[u8]) -> Self {
        Key::Binary(value.to_vec())
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Binary(bytes) => Value::Binary(bytes),
            Key::Text(text) => Value::Text(text),
        }
    }
}

/// Key-ordered mapping; iteration and fingerprint ignore insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: BTreeMap<Key, Node>,
}

impl Dictionary {
    /// Empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value under `key`.
    pub fn insert(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), Node::Loaded(value.into()));
        self
    }

    /// Inserts or replaces `key` with an offloaded reference.
    pub fn insert_offloaded(mut self, key: impl Into<Key>, offloaded: Offloaded) -> Self {
        self.entries.insert(key.into(), Node::Offloaded(offloaded));
        self
    }

    /// Drops `key` if present.
    pub fn remove(mut self, key: &Key) -> Self {
        self.entries.remove(key);
        self
    }

    /// Child stored under `key`.
    pub fn get(&self, key: &Key) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in canonical key order.
    pub fn iter(&self) -> btree_map::Iter<'_, Key, Node> {
        self.entries.iter()
    }
}

impl CanonicalValue for Dictionary {
    fn kind(&self) -> ValueKind {
        ValueKind::Dictionary
    }

    fn encoding_length(&self) -> u64 {
        FRAMING_LENGTH
            + self
                .entries
                .iter()
                .map(|(key, node)| key.encoding_length() + node.encoding_length())
                .sum::<u64>()
    }

    fn fingerprint(&self) -> Fingerprint {
        let mut hasher = DigestHasher::new();
        hasher.update_count(self.entries.len());
        for (key, node) in &self.entries {
            hasher.update_fingerprint(&key.fingerprint());
            hasher.update_fingerprint(&node.fingerprint());
        }
        hasher.finish(ValueKind::Dictionary, self.encoding_length())
    }

    fn inspect(&self, load_all: bool) -> String {
        let entries: Vec<String> = self
            .entries
            .iter()
            .map(|(key, node)| format!("{}: {}", key.inspect(load_all), node.inspect(load_all)))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = (&'a Key, &'a Node);
    type IntoIter = btree_map::Iter<'a, Key, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Dictionary
where
    K: Into<Key>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), Node::Loaded(value.into())))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integer::Integer;

    fn sample_list() -> List {
        List::new().push(1).push("two").push(Value::Null)
    }

    #[test]
    fn list_length_is_framing_plus_children() {
        assert_eq!(List::new().encoding_length(), 2);
        // i1e u3:two n
        assert_eq!(sample_list().encoding_length(), 2 + 3 + 6 + 1);
    }

    #[test]
    fn dictionary_length_counts_keys_and_values() {
        let dictionary = Dictionary::new().insert("a", 10).insert(b"k".to_vec(), true);
        // 1:k t u1:a i10e
        assert_eq!(dictionary.encoding_length(), 2 + 3 + 1 + 4 + 4);
    }

    #[test]
    fn dictionary_keys_order_binary_before_text() {
        let dictionary = Dictionary::new()
            .insert("b", 1)
            .insert("a", 2)
            .insert(b"z".to_vec(), 3)
            .insert(b"a".to_vec(), 4);
        let keys: Vec<&Key> = dictionary.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                &Key::Binary(b"a".to_vec()),
                &Key::Binary(b"z".to_vec()),
                &Key::Text("a".into()),
                &Key::Text("b".into()),
            ]
        );
    }

    #[test]
    fn fingerprint_ignores_insertion_order() {
        let forward = Dictionary::new().insert("x", 1).insert("y", 2);
        let backward = Dictionary::new().insert("y", 2).insert("x", 1);
        assert_eq!(forward.fingerprint(), backward.fingerprint());
        assert_eq!(forward, backward);
    }

    #[test]
    fn offloading_a_child_keeps_the_fingerprint() {
        let list = sample_list();
        let offloaded = list.get(1).unwrap().offload();
        let replaced = list.clone().set(1, offloaded);
        assert_eq!(list.fingerprint(), replaced.fingerprint());
        assert_eq!(list.encoding_length(), replaced.encoding_length());
        assert_eq!(list, replaced);
    }

    #[test]
    fn try_set_checks_bounds() {
        let list = sample_list();
        assert!(list.clone().try_set(3, Value::Null).is_none());

        let replaced = list.clone().try_set(2, Value::from(false)).unwrap();
        assert_eq!(replaced.len(), 3);
        assert_eq!(replaced.get(2).and_then(Node::value), Some(&Value::from(false)));
        assert_ne!(replaced.fingerprint(), list.fingerprint());
    }

    #[test]
    fn changing_a_child_changes_the_fingerprint() {
        let list = sample_list();
        let changed = list.clone().set(0, Value::from(2));
        assert_ne!(list.fingerprint(), changed.fingerprint());
        assert_ne!(list, changed);

        let nested = List::new().push(list.clone());
        let nested_changed = List::new().push(changed);
        assert_ne!(nested.fingerprint(), nested_changed.fingerprint());
    }

    #[test]
    fn element_count_is_part_of_the_digest() {
        let one = List::new().push(List::new());
        let two = List::new().push(List::new()).push(List::new());
        assert_ne!(one.fingerprint(), two.fingerprint());
        assert_eq!(one.fingerprint().digest().len(), 20);
    }

    #[test]
    fn inspect_renders_offloaded_children_on_demand() {
        let child = Value::from(Integer::from(7));
        let stored = child.clone();
        let loader: Arc<dyn Loader> = Arc::new(move |fp: &Fingerprint| {
            (*fp == stored.fingerprint()).then(|| stored.clone())
        });
        let list = List::new()
            .push("a")
            .push_offloaded(Offloaded::with_loader(child.fingerprint(), loader));

        assert_eq!(list.inspect(false), format!("[\"a\", <{}>]", child.fingerprint()));
        assert_eq!(list.inspect(true), "[\"a\", 7]");
        assert_eq!(list.get(1).and_then(Node::resolve), Some(child));
        assert_eq!(list.get(0).and_then(Node::value), Some(&Value::from("a")));
    }

    #[test]
    fn inspect_falls_back_when_loading_fails() {
        let child = Value::from(7);
        let list = List::new().push_offloaded(Offloaded::new(child.fingerprint()));
        assert_eq!(list.inspect(true), format!("[<{}>]", child.fingerprint()));

        let wrong: Arc<dyn Loader> = Arc::new(|_: &Fingerprint| Some(Value::from(8)));
        let offloaded = Offloaded::with_loader(child.fingerprint(), wrong);
        assert!(offloaded.load().is_none());
    }

    #[test]
    fn dictionary_inspect_uses_key_order() {
        let dictionary: Dictionary = [("b", Value::from(2)), ("a", Value::binary(vec![1]))]
            .into_iter()
            .collect();
        assert_eq!(
            Value::Dictionary(dictionary).to_string(),
            r#"{"a": b"\x01", "b": 2}"#
        );
    }
}
