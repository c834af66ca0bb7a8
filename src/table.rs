#[cfg(test)]
#[path = "./table_tests.rs"]
mod tests;

use crate::{Position, Value};
use std::fmt;

type TableEntry = (Key, Value);

/// Tables with at least this many entries use the hash index for lookups.
pub(crate) const INDEXED_TABLE_THRESHOLD: usize = 6;

/// A single key segment of a table, with the position where it was written.
#[derive(Clone)]
pub struct Key {
    /// The unquoted key text
    pub name: String,
    /// Where the key was written
    pub position: Position,
}

impl Key {
    /// Creates a key.
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }

    /// Returns the key text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Key {}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// How a table came into existence. Decides which later declarations may
/// extend it.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum TableState {
    /// Created as an intermediate of a header path, e.g. `a` in `[a.b]`.
    /// A later `[a]` header may still claim it.
    Implicit,
    /// Declared by its own `[header]` or as a `[[header]]` element.
    Header,
    /// Created by a dotted key assignment, e.g. `a` in `a.b = 1`.
    Dotted,
    /// An inline `{ ... }` table; sealed once closed.
    Inline,
}

/// A TOML table: an insertion-ordered map from key segments to values.
///
/// Small tables are scanned linearly; once a table reaches a handful of
/// entries its keys are also indexed in a hash map.
#[derive(Clone)]
pub struct Table {
    entries: Vec<TableEntry>,
    index: foldhash::HashMap<String, usize>,
    position: Position,
    state: TableState,
}

impl Table {
    /// Creates an empty table opened at `position`.
    pub fn new(position: Position) -> Self {
        Self::with_state(position, TableState::Implicit)
    }

    pub(crate) fn with_state(position: Position, state: TableState) -> Self {
        Self {
            entries: Vec::new(),
            index: foldhash::HashMap::default(),
            position,
            state,
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position where the table was opened: its header, the `{` of an
    /// inline table, or the key that implicitly created it.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub(crate) fn state(&self) -> TableState {
        self.state
    }

    #[inline]
    pub(crate) fn set_state(&mut self, state: TableState) {
        self.state = state;
    }

    #[inline]
    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn find_index(&self, name: &str) -> Option<usize> {
        if self.entries.len() >= INDEXED_TABLE_THRESHOLD {
            return self.index.get(name).copied();
        }
        self.entries.iter().position(|(key, _)| key.name == name)
    }

    /// Returns the entry at `idx`.
    #[inline]
    pub(crate) fn entry_at(&self, idx: usize) -> &TableEntry {
        &self.entries[idx]
    }

    #[inline]
    pub(crate) fn value_at_mut(&mut self, idx: usize) -> &mut Value {
        &mut self.entries[idx].1
    }

    /// Appends an entry. Does **not** check for duplicates; returns the
    /// index of the new entry.
    pub(crate) fn push_entry(&mut self, key: Key, value: Value) -> usize {
        self.entries.push((key, value));
        let len = self.entries.len();
        if len == INDEXED_TABLE_THRESHOLD {
            for (i, (key, _)) in self.entries.iter().enumerate() {
                self.index.insert(key.name.clone(), i);
            }
        } else if len > INDEXED_TABLE_THRESHOLD {
            self.index.insert(self.entries[len - 1].0.name.clone(), len - 1);
        }
        len - 1
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    /// A replaced entry keeps its place in the iteration order.
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        match self.find_index(&key.name) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.push_entry(key, value);
                None
            }
        }
    }

    /// Returns a reference to the value for `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.find_index(name).map(|idx| &self.entries[idx].1)
    }

    /// Returns a mutable reference to the value for `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.find_index(name).map(|idx| &mut self.entries[idx].1)
    }

    /// Returns both key and value for `name`.
    pub fn get_key_value(&self, name: &str) -> Option<(&Key, &Value)> {
        self.find_index(name).map(|idx| {
            let (k, v) = &self.entries[idx];
            (k, v)
        })
    }

    /// Returns `true` if the table contains the key.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.find_index(name).is_some()
    }

    /// Follows `path` from this table. Intermediate segments must name
    /// tables or table arrays; a table array resolves to its last table.
    ///
    /// ```
    /// let root = toml_tree::parse("[[a]]\nb.c = 1\n[[a]]\nb.c = 2")?;
    /// assert_eq!(root.get_path(&["a", "b", "c"]).and_then(|v| v.as_integer()), Some(2));
    /// # Ok::<(), toml_tree::Error>(())
    /// ```
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (last, intermediate) = path.split_last()?;
        let mut table = self;
        for segment in intermediate {
            table = match table.get(segment)? {
                Value::Table(t) => t,
                Value::TableArray(a) => a.last()?,
                _ => return None,
            };
        }
        table.get(last)
    }

    /// Returns a slice of all entries in insertion order.
    #[inline]
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.name.as_str(), v))
    }

    /// Iterates over the key names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.name.as_str())
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new(Position::START)
    }
}

/// Tables compare as unordered maps; positions and declaration state are
/// ignored.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(&k.name).is_some_and(|o| o == v))
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in &self.entries {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a (Key, Value);
    type IntoIter = std::slice::Iter<'a, TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Table {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl std::ops::Index<&str> for Table {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if the key is not present.
    #[inline]
    fn index(&self, index: &str) -> &Self::Output {
        match self.get(index) {
            Some(value) => value,
            None => panic!("key `{index}` not found in table"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Table {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = ser.serialize_map(Some(self.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(&k.name, v)?;
        }
        map.end()
    }
}
