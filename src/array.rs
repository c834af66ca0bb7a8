#[cfg(test)]
#[path = "./array_tests.rs"]
mod tests;

use crate::value::{Value, ValueKind};
use crate::{Position, Table};
use std::fmt;

/// A homogeneous TOML array.
///
/// All elements share one [`ValueKind`]; the parser rejects mixed arrays as
/// each element arrives.
#[derive(Clone, Default)]
pub struct Array {
    values: Vec<Value>,
    position: Position,
}

impl Array {
    /// Creates an empty array opened at `position`.
    #[inline]
    pub fn new(position: Position) -> Self {
        Self {
            values: Vec::new(),
            position,
        }
    }

    pub(crate) fn from_values(values: Vec<Value>, position: Position) -> Self {
        Self { values, position }
    }

    /// Appends a value. Does **not** check element kinds.
    #[inline]
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a reference to the element at the given index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the kind shared by all elements, or `None` if empty.
    pub fn element_kind(&self) -> Option<ValueKind> {
        self.values.first().map(Value::kind)
    }

    /// Returns an iterator over references to the elements.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Returns the contents as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Position of the opening `[`.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.values).finish()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// An append-only sequence of tables, written as repeated `[[name]]`
/// sections or as an array of inline tables.
#[derive(Clone, Default)]
pub struct TableArray {
    tables: Vec<Table>,
    position: Position,
}

impl TableArray {
    /// Creates an empty table array first declared at `position`.
    #[inline]
    pub fn new(position: Position) -> Self {
        Self {
            tables: Vec::new(),
            position,
        }
    }

    pub(crate) fn from_tables(tables: Vec<Table>, position: Position) -> Self {
        Self { tables, position }
    }

    /// Appends a table.
    #[inline]
    pub fn push(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Returns the number of tables.
    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if there are no tables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Returns a reference to the table at the given index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Table> {
        self.tables.get(index)
    }

    /// Returns the most recently appended table.
    #[inline]
    pub fn last(&self) -> Option<&Table> {
        self.tables.last()
    }

    #[inline]
    pub(crate) fn last_mut(&mut self) -> Option<&mut Table> {
        self.tables.last_mut()
    }

    /// Returns an iterator over the tables in declaration order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.tables.iter()
    }

    /// Returns the contents as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Table] {
        &self.tables
    }

    /// Position where the table array was first declared.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }
}

impl PartialEq for TableArray {
    fn eq(&self, other: &Self) -> bool {
        self.tables == other.tables
    }
}

impl fmt::Debug for TableArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.tables).finish()
    }
}

impl<'a> IntoIterator for &'a TableArray {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Array {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ser.collect_seq(&self.values)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TableArray {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ser.collect_seq(&self.tables)
    }
}
