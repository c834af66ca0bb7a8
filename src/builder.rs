//! Structural tree building.
//!
//! The [`Builder`] owns the document being built and enforces the rules that
//! do not depend on the grammar: unique keys, homogeneous arrays, table
//! redeclaration and table array appends. The parser drives it one
//! structural event at a time.

#[cfg(test)]
#[path = "./builder_tests.rs"]
mod tests;

use crate::table::TableState;
use crate::value::ValueKind;
use crate::{Array, Error, ErrorKind, Key, Position, Table, TableArray, Value};

/// An assignment whose key has been seen but whose value has not.
#[derive(Debug)]
struct Pending {
    /// Dotted intermediates, relative to the assignment context
    path: Vec<String>,
    key: Key,
}

/// An open array or inline table.
#[derive(Debug)]
enum Frame {
    Array {
        values: Vec<Value>,
        kind: Option<ValueKind>,
        position: Position,
    },
    InlineTable {
        table: Table,
        pending: Option<Pending>,
    },
}

/// Incrementally builds a document tree from structural events.
///
/// ```
/// use toml_tree::{Builder, Position, Scalar, Value};
///
/// let pos = Position::START;
/// let mut builder = Builder::new();
/// builder.enter_group("server", &["server".into()], pos)?;
/// builder.enter_assign("port", &["port".into()], pos)?;
/// builder.found_value(Value::Scalar(Scalar::Integer(8080), pos), pos)?;
///
/// let root = builder.finish();
/// assert_eq!(root.get_path(&["server", "port"]).and_then(|v| v.as_integer()), Some(8080));
/// # Ok::<(), toml_tree::Error>(())
/// ```
#[derive(Debug)]
pub struct Builder {
    root: Table,
    /// Path of the table the last header selected; empty for the root
    current: Vec<String>,
    /// Pending document-level assignment
    pending: Option<Pending>,
    stack: Vec<Frame>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a builder holding an empty root table.
    pub fn new() -> Self {
        Builder {
            root: Table::with_state(Position::START, TableState::Header),
            current: Vec::new(),
            pending: None,
            stack: Vec::new(),
        }
    }

    /// Number of open arrays and inline tables.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Handles a `[table]` header: resolves or creates the tables named by
    /// `path` and makes the last one the current context.
    pub fn enter_group(&mut self, raw: &str, path: &[String], position: Position) -> Result<(), Error> {
        log::trace!("enter group [{raw}] at {position}");
        let Some((last, intermediate)) = path.split_last() else {
            return Err(Error::new(ErrorKind::InvalidKey("empty table name"), position));
        };
        let parent = walk_header(&mut self.root, intermediate, position)?;

        match parent.find_index(last) {
            None => {
                parent.push_entry(
                    Key::new(last.as_str(), position),
                    Value::Table(Table::with_state(position, TableState::Header)),
                );
            }
            Some(idx) => {
                let first_key = parent.entry_at(idx).0.position;
                match parent.value_at_mut(idx) {
                    Value::Table(table) => match table.state() {
                        TableState::Implicit => {
                            // Claimed by its own header at last
                            table.set_state(TableState::Header);
                            table.set_position(position);
                        }
                        TableState::Header => {
                            return Err(duplicate_table(raw, table.position(), position));
                        }
                        TableState::Dotted | TableState::Inline => {
                            return Err(duplicate_key(raw, first_key, position));
                        }
                    },
                    Value::TableArray(array) => {
                        return Err(duplicate_table(raw, array.position(), position));
                    }
                    _ => return Err(duplicate_key(raw, first_key, position)),
                }
            }
        }

        self.current = path.to_vec();
        Ok(())
    }

    /// Handles a `[[table]]` header: appends a fresh table to the table array
    /// named by `path`, creating the array on first use, and makes the new
    /// table the current context.
    pub fn enter_group_array(
        &mut self,
        raw: &str,
        path: &[String],
        position: Position,
    ) -> Result<(), Error> {
        log::trace!("enter group array [[{raw}]] at {position}");
        let Some((last, intermediate)) = path.split_last() else {
            return Err(Error::new(ErrorKind::InvalidKey("empty table name"), position));
        };
        let parent = walk_header(&mut self.root, intermediate, position)?;
        let element = Table::with_state(position, TableState::Header);

        match parent.find_index(last) {
            None => {
                let mut array = TableArray::new(position);
                array.push(element);
                parent.push_entry(Key::new(last.as_str(), position), Value::TableArray(array));
            }
            Some(idx) => match parent.value_at_mut(idx) {
                Value::TableArray(array) => array.push(element),
                _ => {
                    return Err(Error::new(
                        ErrorKind::RedefineAsArray { key: raw.to_owned() },
                        position,
                    ));
                }
            },
        }

        self.current = path.to_vec();
        Ok(())
    }

    /// Starts an assignment to `path` in the innermost open inline table, or
    /// in the current table. Dotted intermediates are resolved or created
    /// now; the leaf must not exist yet.
    pub fn enter_assign(&mut self, raw: &str, path: &[String], position: Position) -> Result<(), Error> {
        log::trace!("enter assign {raw} at {position}");
        let Some((last, intermediate)) = path.split_last() else {
            return Err(Error::new(ErrorKind::InvalidKey("empty key"), position));
        };

        let (base, slot) = match self.stack.last_mut() {
            Some(Frame::InlineTable { table, pending }) => (table, pending),
            Some(Frame::Array { .. }) => {
                return Err(Error::new(
                    ErrorKind::Wanted {
                        expected: "a value",
                        found: "a key",
                    },
                    position,
                ));
            }
            None => (
                resolve_current(&mut self.root, &self.current, position)?,
                &mut self.pending,
            ),
        };

        let target = walk_dotted(base, intermediate, position)?;
        if let Some(idx) = target.find_index(last) {
            return Err(duplicate_key(raw, target.entry_at(idx).0.position, position));
        }

        *slot = Some(Pending {
            path: intermediate.to_vec(),
            key: Key::new(last.as_str(), position),
        });
        Ok(())
    }

    /// Delivers a completed value: appended to the innermost open array, or
    /// used to complete the pending assignment.
    pub fn found_value(&mut self, value: Value, position: Position) -> Result<(), Error> {
        match self.stack.last_mut() {
            Some(Frame::Array { values, kind, .. }) => {
                let found = value.kind();
                let expected = *kind.get_or_insert(found);
                if expected != found {
                    return Err(Error::new(
                        ErrorKind::MixedArray {
                            expected: expected.as_str(),
                            found: found.as_str(),
                        },
                        position,
                    ));
                }
                values.push(value);
                Ok(())
            }
            Some(Frame::InlineTable { table, pending }) => {
                let pending = pending.take().ok_or_else(|| unexpected_value(position))?;
                complete(table, pending, value, position)
            }
            None => {
                let pending = self.pending.take().ok_or_else(|| unexpected_value(position))?;
                let base = resolve_current(&mut self.root, &self.current, position)?;
                complete(base, pending, value, position)
            }
        }
    }

    /// Opens an array at `position`.
    pub fn enter_array(&mut self, position: Position) {
        self.stack.push(Frame::Array {
            values: Vec::new(),
            kind: None,
            position,
        });
    }

    /// Closes the innermost array and delivers it to the enclosing context.
    /// A non-empty array of tables becomes a [`TableArray`].
    pub fn exit_array(&mut self, position: Position) -> Result<(), Error> {
        if !matches!(self.stack.last(), Some(Frame::Array { .. })) {
            return Err(Error::new(ErrorKind::UnexpectedToken("a right bracket"), position));
        }
        let Some(Frame::Array {
            values,
            kind,
            position: start,
        }) = self.stack.pop()
        else {
            return Err(Error::new(ErrorKind::UnexpectedToken("a right bracket"), position));
        };

        let value = if kind == Some(ValueKind::Table) {
            let tables = values
                .into_iter()
                .filter_map(|value| match value {
                    Value::Table(table) => Some(table),
                    _ => None,
                })
                .collect();
            Value::TableArray(TableArray::from_tables(tables, start))
        } else {
            Value::Array(Array::from_values(values, start))
        };
        self.found_value(value, start)
    }

    /// Opens an inline table at `position`.
    pub fn enter_inline_table(&mut self, position: Position) {
        self.stack.push(Frame::InlineTable {
            table: Table::with_state(position, TableState::Inline),
            pending: None,
        });
    }

    /// Closes the innermost inline table and delivers it to the enclosing
    /// context. The table is sealed from then on.
    pub fn exit_inline_table(&mut self, position: Position) -> Result<(), Error> {
        if !matches!(self.stack.last(), Some(Frame::InlineTable { pending: None, .. })) {
            return Err(Error::new(ErrorKind::UnexpectedToken("a right brace"), position));
        }
        let Some(Frame::InlineTable { table, .. }) = self.stack.pop() else {
            return Err(Error::new(ErrorKind::UnexpectedToken("a right brace"), position));
        };
        let start = table.position();
        self.found_value(Value::Table(table), start)
    }

    /// Returns the finished root table.
    pub fn finish(self) -> Table {
        log::debug!("document finished with {} top-level keys", self.root.len());
        self.root
    }
}

/// Descends from `root` through header intermediates, creating implicit
/// tables as needed. A table array resolves to its last element.
fn walk_header<'t>(
    root: &'t mut Table,
    intermediate: &[String],
    position: Position,
) -> Result<&'t mut Table, Error> {
    let mut table = root;
    for (depth, segment) in intermediate.iter().enumerate() {
        let idx = match table.find_index(segment) {
            Some(idx) => idx,
            None => table.push_entry(
                Key::new(segment.as_str(), position),
                Value::Table(Table::with_state(position, TableState::Implicit)),
            ),
        };
        let first = table.entry_at(idx).0.position;
        table = match table.value_at_mut(idx) {
            Value::Table(t) if t.state() != TableState::Inline => t,
            Value::TableArray(array) => match array.last_mut() {
                Some(t) if t.state() != TableState::Inline => t,
                _ => return Err(duplicate_key(&intermediate[..=depth].join("."), first, position)),
            },
            _ => return Err(duplicate_key(&intermediate[..=depth].join("."), first, position)),
        };
    }
    Ok(table)
}

/// Descends through the intermediates of a dotted key. Only implicit and
/// dotted tables may be extended this way.
fn walk_dotted<'t>(
    base: &'t mut Table,
    intermediate: &[String],
    position: Position,
) -> Result<&'t mut Table, Error> {
    let mut table = base;
    for (depth, segment) in intermediate.iter().enumerate() {
        let idx = match table.find_index(segment) {
            Some(idx) => idx,
            None => table.push_entry(
                Key::new(segment.as_str(), position),
                Value::Table(Table::with_state(position, TableState::Dotted)),
            ),
        };
        let first = table.entry_at(idx).0.position;
        table = match table.value_at_mut(idx) {
            Value::Table(t) if matches!(t.state(), TableState::Implicit | TableState::Dotted) => t,
            _ => {
                return Err(Error::new(
                    ErrorKind::DottedKeyInvalidType {
                        key: intermediate[..=depth].join("."),
                        first,
                    },
                    position,
                ));
            }
        };
    }
    Ok(table)
}

fn open_table_mut(value: &mut Value) -> Option<&mut Table> {
    match value {
        Value::Table(table) => Some(table),
        Value::TableArray(array) => array.last_mut(),
        _ => None,
    }
}

/// Follows a path recorded by an earlier successful header or assignment.
fn resolve<'t>(base: &'t mut Table, path: &[String]) -> Option<&'t mut Table> {
    path.iter()
        .try_fold(base, |table, segment| open_table_mut(table.get_mut(segment)?))
}

fn resolve_current<'t>(
    root: &'t mut Table,
    current: &[String],
    position: Position,
) -> Result<&'t mut Table, Error> {
    resolve(root, current).ok_or_else(|| {
        Error::new(
            ErrorKind::DottedKeyInvalidType {
                key: current.join("."),
                first: position,
            },
            position,
        )
    })
}

fn complete(base: &mut Table, pending: Pending, value: Value, position: Position) -> Result<(), Error> {
    let Some(target) = resolve(base, &pending.path) else {
        return Err(Error::new(
            ErrorKind::DottedKeyInvalidType {
                key: pending.path.join("."),
                first: pending.key.position,
            },
            position,
        ));
    };
    if let Some(idx) = target.find_index(&pending.key.name) {
        return Err(duplicate_key(
            &pending.key.name,
            target.entry_at(idx).0.position,
            pending.key.position,
        ));
    }
    target.push_entry(pending.key, value);
    Ok(())
}

fn duplicate_key(key: &str, first: Position, position: Position) -> Error {
    Error::new(
        ErrorKind::DuplicateKey {
            key: key.to_owned(),
            first,
        },
        position,
    )
}

fn duplicate_table(name: &str, first: Position, position: Position) -> Error {
    Error::new(
        ErrorKind::DuplicateTable {
            name: name.to_owned(),
            first,
        },
        position,
    )
}

fn unexpected_value(position: Position) -> Error {
    Error::new(ErrorKind::UnexpectedToken("a value"), position)
}
