//! Line/column source locations for diagnostics.

#[cfg(test)]
#[path = "./position_tests.rs"]
mod tests;

use std::fmt;

/// A 1-based `(line, column)` location within a TOML document.
///
/// Every [`Token`](crate::Token), [`Table`](crate::Table) and
/// [`Value`](crate::Value) carries the position where it starts. Columns
/// count characters, not bytes.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number, starting at 1.
    pub column: u32,
}

impl Position {
    /// The position of the first character of a document.
    pub const START: Position = Position { line: 1, column: 1 };

    /// Creates a new [`Position`].
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl From<(u32, u32)> for Position {
    fn from((line, column): (u32, u32)) -> Self {
        Self::new(line, column)
    }
}

impl From<Position> for (u32, u32) {
    fn from(p: Position) -> (u32, u32) {
        (p.line, p.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.line)?;
        tup.serialize_element(&self.column)?;
        tup.end()
    }
}
