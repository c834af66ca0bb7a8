use crate::Position;
use std::fmt::{self, Debug, Display};

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

/// Error produced while parsing a TOML document.
///
/// Parsing stops at the first error, so a failed parse yields exactly one
/// [`Error`]. Its [`Display`] output is `"<line>:<column>: <message>"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The error kind
    pub kind: ErrorKind,
    /// Where the offending token starts.
    pub position: Position,
}

impl Error {
    /// Creates an error of `kind` at `position`.
    #[inline]
    pub fn new(kind: ErrorKind, position: Position) -> Self {
        Self { kind, position }
    }
}

impl std::error::Error for Error {}

impl From<(ErrorKind, Position)> for Error {
    fn from((kind, position): (ErrorKind, Position)) -> Self {
        Self { kind, position }
    }
}

/// The ways a document can fail to parse.
#[derive(Clone, PartialEq)]
pub enum ErrorKind {
    /// The token stream reported an error; carries the lexer's message.
    Lexical(String),

    /// A token that cannot start a statement was found.
    UnexpectedToken(&'static str),

    /// Wanted one sort of token, but found another.
    Wanted {
        /// Expected token type.
        expected: &'static str,
        /// Actually found token type.
        found: &'static str,
    },

    /// An `=` was found where a value was expected.
    MultipleEquals,

    /// The token stream ended before an array's closing `]`.
    UnterminatedArray,

    /// The token stream ended before an inline table's closing `}`.
    UnterminatedInlineTable,

    /// Two elements of an array or inline table without a comma between them.
    MissingComma,

    /// Two consecutive commas, or a comma directly after an opening bracket.
    EmptyField,

    /// An inline table starting with a comma.
    LeadingComma,

    /// An inline table ending with a comma.
    TrailingComma,

    /// A key token that cannot be split into path segments.
    InvalidKey(&'static str),

    /// A `_` digit separator that is not flanked by digits.
    InvalidUnderscore,

    /// A number failed to parse.
    InvalidNumber,

    /// A date-time failed to parse as RFC 3339.
    InvalidDatetime,

    /// Duplicate key in table.
    DuplicateKey {
        /// The full dotted path of the duplicate key
        key: String,
        /// Where the first definition is located
        first: Position,
    },

    /// A duplicate table definition was found.
    DuplicateTable {
        /// The name of the duplicate table
        name: String,
        /// Where the table was first defined
        first: Position,
    },

    /// A key path attempted to extend something that is not an open table.
    DottedKeyInvalidType {
        /// The path of the value that was in the way
        key: String,
        /// Where the value in the way was defined
        first: Position,
    },

    /// A table array header named a path that holds something else.
    RedefineAsArray {
        /// The full dotted path of the header
        key: String,
    },

    /// An array element of a different kind than the first element.
    MixedArray {
        /// Kind of the array's first element.
        expected: &'static str,
        /// Kind of the offending element.
        found: &'static str,
    },

    /// Arrays and inline tables were nested deeper than allowed.
    DepthLimitExceeded(u32),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Lexical(..) => "lexical",
            Self::UnexpectedToken(..) => "unexpected-token",
            Self::Wanted { .. } => "wanted",
            Self::MultipleEquals => "multiple-equals",
            Self::UnterminatedArray => "unterminated-array",
            Self::UnterminatedInlineTable => "unterminated-inline-table",
            Self::MissingComma => "missing-comma",
            Self::EmptyField => "empty-field",
            Self::LeadingComma => "leading-comma",
            Self::TrailingComma => "trailing-comma",
            Self::InvalidKey(..) => "invalid-key",
            Self::InvalidUnderscore => "invalid-underscore",
            Self::InvalidNumber => "invalid-number",
            Self::InvalidDatetime => "invalid-datetime",
            Self::DuplicateKey { .. } => "duplicate-key",
            Self::DuplicateTable { .. } => "duplicate-table",
            Self::DottedKeyInvalidType { .. } => "dotted-key-invalid-type",
            Self::RedefineAsArray { .. } => "redefine-as-array",
            Self::MixedArray { .. } => "mixed-array",
            Self::DepthLimitExceeded(..) => "depth-limit-exceeded",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.position)?;
        match &self.kind {
            ErrorKind::Lexical(message) => f.write_str(message),
            ErrorKind::UnexpectedToken(found) => write!(f, "unexpected token: {found}"),
            ErrorKind::Wanted { expected, found } => {
                write!(f, "was expecting {expected}, but got {found} instead")
            }
            ErrorKind::MultipleEquals => f.write_str("cannot have multiple equals for the same key"),
            ErrorKind::UnterminatedArray => f.write_str("unterminated array"),
            ErrorKind::UnterminatedInlineTable => f.write_str("unterminated inline table"),
            ErrorKind::MissingComma => f.write_str("missing comma"),
            ErrorKind::EmptyField => f.write_str("need field between two commas"),
            ErrorKind::LeadingComma => f.write_str("inline table cannot start with a comma"),
            ErrorKind::TrailingComma => f.write_str("trailing comma at the end of inline table"),
            ErrorKind::InvalidKey(reason) => write!(f, "invalid key: {reason}"),
            ErrorKind::InvalidUnderscore => f.write_str("invalid use of _ in number"),
            ErrorKind::InvalidNumber => f.write_str("invalid number"),
            ErrorKind::InvalidDatetime => f.write_str("invalid RFC 3339 date-time"),
            ErrorKind::DuplicateKey { key, first } => {
                write!(f, "the following key was defined twice: {key} (first defined at {first})")
            }
            ErrorKind::DuplicateTable { name, first } => {
                write!(f, "duplicated tables: {name} (first defined at {first})")
            }
            ErrorKind::DottedKeyInvalidType { key, first } => write!(
                f,
                "key {key} is already assigned and not of type table (defined at {first})"
            ),
            ErrorKind::RedefineAsArray { key } => {
                write!(f, "key {key} is already assigned and not of type table array")
            }
            ErrorKind::MixedArray { expected, found } => {
                write!(f, "mixed types in array: expected {expected}, found {found}")
            }
            ErrorKind::DepthLimitExceeded(max) => {
                write!(f, "arrays and inline tables nested deeper than {max} levels")
            }
        }
    }
}
