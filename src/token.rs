//! The token stream consumed by the parser.

use crate::Position;
use std::fmt;

/// Kinds of tokens the parser understands.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum TokenKind {
    /// A key on the left of `=`, possibly dotted and quoted (`a."b c".d`)
    Key,
    /// The key between `[` and `]`
    TableKey,
    /// The key between `[[` and `]]`
    TableArrayKey,
    /// `=`
    Equal,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `[[`
    DoubleLeftBracket,
    /// `]]`
    DoubleRightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// A string literal; the text has escapes already decoded
    String,
    /// An integer literal, digit separators and radix prefix included
    Integer,
    /// A float literal, digit separators included
    Float,
    /// `true`
    True,
    /// `false`
    False,
    /// An RFC 3339 date-time literal
    Datetime,
    /// `inf`, `+inf` or `-inf`
    Inf,
    /// `nan`, `+nan` or `-nan`
    Nan,
    /// A lexical error; the text is the message
    Error,
    /// End of the token stream
    Eof,
}

impl TokenKind {
    /// Human readable description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Key => "a key",
            TokenKind::TableKey => "a table key",
            TokenKind::TableArrayKey => "a table array key",
            TokenKind::Equal => "an equals",
            TokenKind::LeftBracket => "a left bracket",
            TokenKind::RightBracket => "a right bracket",
            TokenKind::DoubleLeftBracket => "a double left bracket",
            TokenKind::DoubleRightBracket => "a double right bracket",
            TokenKind::LeftBrace => "a left brace",
            TokenKind::RightBrace => "a right brace",
            TokenKind::Comma => "a comma",
            TokenKind::String => "a string",
            TokenKind::Integer => "an integer",
            TokenKind::Float => "a float",
            TokenKind::True | TokenKind::False => "a boolean",
            TokenKind::Datetime => "a date-time",
            TokenKind::Inf => "inf",
            TokenKind::Nan => "nan",
            TokenKind::Error => "an error",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token: its kind, literal text and source position.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Creates a punctuation or end-of-stream token whose text is implied by
    /// its kind.
    pub fn punct(kind: TokenKind, position: Position) -> Self {
        let text = match kind {
            TokenKind::Equal => "=",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::DoubleLeftBracket => "[[",
            TokenKind::DoubleRightBracket => "]]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::True => "true",
            TokenKind::False => "false",
            _ => "",
        };
        Self::new(kind, text, position)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Error => f.write_str(&self.text),
            _ => write!(f, "{} `{}`", self.kind, self.text),
        }
    }
}
