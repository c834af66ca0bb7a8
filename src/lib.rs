//! A TOML parser that builds a position-annotated tree of typed values.
//!
//! Text is split into [`Token`]s by the [`Lexer`], the [`Parser`] state
//! machine checks the grammar, and the [`Builder`] assembles the tree while
//! enforcing the structural rules: unique keys, homogeneous arrays,
//! append-only table arrays and no redeclared tables. Every value remembers
//! the line and column where it was written.
//!
//! The parser accepts any token iterator, so a different tokenizer can be
//! plugged in with [`parse_tokens`].
//!
//! # Examples
//!
//! ```
//! use toml_tree::Error;
//!
//! let content = r#"
//! title = "example"
//!
//! [[things]]
//! name = "hammer"
//! value = 43
//!
//! [[things]]
//! name = "drill"
//! value = 300
//! color = "green"
//! "#;
//!
//! let root = toml_tree::parse(content)?;
//!
//! let things = root["things"].as_table_array().unwrap();
//! assert_eq!(things.len(), 2);
//! assert_eq!(things.get(0).unwrap()["name"].as_str(), Some("hammer"));
//! assert_eq!(root.get_path(&["things", "value"]).unwrap().as_integer(), Some(300));
//!
//! let err = toml_tree::parse("a = 1\na = 2").unwrap_err();
//! assert_eq!(err.to_string(), "2:1: the following key was defined twice: a (first defined at 1:1)");
//! # Ok::<(), Error>(())
//! ```

mod array;
mod builder;
mod error;
mod lexer;
mod parser;
mod position;
mod table;
mod time;
mod token;
mod value;

pub use array::{Array, TableArray};
pub use builder::Builder;
pub use error::{Error, ErrorKind};
pub use lexer::{Lexer, tokenize};
pub use parser::{Parser, split_key};
pub use position::Position;
pub use table::{Key, Table};
pub use time::Datetime;
pub use token::{Token, TokenKind};
pub use value::{Scalar, Value, ValueKind};

/// Default limit on how deeply arrays and inline tables may nest.
pub const MAX_RECURSION_DEPTH: u32 = 128;

/// Parser configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Maximum nesting of arrays and inline tables. Exceeding it fails with
    /// [`ErrorKind::DepthLimitExceeded`].
    pub max_depth: u32,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_depth: MAX_RECURSION_DEPTH,
        }
    }
}

/// Parses a TOML document with the default [`Options`].
pub fn parse(input: &str) -> Result<Table, Error> {
    parse_with(input, &Options::default())
}

/// Parses a TOML document.
pub fn parse_with(input: &str, options: &Options) -> Result<Table, Error> {
    parse_tokens_with(Lexer::new(input), options)
}

/// Parses an already tokenized document with the default [`Options`].
///
/// A stream that ends without a [`TokenKind::Eof`] token is treated as if
/// it had one.
pub fn parse_tokens<I>(tokens: I) -> Result<Table, Error>
where
    I: IntoIterator<Item = Token>,
{
    parse_tokens_with(tokens, &Options::default())
}

/// Parses an already tokenized document.
pub fn parse_tokens_with<I>(tokens: I, options: &Options) -> Result<Table, Error>
where
    I: IntoIterator<Item = Token>,
{
    Parser::new(tokens.into_iter(), options).parse()
}
