//! Token-driven parser.
//!
//! [`Parser`] runs a small state machine over a [`Token`] stream and reports
//! every structural event to a [`Builder`]. Grammar errors are detected here;
//! structural errors come back from the builder.

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;

use crate::{Builder, Datetime, Error, ErrorKind, Options, Position, Scalar, Table, Token, TokenKind, Value};
use std::iter::Peekable;

/// Top-level parser states.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum State {
    Start,
    GroupArray,
    Group,
    Assign,
}

/// Parses a token stream into a [`Table`].
pub struct Parser<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
    builder: Builder,
    max_depth: u32,
    /// Position of the last consumed token, used if the stream ends without
    /// an end-of-stream token.
    last_position: Position,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Creates a parser over `tokens`.
    pub fn new(tokens: I, options: &Options) -> Self {
        Parser {
            tokens: tokens.peekable(),
            builder: Builder::new(),
            max_depth: options.max_depth,
            last_position: Position::START,
        }
    }

    /// Consumes the whole token stream and returns the document.
    pub fn parse(mut self) -> Result<Table, Error> {
        let result = self.run();
        match result {
            Ok(()) => Ok(self.builder.finish()),
            Err(err) => {
                log::debug!("parse failed: {err}");
                Err(err)
            }
        }
    }

    fn run(&mut self) -> Result<(), Error> {
        let mut state = Some(State::Start);
        while let Some(current) = state {
            state = match current {
                State::Start => self.parse_start()?,
                State::GroupArray => self.parse_group_array()?,
                State::Group => self.parse_group()?,
                State::Assign => self.parse_assign()?,
            };
        }
        Ok(())
    }

    // -- token access ---------------------------------------------------------

    fn peek_kind(&mut self) -> TokenKind {
        self.tokens.peek().map_or(TokenKind::Eof, |token| token.kind)
    }

    /// Next token; an error token becomes a lexical error.
    fn next_token(&mut self) -> Result<Token, Error> {
        let token = match self.tokens.next() {
            Some(token) => token,
            None => Token::punct(TokenKind::Eof, self.last_position),
        };
        self.last_position = token.position;
        if token.kind == TokenKind::Error {
            return Err(Error::new(ErrorKind::Lexical(token.text), token.position));
        }
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        let token = self.next_token()?;
        if token.kind != kind {
            return Err(Error::new(
                ErrorKind::Wanted {
                    expected: kind.describe(),
                    found: token.kind.describe(),
                },
                token.position,
            ));
        }
        Ok(token)
    }

    // -- statements -----------------------------------------------------------

    fn parse_start(&mut self) -> Result<Option<State>, Error> {
        match self.peek_kind() {
            TokenKind::DoubleLeftBracket => Ok(Some(State::GroupArray)),
            TokenKind::LeftBracket => Ok(Some(State::Group)),
            TokenKind::Key => Ok(Some(State::Assign)),
            TokenKind::Eof => Ok(None),
            _ => {
                let token = self.next_token()?;
                Err(Error::new(
                    ErrorKind::UnexpectedToken(token.kind.describe()),
                    token.position,
                ))
            }
        }
    }

    fn parse_group_array(&mut self) -> Result<Option<State>, Error> {
        let open = self.expect(TokenKind::DoubleLeftBracket)?;
        let key = self.expect(TokenKind::TableArrayKey)?;
        let path = split_key(&key.text).map_err(|kind| Error::new(kind, key.position))?;
        self.builder.enter_group_array(&key.text, &path, open.position)?;
        self.expect(TokenKind::DoubleRightBracket)?;
        Ok(Some(State::Start))
    }

    fn parse_group(&mut self) -> Result<Option<State>, Error> {
        let open = self.expect(TokenKind::LeftBracket)?;
        let key = self.expect(TokenKind::TableKey)?;
        let path = split_key(&key.text).map_err(|kind| Error::new(kind, key.position))?;
        self.builder.enter_group(&key.text, &path, open.position)?;
        self.expect(TokenKind::RightBracket)?;
        Ok(Some(State::Start))
    }

    fn parse_assign(&mut self) -> Result<Option<State>, Error> {
        let key = self.expect(TokenKind::Key)?;
        self.parse_key_value(key, 0)?;
        Ok(Some(State::Start))
    }

    /// `key = value`, with the key token already consumed.
    fn parse_key_value(&mut self, key: Token, depth: u32) -> Result<(), Error> {
        let path = split_key(&key.text).map_err(|kind| Error::new(kind, key.position))?;
        self.expect(TokenKind::Equal)?;
        self.builder.enter_assign(&key.text, &path, key.position)?;
        self.parse_rvalue(depth)
    }

    // -- values ---------------------------------------------------------------

    fn parse_rvalue(&mut self, depth: u32) -> Result<(), Error> {
        let token = self.next_token()?;
        let position = token.position;
        let scalar = match token.kind {
            TokenKind::String => Scalar::String(token.text),
            TokenKind::True => Scalar::Boolean(true),
            TokenKind::False => Scalar::Boolean(false),
            TokenKind::Integer => {
                Scalar::Integer(parse_integer(&token.text).map_err(|kind| Error::new(kind, position))?)
            }
            TokenKind::Float => {
                Scalar::Float(parse_float(&token.text).map_err(|kind| Error::new(kind, position))?)
            }
            TokenKind::Inf => Scalar::Float(if token.text.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }),
            TokenKind::Nan => Scalar::Float(if token.text.starts_with('-') {
                -f64::NAN
            } else {
                f64::NAN
            }),
            TokenKind::Datetime => match Datetime::parse(&token.text) {
                Some(datetime) => Scalar::Datetime(datetime),
                None => return Err(Error::new(ErrorKind::InvalidDatetime, position)),
            },
            TokenKind::LeftBracket => return self.parse_array(position, depth),
            TokenKind::LeftBrace => return self.parse_inline_table(position, depth),
            TokenKind::Equal => return Err(Error::new(ErrorKind::MultipleEquals, position)),
            other => {
                return Err(Error::new(
                    ErrorKind::Wanted {
                        expected: "a value",
                        found: other.describe(),
                    },
                    position,
                ));
            }
        };
        self.builder.found_value(Value::Scalar(scalar, position), position)
    }

    fn check_depth(&self, depth: u32, position: Position) -> Result<(), Error> {
        if depth >= self.max_depth {
            return Err(Error::new(ErrorKind::DepthLimitExceeded(self.max_depth), position));
        }
        Ok(())
    }

    fn parse_array(&mut self, open: Position, depth: u32) -> Result<(), Error> {
        self.check_depth(depth, open)?;
        self.builder.enter_array(open);
        loop {
            match self.peek_kind() {
                TokenKind::RightBracket => {
                    let close = self.next_token()?;
                    return self.builder.exit_array(close.position);
                }
                TokenKind::Comma => {
                    let comma = self.next_token()?;
                    return Err(Error::new(ErrorKind::EmptyField, comma.position));
                }
                TokenKind::Eof => {
                    let eof = self.next_token()?;
                    return Err(Error::new(ErrorKind::UnterminatedArray, eof.position));
                }
                _ => self.parse_rvalue(depth + 1)?,
            }

            let token = self.next_token()?;
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::RightBracket => return self.builder.exit_array(token.position),
                TokenKind::Eof => return Err(Error::new(ErrorKind::UnterminatedArray, token.position)),
                _ => return Err(Error::new(ErrorKind::MissingComma, token.position)),
            }
        }
    }

    fn parse_inline_table(&mut self, open: Position, depth: u32) -> Result<(), Error> {
        self.check_depth(depth, open)?;
        self.builder.enter_inline_table(open);

        match self.peek_kind() {
            TokenKind::RightBrace => {
                let close = self.next_token()?;
                return self.builder.exit_inline_table(close.position);
            }
            TokenKind::Comma => {
                let comma = self.next_token()?;
                return Err(Error::new(ErrorKind::LeadingComma, comma.position));
            }
            _ => {}
        }

        loop {
            let key = self.next_token()?;
            match key.kind {
                TokenKind::Key => self.parse_key_value(key, depth + 1)?,
                TokenKind::Eof => {
                    return Err(Error::new(ErrorKind::UnterminatedInlineTable, key.position));
                }
                other => {
                    return Err(Error::new(
                        ErrorKind::Wanted {
                            expected: TokenKind::Key.describe(),
                            found: other.describe(),
                        },
                        key.position,
                    ));
                }
            }

            let token = self.next_token()?;
            match token.kind {
                TokenKind::RightBrace => return self.builder.exit_inline_table(token.position),
                TokenKind::Comma => match self.peek_kind() {
                    TokenKind::RightBrace => {
                        return Err(Error::new(ErrorKind::TrailingComma, token.position));
                    }
                    TokenKind::Comma => {
                        let comma = self.next_token()?;
                        return Err(Error::new(ErrorKind::EmptyField, comma.position));
                    }
                    _ => {}
                },
                TokenKind::Eof => {
                    return Err(Error::new(ErrorKind::UnterminatedInlineTable, token.position));
                }
                _ => return Err(Error::new(ErrorKind::MissingComma, token.position)),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Splits a raw key token into its segments.
///
/// Bare segments, basic quoted segments (with escapes) and literal quoted
/// segments may be mixed, separated by dots with optional whitespace.
///
/// ```
/// use toml_tree::split_key;
///
/// assert_eq!(split_key(r#"a . "b.c" . 'd'"#).unwrap(), ["a", "b.c", "d"]);
/// assert!(split_key("a..b").is_err());
/// ```
pub fn split_key(raw: &str) -> Result<Vec<String>, ErrorKind> {
    let mut segments = Vec::new();
    let mut chars = raw.char_indices().peekable();

    loop {
        while chars.next_if(|&(_, c)| c == ' ' || c == '\t').is_some() {}
        let segment = match chars.next() {
            None => return Err(ErrorKind::InvalidKey("empty key segment")),
            Some((_, '.')) => return Err(ErrorKind::InvalidKey("empty key segment")),
            Some((_, '"')) => {
                let mut segment = String::new();
                loop {
                    match chars.next() {
                        None => return Err(ErrorKind::InvalidKey("unterminated quoted key")),
                        Some((_, '"')) => break,
                        Some((_, '\\')) => segment.push(key_escape(&mut chars)?),
                        Some((_, c)) if c.is_control() && c != '\t' => {
                            return Err(ErrorKind::InvalidKey("control character in quoted key"));
                        }
                        Some((_, c)) => segment.push(c),
                    }
                }
                segment
            }
            Some((_, '\'')) => {
                let mut segment = String::new();
                loop {
                    match chars.next() {
                        None => return Err(ErrorKind::InvalidKey("unterminated quoted key")),
                        Some((_, '\'')) => break,
                        Some((_, c)) if c.is_control() && c != '\t' => {
                            return Err(ErrorKind::InvalidKey("control character in quoted key"));
                        }
                        Some((_, c)) => segment.push(c),
                    }
                }
                segment
            }
            Some((start, c)) if is_bare_key_char(c) => {
                let mut end = start + c.len_utf8();
                while let Some((i, c)) = chars.next_if(|&(_, c)| is_bare_key_char(c)) {
                    end = i + c.len_utf8();
                }
                raw[start..end].to_owned()
            }
            Some(_) => return Err(ErrorKind::InvalidKey("invalid character in key")),
        };
        segments.push(segment);

        while chars.next_if(|&(_, c)| c == ' ' || c == '\t').is_some() {}
        match chars.next() {
            None => return Ok(segments),
            Some((_, '.')) => {}
            Some(_) => return Err(ErrorKind::InvalidKey("expected a period between key segments")),
        }
    }
}

fn is_bare_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn key_escape(chars: &mut Peekable<std::str::CharIndices<'_>>) -> Result<char, ErrorKind> {
    let invalid = ErrorKind::InvalidKey("invalid escape in quoted key");
    let ch = match chars.next() {
        Some((_, '"')) => '"',
        Some((_, '\\')) => '\\',
        Some((_, 'b')) => '\u{8}',
        Some((_, 'f')) => '\u{c}',
        Some((_, 'n')) => '\n',
        Some((_, 'r')) => '\r',
        Some((_, 't')) => '\t',
        Some((_, 'e')) => '\u{1b}',
        Some((_, 'u')) => return hex_escape(chars, 4).ok_or(invalid),
        Some((_, 'U')) => return hex_escape(chars, 8).ok_or(invalid),
        _ => return Err(invalid),
    };
    Ok(ch)
}

fn hex_escape(chars: &mut Peekable<std::str::CharIndices<'_>>, n: usize) -> Option<char> {
    let mut val = 0u32;
    for _ in 0..n {
        let (_, c) = chars.next()?;
        val = val * 16 + c.to_digit(16)?;
    }
    char::from_u32(val)
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Every `_` must sit between two digits of `radix`.
fn check_underscores(digits: &str, radix: u32) -> Result<(), ErrorKind> {
    let bytes = digits.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let flanked = i > 0
            && i + 1 < bytes.len()
            && (bytes[i - 1] as char).is_digit(radix)
            && (bytes[i + 1] as char).is_digit(radix);
        if !flanked {
            return Err(ErrorKind::InvalidUnderscore);
        }
    }
    Ok(())
}

/// Parses a decimal, hex (`0x`), octal (`0o`) or binary (`0b`) integer.
pub(crate) fn parse_integer(text: &str) -> Result<i64, ErrorKind> {
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let signed = unsigned.len() != text.len();

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        Some("0b") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };
    if radix != 10 && signed {
        return Err(ErrorKind::InvalidNumber);
    }

    check_underscores(digits, radix)?;
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_digit(radix)) {
        return Err(ErrorKind::InvalidNumber);
    }

    if radix != 10 {
        return i64::from_str_radix(&cleaned, radix).map_err(|_| ErrorKind::InvalidNumber);
    }
    if cleaned.len() > 1 && cleaned.starts_with('0') {
        return Err(ErrorKind::InvalidNumber);
    }
    let with_sign = if negative { format!("-{cleaned}") } else { cleaned };
    with_sign.parse::<i64>().map_err(|_| ErrorKind::InvalidNumber)
}

/// Parses a float with optional fraction and exponent.
pub(crate) fn parse_float(text: &str) -> Result<f64, ErrorKind> {
    check_underscores(text, 10)?;
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    if !is_float_literal(&cleaned) {
        return Err(ErrorKind::InvalidNumber);
    }
    cleaned.parse::<f64>().map_err(|_| ErrorKind::InvalidNumber)
}

/// `[+-] int [. digits] [(e|E) [+-] digits]` with no leading zeros.
fn is_float_literal(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    let (int, frac) = match mantissa.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (mantissa, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int) || (int.len() > 1 && int.starts_with('0')) {
        return false;
    }
    if frac.is_some_and(|frac| !all_digits(frac)) {
        return false;
    }
    match exponent {
        Some(exp) => all_digits(exp.strip_prefix(['+', '-']).unwrap_or(exp)),
        None => true,
    }
}
