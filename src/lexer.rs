//! Turns TOML text into the [`Token`] stream consumed by the parser.
//!
//! The lexer is context sensitive: it knows whether it is looking at the
//! start of a statement, the key side of an assignment, or a value, because
//! the same characters (`[`, digits, `-`) mean different things in each.
//! Structural validation is left to the parser; the lexer only reports
//! malformed characters, strings and line structure.

#[cfg(test)]
#[path = "./lexer_tests.rs"]
mod tests;

use crate::{Position, Token, TokenKind};
use std::collections::VecDeque;

// Lightweight internal error. The message and offset have already been
// written into `Lexer::error` when this is returned.
#[derive(Copy, Clone)]
struct LexError;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Mode {
    /// Start of a statement, or a key inside an inline table.
    Key,
    /// After a key; only `=` may follow.
    Equals,
    /// Where a value, or array/inline-table punctuation, is expected.
    Value,
    /// After a value inside an array or inline table.
    AfterValue,
    /// After a top-level value or header; only a comment or newline may follow.
    LineEnd,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Nesting {
    Array,
    InlineTable,
}

/// An iterator of [`Token`]s over a TOML document.
///
/// The stream ends with a single [`TokenKind::Eof`] token, or with a single
/// [`TokenKind::Error`] token carrying a message if the input is malformed.
///
/// ```
/// use toml_tree::{Lexer, TokenKind};
///
/// let kinds: Vec<TokenKind> = Lexer::new("a = [1]").map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::Key,
///         TokenKind::Equal,
///         TokenKind::LeftBracket,
///         TokenKind::Integer,
///         TokenKind::RightBracket,
///         TokenKind::Eof,
///     ]
/// );
/// ```
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    cursor: usize,

    mode: Mode,
    nesting: Vec<Nesting>,
    queue: VecDeque<Token>,
    finished: bool,

    // Scratch buffer for decoded strings
    string_buf: String,

    // Line bookkeeping for `position_at`; offsets only move forward.
    origin: usize,
    line: u32,
    column: u32,
    scanned: usize,

    // Error context -- populated just before returning LexError
    error: Option<(usize, String)>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `input`. A leading byte order mark is skipped.
    pub fn new(input: &'a str) -> Self {
        let start = if input.starts_with('\u{feff}') { 3 } else { 0 };
        Lexer {
            input,
            bytes: input.as_bytes(),
            cursor: start,
            mode: Mode::Key,
            nesting: Vec::new(),
            queue: VecDeque::new(),
            finished: false,
            string_buf: String::new(),
            origin: start,
            line: 1,
            column: 1,
            scanned: start,
            error: None,
        }
    }

    // -- error helpers ------------------------------------------------------

    #[cold]
    fn set_error(&mut self, at: usize, message: impl Into<String>) -> LexError {
        self.error = Some((at, message.into()));
        LexError
    }

    #[cold]
    fn wanted(&mut self, expected: &str) -> LexError {
        let found = self.describe_next();
        let at = self.cursor;
        self.set_error(at, format!("expected {expected}, found {found}"))
    }

    /// Line and column of a byte offset.
    fn position_at(&mut self, offset: usize) -> Position {
        if offset < self.scanned {
            // Only reachable for errors reported behind the last token.
            self.line = 1;
            self.column = 1;
            self.scanned = self.origin;
        }
        for &b in &self.bytes[self.scanned..offset] {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else if b & 0xC0 != 0x80 {
                // Continuation bytes belong to the char already counted.
                self.column += 1;
            }
        }
        self.scanned = offset;
        Position::new(self.line, self.column)
    }

    fn emit(&mut self, kind: TokenKind, text: impl Into<String>, at: usize) {
        let position = self.position_at(at);
        self.queue.push_back(Token::new(kind, text, position));
    }

    fn emit_punct(&mut self, kind: TokenKind, at: usize) {
        let position = self.position_at(at);
        self.queue.push_back(Token::punct(kind, position));
    }

    fn emit_eof(&mut self) {
        let at = self.bytes.len();
        self.emit_punct(TokenKind::Eof, at);
        self.finished = true;
    }

    // -- cursor operations --------------------------------------------------

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    #[inline]
    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.cursor + offset).copied()
    }

    #[inline]
    fn advance(&mut self) {
        self.cursor += 1;
    }

    #[inline]
    fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek_byte() == Some(b) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Read the next character (with CRLF folding).
    fn next_char(&mut self) -> Option<char> {
        let i = self.cursor;
        let &b = self.bytes.get(i)?;
        if b == b'\r' && self.bytes.get(i + 1) == Some(&b'\n') {
            self.cursor = i + 2;
            return Some('\n');
        }
        let ch = self.input[i..].chars().next()?;
        self.cursor = i + ch.len_utf8();
        Some(ch)
    }

    fn eat_whitespace(&mut self) {
        while let Some(b' ' | b'\t') = self.peek_byte() {
            self.advance();
        }
    }

    fn eat_newline(&mut self) -> bool {
        match self.peek_byte() {
            Some(b'\n') => {
                self.advance();
                true
            }
            Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                self.cursor += 2;
                true
            }
            _ => false,
        }
    }

    /// Consumes a comment and the line break that ends it.
    fn eat_comment(&mut self) -> Result<bool, LexError> {
        if !self.eat_byte(b'#') {
            return Ok(false);
        }
        while let Some(0x09 | 0x20..=0x7E | 0x80..) = self.peek_byte() {
            self.advance();
        }
        if self.peek_byte().is_none() || self.eat_newline() {
            Ok(true)
        } else {
            let at = self.cursor;
            Err(self.set_error(at, "invalid character in comment"))
        }
    }

    /// Skips blank lines and comments.
    fn eat_intermediate(&mut self) -> Result<(), LexError> {
        loop {
            self.eat_whitespace();
            if self.eat_newline() {
                continue;
            }
            if !self.eat_comment()? {
                return Ok(());
            }
        }
    }

    fn describe_next(&self) -> &'static str {
        match self.peek_byte() {
            None => "end of input",
            Some(b'\n') => "a newline",
            Some(b'\r') => "a carriage return",
            Some(b' ' | b'\t') => "whitespace",
            Some(b'#') => "a comment",
            Some(b'=') => "an equals",
            Some(b'.') => "a period",
            Some(b',') => "a comma",
            Some(b'{') => "a left brace",
            Some(b'}') => "a right brace",
            Some(b'[') => "a left bracket",
            Some(b']') => "a right bracket",
            Some(b'\'' | b'"') => "a string",
            Some(b) if is_keylike_byte(b) => "an identifier",
            Some(_) => "a character",
        }
    }

    // -- dispatch -------------------------------------------------------------

    /// Lexes until at least one token has been queued.
    fn lex(&mut self) -> Result<(), LexError> {
        while self.queue.is_empty() {
            match self.mode {
                Mode::Key => self.lex_key_position()?,
                Mode::Equals => self.lex_equals()?,
                Mode::Value => self.lex_value()?,
                Mode::AfterValue => self.lex_after_value()?,
                Mode::LineEnd => self.lex_line_end()?,
            }
        }
        Ok(())
    }

    fn after_value(&mut self) {
        self.mode = if self.nesting.is_empty() {
            Mode::LineEnd
        } else {
            Mode::AfterValue
        };
    }

    /// A comma or a closing bracket should follow. Anything else is lexed
    /// as the next element would be, so the parser can report the missing
    /// comma.
    fn lex_after_value(&mut self) -> Result<(), LexError> {
        self.eat_intermediate()?;
        let in_inline = self.nesting.last() == Some(&Nesting::InlineTable);
        match self.peek_byte() {
            Some(b',') => {
                let start = self.cursor;
                self.advance();
                self.emit_punct(TokenKind::Comma, start);
                self.mode = if in_inline { Mode::Key } else { Mode::Value };
            }
            Some(b']' | b'}') | None => self.mode = Mode::Value,
            Some(_) if in_inline => self.mode = Mode::Key,
            Some(_) => self.mode = Mode::Value,
        }
        Ok(())
    }

    fn lex_line_end(&mut self) -> Result<(), LexError> {
        self.eat_whitespace();
        if self.eat_comment()? || self.eat_newline() {
            self.mode = Mode::Key;
            return Ok(());
        }
        if self.peek_byte().is_none() {
            self.emit_eof();
            return Ok(());
        }
        Err(self.wanted("a newline"))
    }

    fn lex_key_position(&mut self) -> Result<(), LexError> {
        self.eat_intermediate()?;
        let start = self.cursor;
        let in_inline = self.nesting.last() == Some(&Nesting::InlineTable);
        match self.peek_byte() {
            None => self.emit_eof(),
            Some(b'[') if !in_inline => return self.lex_header(),
            Some(b'}') if in_inline => {
                self.advance();
                self.nesting.pop();
                self.emit_punct(TokenKind::RightBrace, start);
                self.after_value();
            }
            Some(b',') if in_inline => {
                self.advance();
                self.emit_punct(TokenKind::Comma, start);
            }
            Some(b) if is_keylike_byte(b) || b == b'"' || b == b'\'' => {
                let key = self.read_key()?;
                self.emit(TokenKind::Key, key, start);
                self.mode = Mode::Equals;
            }
            Some(_) => {
                return Err(self.wanted(if in_inline {
                    "a key"
                } else {
                    "a key or table header"
                }));
            }
        }
        Ok(())
    }

    fn lex_equals(&mut self) -> Result<(), LexError> {
        self.eat_whitespace();
        let start = self.cursor;
        if !self.eat_byte(b'=') {
            return Err(self.wanted("an equals"));
        }
        self.emit_punct(TokenKind::Equal, start);
        self.mode = Mode::Value;
        Ok(())
    }

    fn lex_header(&mut self) -> Result<(), LexError> {
        let start = self.cursor;
        self.advance();
        let is_array = self.eat_byte(b'[');
        let (open, key_kind, close) = if is_array {
            (
                TokenKind::DoubleLeftBracket,
                TokenKind::TableArrayKey,
                TokenKind::DoubleRightBracket,
            )
        } else {
            (
                TokenKind::LeftBracket,
                TokenKind::TableKey,
                TokenKind::RightBracket,
            )
        };
        self.emit_punct(open, start);

        self.eat_whitespace();
        let key_start = self.cursor;
        loop {
            match self.peek_byte() {
                Some(b']') => break,
                Some(delim @ (b'"' | b'\'')) => {
                    self.advance();
                    self.skip_quoted_key(delim)?;
                }
                None | Some(b'\n' | b'\r') => {
                    return Err(self.set_error(start, "unterminated table header"));
                }
                Some(_) => self.advance(),
            }
        }
        let key = self.input[key_start..self.cursor].trim_end();
        self.emit(key_kind, key, key_start);

        let close_start = self.cursor;
        self.advance();
        if is_array && !self.eat_byte(b']') {
            return Err(self.wanted("`]]` to close the table array header"));
        }
        self.emit_punct(close, close_start);
        self.mode = Mode::LineEnd;
        Ok(())
    }

    fn lex_value(&mut self) -> Result<(), LexError> {
        if self.nesting.is_empty() {
            self.eat_whitespace();
        } else {
            self.eat_intermediate()?;
        }
        let start = self.cursor;
        let Some(byte) = self.peek_byte() else {
            self.emit_eof();
            return Ok(());
        };
        match byte {
            b'[' => {
                self.advance();
                self.nesting.push(Nesting::Array);
                self.emit_punct(TokenKind::LeftBracket, start);
            }
            b']' => {
                self.advance();
                if self.nesting.last() == Some(&Nesting::Array) {
                    self.nesting.pop();
                }
                self.emit_punct(TokenKind::RightBracket, start);
                self.after_value();
            }
            b'{' => {
                self.advance();
                self.nesting.push(Nesting::InlineTable);
                self.emit_punct(TokenKind::LeftBrace, start);
                self.mode = Mode::Key;
            }
            b'}' => {
                self.advance();
                if self.nesting.last() == Some(&Nesting::InlineTable) {
                    self.nesting.pop();
                }
                self.emit_punct(TokenKind::RightBrace, start);
                self.after_value();
            }
            b',' => {
                self.advance();
                self.emit_punct(TokenKind::Comma, start);
                if self.nesting.last() == Some(&Nesting::InlineTable) {
                    self.mode = Mode::Key;
                }
            }
            b'=' => {
                self.advance();
                self.emit_punct(TokenKind::Equal, start);
            }
            b'"' | b'\'' => {
                self.advance();
                let s = self.read_string(start, byte)?;
                self.emit(TokenKind::String, s, start);
                self.after_value();
            }
            b if is_value_byte(b) => {
                let word = self.read_word();
                let kind = classify_word(word);
                if kind == TokenKind::Error {
                    return Err(self.set_error(
                        start,
                        format!("invalid value `{word}`, did you mean to use a quoted string?"),
                    ));
                }
                self.emit(kind, word, start);
                self.after_value();
            }
            _ => return Err(self.wanted("a value")),
        }
        Ok(())
    }

    // -- keys -----------------------------------------------------------------

    /// Reads a possibly dotted, possibly quoted key up to the `=`. Splitting
    /// into segments is the parser's job.
    fn read_key(&mut self) -> Result<&'a str, LexError> {
        let start = self.cursor;
        let mut after_dot = false;
        loop {
            match self.peek_byte() {
                Some(b) if is_keylike_byte(b) => {
                    self.advance();
                    after_dot = false;
                }
                Some(b'.') => {
                    self.advance();
                    after_dot = true;
                }
                Some(b' ' | b'\t') => {
                    // Whitespace only belongs to the key around a dot.
                    let ws_start = self.cursor;
                    self.eat_whitespace();
                    if !after_dot && self.peek_byte() != Some(b'.') {
                        self.cursor = ws_start;
                        break;
                    }
                }
                Some(delim @ (b'"' | b'\'')) => {
                    self.advance();
                    self.skip_quoted_key(delim)?;
                    after_dot = false;
                }
                _ => break,
            }
        }
        let input = self.input;
        Ok(input[start..self.cursor].trim_end())
    }

    /// Skips a quoted key segment; the cursor is just past the opening quote.
    fn skip_quoted_key(&mut self, delim: u8) -> Result<(), LexError> {
        let start = self.cursor - 1;
        loop {
            match self.peek_byte() {
                None | Some(b'\n' | b'\r') => {
                    return Err(self.set_error(start, "unterminated quoted key"));
                }
                Some(b'\\') if delim == b'"' => self.cursor += 2,
                Some(b) => {
                    self.advance();
                    if b == delim {
                        return Ok(());
                    }
                }
            }
        }
    }

    // -- values ---------------------------------------------------------------

    fn read_word(&mut self) -> &'a str {
        let start = self.cursor;
        while let Some(b) = self.peek_byte() {
            if !is_value_byte(b) {
                break;
            }
            self.advance();
        }
        // `1979-05-27 07:32:00Z`: a space may separate date and time.
        if self.cursor - start == 10
            && is_date_prefix(&self.bytes[start..self.cursor])
            && self.peek_byte() == Some(b' ')
            && self.peek_byte_at(1).is_some_and(|b| b.is_ascii_digit())
        {
            self.advance();
            while let Some(b) = self.peek_byte() {
                if !is_value_byte(b) {
                    break;
                }
                self.advance();
            }
        }
        let input = self.input;
        &input[start..self.cursor]
    }

    /// Reads a basic or literal string, single or multi-line. `start` is the
    /// offset of the opening quote; the cursor is just past it.
    fn read_string(&mut self, start: usize, delim: u8) -> Result<String, LexError> {
        let mut multiline = false;
        if self.eat_byte(delim) {
            if self.eat_byte(delim) {
                multiline = true;
            } else {
                return Ok(String::new());
            }
        }
        if multiline {
            self.eat_newline();
        }

        self.string_buf.clear();
        loop {
            let i = self.cursor;
            let Some(ch) = self.next_char() else {
                return Err(self.set_error(start, "unterminated string"));
            };
            match ch {
                '\n' if multiline => self.string_buf.push('\n'),
                c if c as u32 == delim as u32 => {
                    if !multiline {
                        return Ok(std::mem::take(&mut self.string_buf));
                    }
                    let mut run = 1;
                    while run < 5 && self.eat_byte(delim) {
                        run += 1;
                    }
                    if run >= 3 {
                        for _ in 3..run {
                            self.string_buf.push(delim as char);
                        }
                        return Ok(std::mem::take(&mut self.string_buf));
                    }
                    for _ in 0..run {
                        self.string_buf.push(delim as char);
                    }
                }
                '\\' if delim == b'"' => self.read_basic_escape(start, multiline)?,
                '\t' => self.string_buf.push('\t'),
                c if (c as u32) < 0x20 || c as u32 == 0x7F => {
                    return Err(self.set_error(
                        i,
                        format!("invalid character in string: `{}`", c.escape_default()),
                    ));
                }
                c => self.string_buf.push(c),
            }
        }
    }

    fn read_basic_escape(&mut self, string_start: usize, multi: bool) -> Result<(), LexError> {
        let i = self.cursor;
        let Some(b) = self.peek_byte() else {
            return Err(self.set_error(string_start, "unterminated string"));
        };
        self.advance();

        match b {
            b'"' => self.string_buf.push('"'),
            b'\\' => self.string_buf.push('\\'),
            b'b' => self.string_buf.push('\u{8}'),
            b'f' => self.string_buf.push('\u{c}'),
            b'n' => self.string_buf.push('\n'),
            b'r' => self.string_buf.push('\r'),
            b't' => self.string_buf.push('\t'),
            b'e' => self.string_buf.push('\u{1b}'),
            b'u' => {
                let ch = self.read_hex(4, string_start, i)?;
                self.string_buf.push(ch);
            }
            b'U' => {
                let ch = self.read_hex(8, string_start, i)?;
                self.string_buf.push(ch);
            }
            b'x' => {
                let ch = self.read_hex(2, string_start, i)?;
                self.string_buf.push(ch);
            }
            b' ' | b'\t' | b'\n' | b'\r' if multi => {
                // Line-ending backslash: only whitespace may follow on this line.
                if b != b'\n' && !(b == b'\r' && self.eat_byte(b'\n')) {
                    loop {
                        match self.peek_byte() {
                            Some(b' ' | b'\t') => self.advance(),
                            _ if self.eat_newline() => break,
                            _ => {
                                return Err(self.set_error(
                                    i,
                                    "invalid escape character in string: whitespace after line-ending backslash",
                                ));
                            }
                        }
                    }
                }
                loop {
                    match self.peek_byte() {
                        Some(b' ' | b'\t') => self.advance(),
                        _ if self.eat_newline() => {}
                        _ => break,
                    }
                }
            }
            _ => {
                self.cursor = i;
                let c = self.next_char().unwrap_or('\\');
                return Err(self.set_error(
                    i,
                    format!("invalid escape character in string: `{}`", c.escape_default()),
                ));
            }
        }
        Ok(())
    }

    fn read_hex(&mut self, n: usize, string_start: usize, escape_start: usize) -> Result<char, LexError> {
        let mut val = 0u32;
        for _ in 0..n {
            let Some(byte) = self.peek_byte() else {
                return Err(self.set_error(string_start, "unterminated string"));
            };
            let Some(digit) = (byte as char).to_digit(16) else {
                let at = self.cursor;
                let c = self.next_char().unwrap_or('?');
                return Err(self.set_error(
                    at,
                    format!("invalid hex escape character in string: `{}`", c.escape_default()),
                ));
            };
            val = val * 16 + digit;
            self.advance();
        }
        match char::from_u32(val) {
            Some(ch) => Ok(ch),
            None => Err(self.set_error(escape_start, format!("invalid escape value: `{val:x}`"))),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.queue.is_empty() && !self.finished {
            if let Err(LexError) = self.lex() {
                let (at, message) = self
                    .error
                    .take()
                    .unwrap_or_else(|| (self.cursor, String::from("lexer error")));
                self.emit(TokenKind::Error, message, at);
                self.finished = true;
            }
        }
        self.queue.pop_front()
    }
}

/// Convenience wrapper collecting every token of `input`.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn is_keylike_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

#[inline]
fn is_value_byte(b: u8) -> bool {
    is_keylike_byte(b) || matches!(b, b'+' | b'.' | b':')
}

fn is_date_prefix(bytes: &[u8]) -> bool {
    bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}

fn classify_word(word: &str) -> TokenKind {
    match word {
        "true" => return TokenKind::True,
        "false" => return TokenKind::False,
        "inf" | "+inf" | "-inf" => return TokenKind::Inf,
        "nan" | "+nan" | "-nan" => return TokenKind::Nan,
        _ => {}
    }
    if is_date_prefix(word.as_bytes()) {
        return TokenKind::Datetime;
    }
    let unsigned = word.strip_prefix(['+', '-']).unwrap_or(word);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '_') {
        return TokenKind::Error;
    }
    if ["0x", "0o", "0b"].iter().any(|p| unsigned.starts_with(p)) {
        TokenKind::Integer
    } else if unsigned.contains(['.', 'e', 'E']) {
        TokenKind::Float
    } else {
        TokenKind::Integer
    }
}
