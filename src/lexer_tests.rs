use super::*;

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input).map(|t| t.kind).collect()
}

fn texts(input: &str) -> Vec<String> {
    Lexer::new(input).map(|t| t.text).collect()
}

fn error_message(input: &str) -> String {
    let last = Lexer::new(input).last().unwrap();
    assert_eq!(last.kind, TokenKind::Error, "input: {input:?}");
    last.text
}

#[test]
fn statements_and_headers() {
    use TokenKind::*;

    assert_eq!(kinds(""), [Eof]);
    assert_eq!(kinds("# only a comment"), [Eof]);
    assert_eq!(kinds("a = 1"), [Key, Equal, Integer, Eof]);
    assert_eq!(
        kinds("[table]\nkey = \"v\""),
        [LeftBracket, TableKey, RightBracket, Key, Equal, String, Eof]
    );
    assert_eq!(
        kinds("[[items]]\n"),
        [DoubleLeftBracket, TableArrayKey, DoubleRightBracket, Eof]
    );

    // Header keys keep their raw text, quotes included.
    assert_eq!(texts("[ a . \"b]c\" ]")[1], "a . \"b]c\"");
    assert_eq!(texts("a.'b c' .d = 1")[0], "a.'b c' .d");
}

#[test]
fn values() {
    use TokenKind::*;

    let cases = [
        ("a = true", True),
        ("a = false", False),
        ("a = 42", Integer),
        ("a = -1_000", Integer),
        ("a = 0xDEAD_beef", Integer),
        ("a = 0b101", Integer),
        ("a = 1.5", Float),
        ("a = 1e10", Float),
        ("a = -2.5E-3", Float),
        ("a = inf", Inf),
        ("a = -inf", Inf),
        ("a = +nan", Nan),
        ("a = 1979-05-27T07:32:00Z", Datetime),
        ("a = 1979-05-27 07:32:00.999-07:00", Datetime),
        ("a = 'lit'", String),
    ];
    for (input, kind) in cases {
        let tokens: Vec<Token> = Lexer::new(input).collect();
        assert_eq!(tokens[2].kind, kind, "input: {input}");
        assert_eq!(tokens[3].kind, Eof, "input: {input}");
    }

    assert_eq!(texts("a = 1979-05-27 07:32:00Z")[2], "1979-05-27 07:32:00Z");
}

#[test]
fn arrays_and_inline_tables() {
    use TokenKind::*;

    assert_eq!(
        kinds("a = [1, [2], ]"),
        [
            Key,
            Equal,
            LeftBracket,
            Integer,
            Comma,
            LeftBracket,
            Integer,
            RightBracket,
            Comma,
            RightBracket,
            Eof
        ]
    );
    assert_eq!(
        kinds("t = {x = 1, y.z = [true]}"),
        [
            Key,
            Equal,
            LeftBrace,
            Key,
            Equal,
            Integer,
            Comma,
            Key,
            Equal,
            LeftBracket,
            True,
            RightBracket,
            RightBrace,
            Eof
        ]
    );

    // Arrays may span lines and hold comments.
    assert_eq!(
        kinds("a = [\n  1, # one\n  2,\n]\n"),
        [Key, Equal, LeftBracket, Integer, Comma, Integer, Comma, RightBracket, Eof]
    );

    // Grammar problems are passed through for the parser to judge.
    assert_eq!(
        kinds("a = [1,,2]"),
        [Key, Equal, LeftBracket, Integer, Comma, Comma, Integer, RightBracket, Eof]
    );
    assert_eq!(kinds("a = = 1"), [Key, Equal, Equal, Integer, Eof]);
}

#[test]
fn strings() {
    let cases = [
        (r#"a = "tab\there""#, "tab\there"),
        (r#"a = "\u00e9\U0001F600""#, "é😀"),
        (r#"a = "esc\e""#, "esc\u{1b}"),
        (r#"a = 'C:\path'"#, "C:\\path"),
        ("a = \"\"\"\nline1\nline2\"\"\"", "line1\nline2"),
        ("a = \"\"\"one \\\n    two\"\"\"", "one two"),
        ("a = '''\n raw \\n'''", " raw \\n"),
        ("a = \"\"\"quote\"\"\"\"\"", "quote\"\""),
        ("a = \"\"", ""),
        ("a = ''", ""),
    ];
    for (input, expected) in cases {
        assert_eq!(texts(input)[2], expected, "input: {input:?}");
    }
}

#[test]
fn positions_are_one_based_and_count_chars() {
    let tokens: Vec<Token> = Lexer::new("a = 1\n  [t]\nc = [\"ü\", 1] # é\nb = 2").collect();
    let positions: Vec<(u32, u32)> = tokens.iter().map(|t| t.position.into()).collect();
    assert_eq!(
        positions,
        [
            (1, 1),
            (1, 3),
            (1, 5),
            (2, 3),
            (2, 4),
            (2, 5),
            (3, 1),
            (3, 3),
            (3, 5),
            (3, 6),
            (3, 9),
            (3, 11),
            (3, 12),
            (4, 1),
            (4, 3),
            (4, 5),
            (4, 6),
        ]
    );
}

#[test]
fn long_single_line() {
    let n = 200_000;
    let mut input = String::from("a = [");
    for _ in 0..n {
        input.push_str("1,");
    }
    input.push_str("\"ü\"]");

    let tokens: Vec<Token> = Lexer::new(&input).collect();
    assert_eq!(tokens.len(), 3 + 2 * n + 3);
    let last_int = &tokens[3 + 2 * (n - 1)];
    assert_eq!(last_int.position, Position::new(1, 6 + 2 * (n as u32 - 1)));
    let close = &tokens[tokens.len() - 2];
    assert_eq!(close.kind, TokenKind::RightBracket);
    assert_eq!(close.position, Position::new(1, 6 + 2 * n as u32 + 3));
    assert_eq!(tokens.last().unwrap().position, Position::new(1, 6 + 2 * n as u32 + 4));
}

#[test]
fn bom_and_crlf() {
    let tokens: Vec<Token> = Lexer::new("\u{feff}a = 1\r\nb = \"\"\"x\r\ny\"\"\"\r\n").collect();
    assert_eq!(tokens[0].position, Position::new(1, 1));
    assert_eq!(tokens[3].text, "b");
    assert_eq!(tokens[3].position, Position::new(2, 1));
    assert_eq!(tokens[5].text, "x\ny");
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
}

#[test]
fn errors_end_the_stream() {
    let tokens: Vec<Token> = Lexer::new("a = 1 2\nb = 3").collect();
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[3].kind, TokenKind::Error);
    assert_eq!(tokens[3].position, Position::new(1, 7));

    let mut lexer = Lexer::new("a = \"open");
    assert_eq!(lexer.by_ref().last().unwrap().kind, TokenKind::Error);
    assert!(lexer.next().is_none());
}

#[test]
fn error_messages() {
    assert_eq!(error_message("a = 1 2"), "expected a newline, found an identifier");
    assert_eq!(error_message("a\n= 1"), "expected an equals, found a newline");
    assert_eq!(error_message("a =\n1"), "expected a value, found a newline");
    assert_eq!(error_message("= 1"), "expected a key or table header, found an equals");
    assert_eq!(error_message("a = \"open"), "unterminated string");
    assert_eq!(error_message("a = \"a\nb\""), "invalid character in string: `\\n`");
    assert_eq!(error_message(r#"a = "\z""#), "invalid escape character in string: `z`");
    assert_eq!(error_message(r#"a = "\uD800""#), "invalid escape value: `d800`");
    assert_eq!(
        error_message(r#"a = "\u00g0""#),
        "invalid hex escape character in string: `g`"
    );
    assert_eq!(error_message("[a\nb = 1"), "unterminated table header");
    assert_eq!(
        error_message("[[a]\n"),
        "expected `]]` to close the table array header, found a newline"
    );
    assert_eq!(
        error_message("a = bare"),
        "invalid value `bare`, did you mean to use a quoted string?"
    );
    assert_eq!(error_message("\"open = 1"), "unterminated quoted key");
    assert_eq!(error_message("a = 1 # bad \u{7f}"), "invalid character in comment");
}

#[test]
fn tokenize_collects_everything() {
    let tokens = tokenize("x = [1]");
    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens[0], Token::new(TokenKind::Key, "x", Position::new(1, 1)));
    assert_eq!(tokens[5].kind, TokenKind::Eof);
}
