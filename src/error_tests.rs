use super::*;

fn at(line: u32, column: u32) -> Position {
    Position::new(line, column)
}

#[test]
fn display_all_error_kinds() {
    let cases: Vec<(ErrorKind, &str)> = vec![
        (ErrorKind::Lexical("bad".into()), "lexical"),
        (ErrorKind::UnexpectedToken("a comma"), "unexpected-token"),
        (
            ErrorKind::Wanted {
                expected: "an equals",
                found: "a comma",
            },
            "wanted",
        ),
        (ErrorKind::MultipleEquals, "multiple-equals"),
        (ErrorKind::UnterminatedArray, "unterminated-array"),
        (ErrorKind::UnterminatedInlineTable, "unterminated-inline-table"),
        (ErrorKind::MissingComma, "missing-comma"),
        (ErrorKind::EmptyField, "empty-field"),
        (ErrorKind::LeadingComma, "leading-comma"),
        (ErrorKind::TrailingComma, "trailing-comma"),
        (ErrorKind::InvalidKey("empty segment"), "invalid-key"),
        (ErrorKind::InvalidUnderscore, "invalid-underscore"),
        (ErrorKind::InvalidNumber, "invalid-number"),
        (ErrorKind::InvalidDatetime, "invalid-datetime"),
        (
            ErrorKind::DuplicateKey {
                key: "k".into(),
                first: at(1, 1),
            },
            "duplicate-key",
        ),
        (
            ErrorKind::DuplicateTable {
                name: "t".into(),
                first: at(1, 1),
            },
            "duplicate-table",
        ),
        (
            ErrorKind::DottedKeyInvalidType {
                key: "a".into(),
                first: at(1, 1),
            },
            "dotted-key-invalid-type",
        ),
        (
            ErrorKind::RedefineAsArray { key: "a".into() },
            "redefine-as-array",
        ),
        (
            ErrorKind::MixedArray {
                expected: "integer",
                found: "string",
            },
            "mixed-array",
        ),
        (ErrorKind::DepthLimitExceeded(4), "depth-limit-exceeded"),
    ];

    for (kind, expected) in cases {
        assert_eq!(kind.to_string(), expected);
        assert_eq!(format!("{kind:?}"), expected);
    }
}

#[test]
fn error_display_is_prefixed_with_line_and_column() {
    let cases: Vec<(Error, &str)> = vec![
        (
            Error::new(ErrorKind::Lexical("unterminated string".into()), at(2, 5)),
            "2:5: unterminated string",
        ),
        (
            Error::new(ErrorKind::EmptyField, at(1, 8)),
            "1:8: need field between two commas",
        ),
        (
            Error::new(
                ErrorKind::DuplicateKey {
                    key: "a.b".into(),
                    first: at(1, 1),
                },
                at(3, 1),
            ),
            "3:1: the following key was defined twice: a.b (first defined at 1:1)",
        ),
        (
            Error::new(
                ErrorKind::DuplicateTable {
                    name: "a".into(),
                    first: at(1, 1),
                },
                at(4, 1),
            ),
            "4:1: duplicated tables: a (first defined at 1:1)",
        ),
        (
            Error::new(
                ErrorKind::MixedArray {
                    expected: "integer",
                    found: "string",
                },
                at(1, 9),
            ),
            "1:9: mixed types in array: expected integer, found string",
        ),
        (
            Error::new(
                ErrorKind::Wanted {
                    expected: "an equals",
                    found: "end of input",
                },
                at(1, 2),
            ),
            "1:2: was expecting an equals, but got end of input instead",
        ),
        (
            Error::new(ErrorKind::InvalidUnderscore, at(1, 5)),
            "1:5: invalid use of _ in number",
        ),
        (
            Error::new(ErrorKind::RedefineAsArray { key: "a.b".into() }, at(7, 1)),
            "7:1: key a.b is already assigned and not of type table array",
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn error_from_tuple() {
    let err = Error::from((ErrorKind::InvalidNumber, at(9, 2)));
    assert_eq!(err.kind, ErrorKind::InvalidNumber);
    assert_eq!(err.position, at(9, 2));
}
