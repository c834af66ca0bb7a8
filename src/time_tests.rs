use super::*;

#[track_caller]
fn parse_ok(input: &str) -> Datetime {
    Datetime::parse(input).unwrap_or_else(|| panic!("failed to parse {input:?}"))
}

#[track_caller]
fn expect_err(input: &str) {
    let result = Datetime::parse(input);
    assert!(result.is_none(), "expected error for {input:?}, got {result:?}");
}

#[track_caller]
fn normalizes_to(input: &str, expected: &str) {
    assert_eq!(parse_ok(input).to_string(), expected, "input: {input:?}");
}

#[test]
fn utc_inputs_roundtrip() {
    let exact = [
        "1979-05-27T07:32:00Z",
        "2000-12-17T00:32:00.5Z",
        "1979-05-27T00:32:00.999999Z",
        "2023-06-15T12:30:45.123456789Z",
        "0000-01-01T00:00:00Z",
        "9999-12-31T23:59:59Z",
        "2024-02-29T12:00:00Z",
    ];
    for input in exact {
        normalizes_to(input, input);
    }
}

#[test]
fn offsets_are_normalized_to_utc() {
    normalizes_to("1979-05-27T00:32:00-07:00", "1979-05-27T07:32:00Z");
    normalizes_to("1979-05-27T07:32:00+00:00", "1979-05-27T07:32:00Z");
    normalizes_to("1979-05-27T00:32:00.999999-07:00", "1979-05-27T07:32:00.999999Z");
    normalizes_to("2000-01-01T00:30:00+01:00", "1999-12-31T23:30:00Z");
    normalizes_to("1999-12-31T23:30:00-01:00", "2000-01-01T00:30:00Z");
    normalizes_to("2024-02-28T23:00:00-02:00", "2024-02-29T01:00:00Z");
    normalizes_to("2023-02-28T23:00:00-02:00", "2023-03-01T01:00:00Z");
    normalizes_to("2023-06-15T12:30:45+23:59", "2023-06-14T12:31:45Z");

    assert_eq!(
        parse_ok("1979-05-27T00:32:00-07:00"),
        parse_ok("1979-05-27T07:32:00Z")
    );
}

#[test]
fn separators_and_case() {
    normalizes_to("1979-05-27t07:32:00z", "1979-05-27T07:32:00Z");
    normalizes_to("1979-05-27 07:32:00Z", "1979-05-27T07:32:00Z");
}

#[test]
fn fraction_has_unlimited_digits() {
    let dt = parse_ok("2023-06-15T12:30:45.1Z");
    assert_eq!(dt.nanosecond(), 100_000_000);

    let dt = parse_ok("2023-06-15T12:30:45.000000001Z");
    assert_eq!(dt.nanosecond(), 1);

    // Digits past nanosecond resolution are truncated.
    let dt = parse_ok("2023-06-15T12:30:45.1234567891234Z");
    assert_eq!(dt.nanosecond(), 123_456_789);

    let dt = parse_ok("2023-06-15T12:30:45.99999999999999999999+01:00");
    assert_eq!(dt.nanosecond(), 999_999_999);
    assert_eq!(dt.hour(), 11);
}

#[test]
fn accessors() {
    let dt = parse_ok("1979-05-27T07:32:01.5Z");
    assert_eq!(dt.year(), 1979);
    assert_eq!(dt.month(), 5);
    assert_eq!(dt.day(), 27);
    assert_eq!(dt.hour(), 7);
    assert_eq!(dt.minute(), 32);
    assert_eq!(dt.second(), 1);
    assert_eq!(dt.nanosecond(), 500_000_000);
    assert_eq!(dt.unix_timestamp(), 296_638_321);

    assert_eq!(parse_ok("1970-01-01T00:00:00Z").unix_timestamp(), 0);
    assert_eq!(parse_ok("1969-12-31T23:59:59Z").unix_timestamp(), -1);
}

#[test]
fn constructor_validates_components() {
    assert!(Datetime::new(2023, 6, 15, 12, 30, 45, 0).is_some());
    assert!(Datetime::new(2024, 2, 29, 0, 0, 0, 0).is_some());
    assert!(Datetime::new(2023, 2, 29, 0, 0, 0, 0).is_none());
    assert!(Datetime::new(2023, 13, 1, 0, 0, 0, 0).is_none());
    assert!(Datetime::new(2023, 1, 0, 0, 0, 0, 0).is_none());
    assert!(Datetime::new(2023, 1, 1, 24, 0, 0, 0).is_none());
    assert!(Datetime::new(2023, 1, 1, 0, 60, 0, 0).is_none());
    assert!(Datetime::new(2023, 1, 1, 0, 0, 60, 0).is_none());
    assert!(Datetime::new(2023, 1, 1, 0, 0, 0, 1_000_000_000).is_none());

    assert_eq!(
        Datetime::new(1979, 5, 27, 7, 32, 0, 0),
        Some(parse_ok("1979-05-27T07:32:00Z"))
    );
}

#[test]
fn ordering_is_chronological() {
    let a = parse_ok("1979-05-27T07:32:00Z");
    let b = parse_ok("1979-05-27T07:32:00.000000001Z");
    let c = parse_ok("1979-05-27T08:00:00+00:01");
    assert!(a < b);
    assert!(b < c);
}

#[test]
fn failures() {
    let inputs = [
        "",
        "1979",
        "1979-05-27",
        "07:32:00",
        "1979-05-27T07:32:00",
        "1979-05-27T07:32Z",
        "1979-05-27T07:32:00.Z",
        "1979-05-27T07:32:00+07",
        "1979-05-27T07:32:00+07:0",
        "1979-05-27T07:32:00+24:00",
        "1979-05-27T07:32:00+07:60",
        "1979-13-27T07:32:00Z",
        "1979-00-27T07:32:00Z",
        "1979-05-32T07:32:00Z",
        "2023-02-29T07:32:00Z",
        "1979-05-27T24:32:00Z",
        "1979-05-27T07:60:00Z",
        "1979-05-27T07:32:60Z",
        "1979-05-27X07:32:00Z",
        "1979-05-27T07:32:00ZZ",
        "1979-05-27T07:32:00Z ",
        "1979-05-27T07:32:00+07:00:00",
        "79-05-27T07:32:00Z",
        "1979-5-27T07:32:00Z",
        "1979-05-27T7:32:00Z",
        "1979/05/27T07:32:00Z",
        "abcd-ef-ghT07:32:00Z",
    ];
    for input in inputs {
        expect_err(input);
    }
}

#[test]
fn offsets_stay_within_four_digit_years() {
    expect_err("9999-12-31T23:59:59-01:00");
    expect_err("9999-12-31T23:00:00-23:59");
    expect_err("0000-01-01T00:00:00+00:01");
    expect_err("0000-01-01T23:58:59+23:59");

    // Edges that stay in range still print as something parse accepts.
    for input in [
        "9999-12-31T22:59:59-01:00",
        "0000-01-01T00:01:00+00:01",
        "9999-12-31T23:59:59.999999999Z",
        "0000-01-01T00:00:00Z",
    ] {
        let dt = parse_ok(input);
        assert_eq!(Datetime::parse(&dt.to_string()), Some(dt), "input: {input:?}");
    }

    assert!(Datetime::new(10_000, 1, 1, 0, 0, 0, 0).is_none());
    assert!(Datetime::new(-1, 12, 31, 0, 0, 0, 0).is_none());
}

#[test]
fn leap_year_known_values() {
    assert!(is_leap_year(2000));
    assert!(is_leap_year(2024));
    assert!(is_leap_year(0));
    assert!(!is_leap_year(1900));
    assert!(!is_leap_year(2023));
    assert!(!is_leap_year(2100));
}

#[test]
fn civil_days_roundtrip() {
    for days in [-800_000i64, -719_468, -1, 0, 1, 365, 11_016, 2_932_896] {
        let (y, m, d) = civil_from_days(days);
        assert_eq!(days_from_civil(y, m, d), days, "days: {days}");
    }
    assert_eq!(days_from_civil(1970, 1, 1), 0);
    assert_eq!(days_from_civil(2000, 3, 1), 11_017);
}

#[test]
fn randomized_offset_normalization() {
    let mut rng = oorandom::Rand32::new(0xdeadbeaf);
    for _ in 0..5000 {
        let year = (rng.rand_u32() % 9998) as i32 + 1;
        let month = (rng.rand_u32() % 12) as u8 + 1;
        let max_day = days_in_month(year, month);
        let day = (rng.rand_u32() % max_day as u32) as u8 + 1;
        let hour = (rng.rand_u32() % 24) as u8;
        let minute = (rng.rand_u32() % 60) as u8;
        let second = (rng.rand_u32() % 60) as u8;
        let off_hour = rng.rand_u32() % 24;
        let off_min = rng.rand_u32() % 60;
        let negative = rng.rand_u32() % 2 == 0;
        let sign = if negative { '-' } else { '+' };

        let local = format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}");
        let as_utc = parse_ok(&format!("{local}Z"));
        let with_offset = parse_ok(&format!("{local}{sign}{off_hour:02}:{off_min:02}"));

        let offset_seconds = (off_hour * 3600 + off_min * 60) as i64;
        let offset_seconds = if negative {
            -offset_seconds
        } else {
            offset_seconds
        };
        assert_eq!(
            with_offset.unix_timestamp(),
            as_utc.unix_timestamp() - offset_seconds,
            "input: {local}{sign}{off_hour:02}:{off_min:02}"
        );

        // The normalized form parses back to itself.
        let normalized = with_offset.to_string();
        assert_eq!(parse_ok(&normalized), with_offset, "normalized: {normalized}");
    }
}
