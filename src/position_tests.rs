use super::*;

#[test]
fn position_basics_and_conversions() {
    let p = Position::new(3, 7);
    assert_eq!(p.line, 3);
    assert_eq!(p.column, 7);

    assert_eq!(Position::default(), Position::START);
    assert_eq!(Position::START, Position::new(1, 1));

    let t: (u32, u32) = Position::new(5, 10).into();
    assert_eq!(t, (5, 10));
    let p: Position = (2u32, 4u32).into();
    assert_eq!(p, Position::new(2, 4));

    // Ordering is line-major.
    assert!(Position::new(1, 9) < Position::new(2, 1));
    assert!(Position::new(2, 1) < Position::new(2, 2));
}

#[test]
fn position_formatting() {
    assert_eq!(Position::new(12, 4).to_string(), "12:4");
    assert_eq!(format!("{:?}", Position::new(12, 4)), "(12, 4)");
}
