#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let first = toml_tree::parse(text);
    let second = toml_tree::parse(text);
    match (first, second) {
        (Ok(a), Ok(b)) => {
            // NaN never equals itself, so compare the debug rendering.
            assert_eq!(format!("{a:?}"), format!("{b:?}"));
        }
        (Err(a), Err(b)) => assert_eq!(a, b),
        _ => panic!("parsing the same input twice disagreed"),
    }
});
