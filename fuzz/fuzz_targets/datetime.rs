#![no_main]

use libfuzzer_sys::fuzz_target;
use toml_tree::Datetime;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Some(dt) = Datetime::parse(text) else {
        return;
    };
    let out = Datetime::parse(&dt.to_string()).unwrap();
    assert_eq!(dt, out);
    assert_eq!(dt.unix_timestamp(), out.unix_timestamp());
});
