#![no_main]

use ferrous_container::{Parameters, Value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(path) = std::str::from_utf8(data) else {
        return;
    };

    let params = Parameters::from_iter([
        ("a", Value::map([("b", Value::from(1)), ("", Value::from("empty"))])),
        ("list", Value::from(vec![Value::from(true), Value::Null])),
    ]);

    // Lookup is total: any path is either found or reported by its full id.
    match params.get(path) {
        Ok(_) => assert!(params.contains(path)),
        Err(err) => assert_eq!(err.to_string(), format!("Parameter not found: {}", path)),
    }
});
