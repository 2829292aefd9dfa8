#![no_main]

use libfuzzer_sys::fuzz_target;
use minigo_parser::{parse_file, print_file};

fuzz_target!(|data: &[u8]| {
    let Ok(src) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(file) = parse_file("fuzz.go", src) else {
        return;
    };

    // Whatever parses must print to something that parses again.
    let printed = print_file(&file);
    if let Err(e) = parse_file("printed.go", &printed) {
        panic!("printed form does not parse: {e}\n{printed}");
    }
});
