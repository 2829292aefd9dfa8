#![no_main]

use libfuzzer_sys::fuzz_target;
use minigo_parser::lexer::{Lexer, Tok};

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let mut max_end = 0usize;
    let mut last_real_end = 0usize;
    let max_steps = s.len().saturating_mul(4) + 64;

    for (steps, (start, tok, end)) in Lexer::new(&s).enumerate() {
        assert!(start <= end);
        assert!(end <= s.len());
        assert!(tok != Tok::Eof);

        let injected = tok == Tok::Semi && start == end;
        if !injected {
            assert!(start >= last_real_end);
            last_real_end = end;
            assert!(end >= max_end);
        } else {
            assert!(start >= max_end);
        }

        max_end = max_end.max(end);
        assert!(steps <= max_steps);
    }
});
