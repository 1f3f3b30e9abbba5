//! Fuzz test for the runtime sheet reader
//!
//! Every declared name must resolve to some value, and listing must return every
//! declaration exactly once.
//!
//! Run with: cargo +nightly fuzz run sheet_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use tessera_tokens::RuntimeTokens;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let tokens = RuntimeTokens::from_sheets([input]);
    let all = tokens.all_tokens();
    assert_eq!(all.len(), tokens.len());
    for record in &all {
        assert!(tokens.resolve_token_value(&record.name).is_some());
    }
});
