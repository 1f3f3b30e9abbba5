//! Fuzz test for document parsing, flattening and resolution
//!
//! Arbitrary text must either be rejected as a document error or produce an engine
//! whose every entry resolves for both targets. Cycles and dangling references in
//! the input must neither panic nor hang.
//!
//! Run with: cargo +nightly fuzz run document_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use tessera_core::{Dialect, ReferencePolicy, Target};
use tessera_tokens::{TokenDocument, TokenEngine};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(document) = TokenDocument::parse(input) else {
        return;
    };

    let _ = document.group_order();
    let engine = TokenEngine::from_document(&document, ReferencePolicy::Ignore);
    for idx in 0..engine.len() {
        for target in Target::ALL {
            let first = engine.resolve_entry(idx, target);
            assert_eq!(first, engine.resolve_entry(idx, target), "resolution must be stable");
            let _ = engine.render_entry(idx, target, Dialect::Scss);
        }
    }
});
