//! Fuzz target for annotation classification.
//!
//! `classify` must accept any text without panicking or recursing without
//! bound, and must be deterministic.

#![no_main]
use libfuzzer_sys::fuzz_target;
use propgen_annotation::classify;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let descriptor = classify(s);
        assert_eq!(classify(s), descriptor, "classification must be deterministic");
        // Display must not panic either
        let _ = descriptor.to_string();
    }
});
