//! Fuzz target for manifest loading and generation.
//!
//! Any manifest that parses must run through resolution, selection and
//! rendering without panicking, and rendered modules must be ASCII.

#![no_main]
use libfuzzer_sys::fuzz_target;
use propgen_core::manifest::Manifest;
use propgen_core::pipeline::generate;
use propgen_settings::GenerateSettings;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(manifest) = Manifest::parse(s) else {
        return;
    };
    let settings = GenerateSettings {
        threads: 1,
        ..GenerateSettings::default()
    };
    if let Ok(generation) = generate(&manifest.sources(), &settings) {
        for file in &generation.files {
            assert!(file.contents.is_ascii(), "{} is not ASCII", file.name);
        }
    }
});
