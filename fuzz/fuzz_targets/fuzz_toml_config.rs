//! Fuzz target for `propgen.toml` parsing.

#![no_main]
use libfuzzer_sys::fuzz_target;
use propgen_settings::TomlConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(cfg) = TomlConfig::parse(s)
    {
        // Layering must not panic even for values validation rejects
        let _ = cfg.to_settings().validate();
    }
});
