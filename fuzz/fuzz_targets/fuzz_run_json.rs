//! Fuzz target for the JSON entrypoint.
//!
//! Whatever the input, `run_json` must return a well-formed envelope.
//! `output_dir` is stripped so the target never writes to disk.

#![no_main]
use libfuzzer_sys::fuzz_target;
use propgen_core::ffi::run_json;

const MODES: [&str; 4] = ["generate", "classify", "version", "bogus"];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(args) = std::str::from_utf8(rest) else {
        return;
    };
    let mode = MODES[selector as usize % MODES.len()];
    let args = match serde_json::from_str::<serde_json::Value>(args) {
        Ok(serde_json::Value::Object(mut map)) => {
            map.remove("output_dir");
            serde_json::Value::Object(map).to_string()
        }
        _ => args.to_string(),
    };
    let out = run_json(mode, &args);
    let value: serde_json::Value =
        serde_json::from_str(&out).expect("run_json must always return JSON");
    assert!(value.get("ok").and_then(|v| v.as_bool()).is_some());
});
