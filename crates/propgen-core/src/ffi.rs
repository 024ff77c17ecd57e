//! JSON entrypoint for language bindings and tooling.
//!
//! ## Response Envelope
//!
//! - Success: `{"ok": true, "data": {...}}`
//! - Error: `{"ok": false, "error": {"code": "...", "message": "...", "details": ...}}`
//!
//! ## Modes
//!
//! - `generate`: `{"manifest": {...}, "settings": {...}, "output_dir": "..."}`.
//!   Without `output_dir` (or with `"dry_run": true`) nothing is written and
//!   the rendered modules are returned inline.
//! - `classify`: `{"annotation": "..."}` returns the type descriptor.
//! - `version`: tool and schema versions.
//!
//! Missing keys use defaults; invalid values are errors, never silently
//! replaced by defaults.

use std::path::Path;

use serde_json::{Value, json};

use propgen_settings::GenerateSettings;
use propgen_types::{SCHEMA_VERSION, ToolInfo};

use crate::error::{PropgenError, ResponseEnvelope};
use crate::manifest::Manifest;
use crate::{pipeline, report, writer};

/// Run a propgen operation with JSON arguments, returning a JSON envelope.
pub fn run_json(mode: &str, args_json: &str) -> String {
    match run_json_inner(mode, args_json) {
        Ok(data) => ResponseEnvelope::success(data).to_json(),
        Err(err) => ResponseEnvelope::error(&err).to_json(),
    }
}

fn run_json_inner(mode: &str, args_json: &str) -> Result<Value, PropgenError> {
    let args: Value = serde_json::from_str(args_json).map_err(PropgenError::invalid_json)?;

    match mode {
        "generate" => generate(&args),
        "classify" => {
            let annotation = args
                .get("annotation")
                .and_then(Value::as_str)
                .ok_or_else(|| PropgenError::invalid_json("`annotation` must be a string"))?;
            Ok(serde_json::to_value(crate::classify_annotation(annotation))
                .map_err(PropgenError::internal)?)
        }
        "version" => Ok(json!({
            "tool": ToolInfo::current(),
            "schema_version": SCHEMA_VERSION,
        })),
        other => Err(PropgenError::unknown_mode(other)),
    }
}

fn generate(args: &Value) -> Result<Value, PropgenError> {
    let manifest: Manifest = match args.get("manifest") {
        Some(value) => serde_json::from_value(value.clone()).map_err(PropgenError::invalid_manifest)?,
        None => return Err(PropgenError::invalid_manifest("missing `manifest`")),
    };
    let settings: GenerateSettings = match args.get("settings") {
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            PropgenError::with_details(
                crate::error::ErrorCode::InvalidSettings,
                format!("Invalid settings: {e}"),
                "settings",
            )
        })?,
        None => GenerateSettings::default(),
    };
    let output_dir = args.get("output_dir").and_then(Value::as_str);
    let dry_run = output_dir.is_none()
        || args
            .get("dry_run")
            .and_then(Value::as_bool)
            .unwrap_or(false);

    let generation = pipeline::generate(&manifest.sources(), &settings)?;
    let dir = Path::new(output_dir.unwrap_or("."));
    let (files, failures) = writer::write_files(dir, &generation.files, dry_run);
    let run = report::build_report(&generation, files, failures, dry_run);

    let mut data = json!({ "report": run });
    if dry_run {
        let modules: Vec<Value> = generation
            .files
            .iter()
            .map(|f| json!({ "name": f.name, "units": f.units, "contents": f.contents }))
            .collect();
        data["modules"] = Value::Array(modules);
    }
    Ok(data)
}

/// Version of this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Schema version of manifests and run reports.
pub fn schema_version() -> u32 {
    SCHEMA_VERSION
}
