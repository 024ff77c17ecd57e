//! # propgen-core
//!
//! This crate is the **primary library interface** for `propgen`.
//! It turns a signature manifest into Hypothesis test modules on disk and
//! returns a run report.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use propgen_core::generate_workflow;
//! use propgen_core::manifest::Manifest;
//! use propgen_settings::GenerateSettings;
//!
//! let manifest = Manifest::from_file(Path::new("signatures.json")).expect("manifest");
//! let report = generate_workflow(
//!     &manifest,
//!     &GenerateSettings::default(),
//!     Path::new("tests/generated"),
//!     false,
//! )
//! .expect("generation failed");
//! for file in &report.files {
//!     println!("{}", file.path);
//! }
//! ```

pub mod error;
pub mod ffi;
pub mod manifest;
pub mod pipeline;
pub mod report;
pub mod writer;

use std::path::Path;

use anyhow::Result;
use tracing::info;

// Re-export types for convenience
pub use propgen_settings as settings;
pub use propgen_types as types;

use manifest::Manifest;
use propgen_settings::GenerateSettings;
use propgen_types::{RunReport, TypeDescriptor};

/// Runs the complete workflow: Manifest -> Units -> Modules -> Disk -> Report.
///
/// Per-unit problems are diagnostics in the report and per-file write
/// failures make the report `partial`. Only invalid settings abort.
pub fn generate_workflow(
    manifest: &Manifest,
    settings: &GenerateSettings,
    output_dir: &Path,
    dry_run: bool,
) -> Result<RunReport> {
    let sources = manifest.sources();
    info!(signatures = sources.len(), files = manifest.files.len(), "generating property tests");

    let generation = pipeline::generate(&sources, settings)?;
    let (files, failures) = writer::write_files(output_dir, &generation.files, dry_run);
    let report = report::build_report(&generation, files, failures, dry_run);

    info!(
        written = report.files.len(),
        failed = report.failures.len(),
        degraded = report.units_degraded,
        skipped = report.units_skipped,
        "generation finished"
    );
    Ok(report)
}

/// Classify one annotation the same way manifest annotations are classified.
pub fn classify_annotation(text: &str) -> TypeDescriptor {
    propgen_annotation::classify(text)
}
