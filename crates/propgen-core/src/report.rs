//! Run report assembly and rendering.

use anyhow::Result;

use propgen_settings::ReportFormat;
use propgen_types::{RunReport, RunStatus, SCHEMA_VERSION, ToolInfo, WriteFailure, WrittenFile};

use crate::pipeline::Generation;

pub fn build_report(
    generation: &Generation,
    files: Vec<WrittenFile>,
    failures: Vec<WriteFailure>,
    dry_run: bool,
) -> RunReport {
    RunReport {
        schema_version: SCHEMA_VERSION,
        tool: ToolInfo::current(),
        status: if failures.is_empty() {
            RunStatus::Complete
        } else {
            RunStatus::Partial
        },
        dry_run,
        files,
        failures,
        diagnostics: generation.diagnostics.clone(),
        units_total: generation.units_total,
        units_degraded: generation.units_degraded,
        units_skipped: generation.units_skipped,
    }
}

pub fn render_report(report: &RunReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Md => Ok(render_md(report)),
        ReportFormat::Json => {
            let mut s = serde_json::to_string_pretty(report)?;
            s.push('\n');
            Ok(s)
        }
    }
}

fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

fn status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Complete => "complete",
        RunStatus::Partial => "partial",
    }
}

fn render_md(report: &RunReport) -> String {
    let mut s = String::new();

    s.push_str("# propgen run\n\n");
    s.push_str(&format!("- Status: {}\n", status_label(report.status)));
    if report.dry_run {
        s.push_str("- Dry run: nothing was written\n");
    }
    s.push_str(&format!(
        "- Units: {} total, {} degraded, {} skipped\n",
        report.units_total, report.units_degraded, report.units_skipped
    ));

    s.push_str("\n## Files\n\n");
    if report.files.is_empty() {
        s.push_str("No test modules generated.\n");
    } else {
        s.push_str("|Path|Units|Bytes|BLAKE3|\n");
        s.push_str("|---|---:|---:|---|\n");
        for f in &report.files {
            s.push_str(&format!(
                "|{}|{}|{}|{}|\n",
                cell(&f.path),
                f.units,
                f.bytes,
                &f.blake3[..f.blake3.len().min(16)]
            ));
        }
    }

    if !report.failures.is_empty() {
        s.push_str("\n## Write failures\n\n");
        s.push_str("|Path|Error|\n");
        s.push_str("|---|---|\n");
        for f in &report.failures {
            s.push_str(&format!("|{}|{}|\n", cell(&f.path), cell(&f.message)));
        }
    }

    if !report.diagnostics.is_empty() {
        s.push_str("\n## Diagnostics\n\n");
        s.push_str("|Kind|Target|File|Message|\n");
        s.push_str("|---|---|---|---|\n");
        for d in &report.diagnostics {
            s.push_str(&format!(
                "|{}|{}|{}|{}|\n",
                d.kind,
                cell(&d.target),
                cell(&d.file),
                cell(&d.message)
            ));
        }
    }

    s
}
