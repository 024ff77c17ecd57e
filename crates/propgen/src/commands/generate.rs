use std::io::Write;

use anyhow::{Context, Result, bail};
use propgen_config as cli;
use propgen_core::{generate_workflow, manifest::Manifest, report::render_report};
use propgen_types::RunStatus;

use crate::Outcome;
use crate::config::resolve_settings;

pub(crate) fn handle(args: cli::GenerateArgs, global: &cli::GlobalArgs) -> Result<Outcome> {
    let Some(manifest_path) = &args.manifest else {
        bail!("no manifest given; pass the path to a signature manifest (JSON)");
    };

    let settings = resolve_settings(global, &args)?;
    let manifest = Manifest::from_file(manifest_path)?;
    let report = generate_workflow(&manifest, &settings, &args.output, args.dry_run)?;

    let rendered = render_report(&report, args.format)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("failed to write report to stdout")?;

    Ok(match report.status {
        RunStatus::Complete => Outcome::Success,
        RunStatus::Partial => Outcome::Partial,
    })
}
