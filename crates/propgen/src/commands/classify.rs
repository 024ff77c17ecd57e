use anyhow::Result;
use propgen_config as cli;

use crate::Outcome;

pub(crate) fn handle(args: cli::ClassifyArgs) -> Result<Outcome> {
    let descriptor = propgen_core::classify_annotation(&args.annotation);
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    eprintln!("{descriptor}");
    Ok(Outcome::Success)
}
