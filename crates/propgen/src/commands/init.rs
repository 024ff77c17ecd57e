use std::fs;

use anyhow::{Context, Result, bail};
use propgen_config as cli;
use propgen_settings::TOML_TEMPLATE;

use crate::Outcome;
use crate::config::CONFIG_FILE_NAME;

pub(crate) fn handle(args: cli::InitArgs) -> Result<Outcome> {
    if args.print {
        print!("{TOML_TEMPLATE}");
        return Ok(Outcome::Success);
    }

    let path = args.dir.join(CONFIG_FILE_NAME);
    if path.exists() && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }
    fs::create_dir_all(&args.dir)
        .with_context(|| format!("Failed to create {}", args.dir.display()))?;
    fs::write(&path, TOML_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Created {}", path.display());
    Ok(Outcome::Success)
}
