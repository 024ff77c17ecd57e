//! `propgen.toml` discovery and settings resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use propgen_config::{GenerateArgs, GlobalArgs};
use propgen_settings::{GenerateSettings, TomlConfig};

pub(crate) const CONFIG_FILE_NAME: &str = "propgen.toml";

/// The config file to load: `--config` if given, else `./propgen.toml` when it exists.
fn config_path(global: &GlobalArgs) -> Option<PathBuf> {
    match &global.config {
        Some(path) => Some(path.clone()),
        None => {
            let local = Path::new(CONFIG_FILE_NAME);
            local.is_file().then(|| local.to_path_buf())
        }
    }
}

/// Defaults, then `propgen.toml`, then command-line flags.
pub(crate) fn resolve_settings(global: &GlobalArgs, args: &GenerateArgs) -> Result<GenerateSettings> {
    let mut settings = match config_path(global) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            TomlConfig::from_file(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?
                .to_settings()
        }
        None => GenerateSettings::default(),
    };
    args.overlay(&mut settings);
    Ok(settings)
}
