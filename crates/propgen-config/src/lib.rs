//! # propgen-config
//!
//! **Tier 4 (Configuration)**
//!
//! This crate defines the CLI arguments and how they layer over
//! `propgen.toml` values.
//!
//! ## What belongs here
//! * Clap `Parser`, `Args`, `Subcommand` structs
//! * Overlaying CLI flags onto `GenerateSettings`
//!
//! ## What does NOT belong here
//! * Business logic
//! * I/O operations
//! * Settings defaults and TOML schemas (see propgen-settings)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

pub use propgen_settings::{FloatMode, GenerateSettings, OutputGrouping, ReportFormat};

/// `propgen` generates Hypothesis property tests from a signature manifest.
///
/// Default mode (no subcommand) runs `generate`.
#[derive(Parser, Debug)]
#[command(name = "propgen", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Options for the implicit `generate` mode (when no subcommand is provided).
    #[command(flatten)]
    pub generate: GenerateArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Verbose logging (repeat for more detail). `RUST_LOG` takes precedence.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Path to a `propgen.toml`. Defaults to `./propgen.toml` when present.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate property tests from a signature manifest (default).
    Generate(GenerateArgs),

    /// Print the type descriptor an annotation classifies to, as JSON.
    Classify(ClassifyArgs),

    /// Write a template `propgen.toml`.
    Init(InitArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Signature manifest (JSON) produced by the source analyzer.
    #[arg(value_name = "MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Directory the generated test modules are written to.
    #[arg(long, short = 'o', value_name = "DIR", default_value = "tests/generated")]
    pub output: PathBuf,

    /// Composite nesting resolved before degrading to a placeholder.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Non-finite float handling.
    #[arg(long, value_enum)]
    pub float_mode: Option<FloatMode>,

    /// Upper bound for generated collection, text and byte lengths.
    #[arg(long, value_name = "N")]
    pub max_collection_len: Option<usize>,

    /// One module per source file, or a single combined module.
    #[arg(long, value_enum)]
    pub grouping: Option<OutputGrouping>,

    /// Chance, in percent, that an optional parameter is drawn as None.
    #[arg(long, value_name = "PERCENT")]
    pub absent_percent: Option<u8>,

    /// Hypothesis examples per generated test.
    #[arg(long, value_name = "N")]
    pub max_examples: Option<u32>,

    /// File name used with `--grouping combined`.
    #[arg(long, value_name = "NAME")]
    pub combined_file_name: Option<String>,

    /// Prefix removed from source paths before deriving import paths.
    #[arg(long, value_name = "PREFIX")]
    pub strip_prefix: Option<String>,

    /// Worker threads (0 = one per core).
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Run report format on stdout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Md)]
    pub format: ReportFormat,

    /// Render everything and print the report, but write nothing.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// Annotation text, e.g. `dict[str, list[int]]`.
    #[arg(value_name = "ANNOTATION")]
    pub annotation: String,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Target directory (defaults to ".").
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite an existing `propgen.toml`.
    #[arg(long)]
    pub force: bool,

    /// Print the template to stdout instead of writing a file.
    #[arg(long)]
    pub print: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    pub fn is_json(self) -> bool {
        matches!(self, LogFormat::Json)
    }
}

impl GenerateArgs {
    /// Layer explicitly given flags over `settings`; unset flags keep the
    /// file or default value.
    pub fn overlay(&self, settings: &mut GenerateSettings) {
        if let Some(v) = self.max_depth {
            settings.max_depth = v;
        }
        if let Some(v) = self.float_mode {
            settings.float_mode = v;
        }
        if let Some(v) = self.max_collection_len {
            settings.max_collection_len = v;
        }
        if let Some(v) = self.grouping {
            settings.grouping = v;
        }
        if let Some(v) = self.absent_percent {
            settings.absent_percent = v;
        }
        if let Some(v) = self.max_examples {
            settings.max_examples = v;
        }
        if let Some(v) = &self.combined_file_name {
            settings.combined_file_name = v.clone();
        }
        if let Some(v) = &self.strip_prefix {
            settings.strip_prefix = Some(v.clone());
        }
        if let Some(v) = self.threads {
            settings.threads = v;
        }
    }
}
