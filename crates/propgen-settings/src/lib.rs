//! # propgen-settings
//!
//! **Tier 0 (Pure Settings)**
//!
//! Clap-free settings for the generation pipeline. These are static
//! configuration: built once at the start of a run, validated, and then
//! shared read-only by every unit of work.
//!
//! ## What belongs here
//! * Pure data types with Serde derive
//! * Default values and validation
//! * `propgen.toml` parsing and layering onto defaults
//!
//! ## What does NOT belong here
//! * Clap parsing (use propgen-config)
//! * Business logic

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Hard upper bound for the configurable nesting cap.
pub const MAX_DEPTH_LIMIT: usize = 32;

/// Hard upper bound for generated container lengths.
pub const MAX_COLLECTION_LEN_LIMIT: usize = 10_000;

/// Hard upper bound for explicit worker thread counts.
pub const MAX_THREADS_LIMIT: usize = 1024;

/// How non-finite floats are treated by float strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum FloatMode {
    /// Finite values only. NaN and infinities are excluded.
    #[default]
    Finite,
    /// Also draw NaN, +inf and -inf.
    Extended,
}

/// How generated units are grouped into output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum OutputGrouping {
    /// One test module per source file.
    #[default]
    PerFile,
    /// A single combined test module.
    Combined,
}

/// Run report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// Markdown summary with tables.
    #[default]
    Md,
    /// Pretty-printed JSON run report.
    Json,
}

/// Settings consumed by resolution, selection, emission and batching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSettings {
    /// Maximum composite nesting resolved before degrading to a placeholder.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Non-finite float inclusion.
    #[serde(default)]
    pub float_mode: FloatMode,

    /// Upper bound for generated sequence, set, mapping, text and byte lengths.
    #[serde(default = "default_max_collection_len")]
    pub max_collection_len: usize,

    /// Output grouping policy.
    #[serde(default)]
    pub grouping: OutputGrouping,

    /// Chance, in percent, that an optional parameter is drawn absent.
    #[serde(default = "default_absent_percent")]
    pub absent_percent: u8,

    /// Hypothesis `max_examples` for every generated test.
    #[serde(default = "default_max_examples")]
    pub max_examples: u32,

    /// File name used when `grouping` is `combined`.
    #[serde(default = "default_combined_file_name")]
    pub combined_file_name: String,

    /// Prefix stripped from source paths before deriving module paths.
    #[serde(default)]
    pub strip_prefix: Option<String>,

    /// Worker threads for the batch (0 = one per core).
    #[serde(default)]
    pub threads: usize,
}

fn default_max_depth() -> usize {
    5
}

fn default_max_collection_len() -> usize {
    100
}

fn default_absent_percent() -> u8 {
    25
}

fn default_max_examples() -> u32 {
    100
}

fn default_combined_file_name() -> String {
    "test_properties.py".to_string()
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            float_mode: FloatMode::Finite,
            max_collection_len: default_max_collection_len(),
            grouping: OutputGrouping::PerFile,
            absent_percent: default_absent_percent(),
            max_examples: default_max_examples(),
            combined_file_name: default_combined_file_name(),
            strip_prefix: None,
            threads: 0,
        }
    }
}

/// A rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid setting `{field}`: {message}")]
pub struct SettingsError {
    pub field: &'static str,
    pub message: String,
}

impl SettingsError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl GenerateSettings {
    /// Reject values that would make generation meaningless or unbounded.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            return Err(SettingsError::new(
                "max_depth",
                format!(
                    "must be between 1 and {MAX_DEPTH_LIMIT}, got {}",
                    self.max_depth
                ),
            ));
        }
        if self.max_collection_len == 0 || self.max_collection_len > MAX_COLLECTION_LEN_LIMIT {
            return Err(SettingsError::new(
                "max_collection_len",
                format!(
                    "must be between 1 and {MAX_COLLECTION_LEN_LIMIT}, got {}",
                    self.max_collection_len
                ),
            ));
        }
        if !(1..=99).contains(&self.absent_percent) {
            return Err(SettingsError::new(
                "absent_percent",
                format!("must be between 1 and 99, got {}", self.absent_percent),
            ));
        }
        if self.max_examples == 0 {
            return Err(SettingsError::new("max_examples", "must be at least 1"));
        }
        if self.threads > MAX_THREADS_LIMIT {
            return Err(SettingsError::new(
                "threads",
                format!("must be at most {MAX_THREADS_LIMIT}, got {}", self.threads),
            ));
        }
        if !is_python_module_file_name(&self.combined_file_name) {
            return Err(SettingsError::new(
                "combined_file_name",
                format!(
                    "must be a bare `*.py` file name with an identifier stem, got {:?}",
                    self.combined_file_name
                ),
            ));
        }
        Ok(())
    }

    /// Layer values from a parsed `[generate]` table over these settings.
    pub fn apply_toml(&mut self, toml: &GenerateToml) {
        if let Some(v) = toml.max_depth {
            self.max_depth = v;
        }
        if let Some(v) = toml.float_mode {
            self.float_mode = v;
        }
        if let Some(v) = toml.max_collection_len {
            self.max_collection_len = v;
        }
        if let Some(v) = toml.grouping {
            self.grouping = v;
        }
        if let Some(v) = toml.absent_percent {
            self.absent_percent = v;
        }
        if let Some(v) = toml.max_examples {
            self.max_examples = v;
        }
        if let Some(v) = &toml.combined_file_name {
            self.combined_file_name = v.clone();
        }
        if let Some(v) = &toml.strip_prefix {
            self.strip_prefix = Some(v.clone());
        }
        if let Some(v) = toml.threads {
            self.threads = v;
        }
    }
}

fn is_python_module_file_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".py") else {
        return false;
    };
    let mut chars = stem.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// =============================================================================
// propgen.toml
// =============================================================================

/// Root of a `propgen.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub generate: GenerateToml,
}

/// The `[generate]` table. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateToml {
    pub max_depth: Option<usize>,
    pub float_mode: Option<FloatMode>,
    pub max_collection_len: Option<usize>,
    pub grouping: Option<OutputGrouping>,
    pub absent_percent: Option<u8>,
    pub max_examples: Option<u32>,
    pub combined_file_name: Option<String>,
    pub strip_prefix: Option<String>,
    pub threads: Option<usize>,
}

impl TomlConfig {
    /// Load configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load configuration from a file path.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Defaults with this file's values layered on top.
    pub fn to_settings(&self) -> GenerateSettings {
        let mut settings = GenerateSettings::default();
        settings.apply_toml(&self.generate);
        settings
    }
}

/// Template written by `propgen init`.
pub const TOML_TEMPLATE: &str = r#"# propgen.toml
# Every key is optional; CLI flags override values set here.

[generate]
# Composite nesting resolved before a subtree degrades to a placeholder.
max_depth = 5

# "finite" excludes NaN and infinities; "extended" includes them.
float_mode = "finite"

# Upper bound for generated collection, text and byte lengths (minimum is always 0).
max_collection_len = 100

# "per-file" writes one test module per source file; "combined" writes one module.
grouping = "per-file"
combined_file_name = "test_properties.py"

# Chance, in percent, that an Optional parameter is drawn as None.
absent_percent = 25

# Hypothesis examples per generated test.
max_examples = 100

# Worker threads; 0 uses one per core.
threads = 0

# Prefix removed from source paths before deriving import paths.
# strip_prefix = "src"
"#;
