//! # propgen-types
//!
//! **Tier 0 (Core Types)**
//!
//! This crate defines the core data structures and contracts for `propgen`.
//! It contains only data types, Serde definitions, and `SCHEMA_VERSION`.
//!
//! ## Stability Policy
//!
//! **JSON-first stability**: The primary contract is the JSON shape of the
//! signature manifest and the run report, not Rust struct literals.
//!
//! - **JSON consumers**: Stable. New fields have sensible defaults; removed/renamed fields
//!   bump `SCHEMA_VERSION`.
//! - **Rust library consumers**: Semi-stable. New fields may be added in minor versions.
//!
//! ## What belongs here
//! * Type descriptors and signature models
//! * Strategy specs, property claim identifiers, generated test units
//! * Diagnostics and run reports
//!
//! ## What does NOT belong here
//! * File I/O
//! * CLI argument parsing
//! * Resolution, selection or rendering logic

pub mod strategy;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use strategy::{FallbackReason, Strategy, StrategySpec};

/// The current schema version for manifests and run reports.
pub const SCHEMA_VERSION: u32 = 1;

// -----------------------------------------------------------------------------
// Type descriptors
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Integer,
    Float,
    Boolean,
    Text,
    Bytes,
}

impl PrimitiveKind {
    /// Python spelling used in labels and conformance messages.
    pub fn label(self) -> &'static str {
        match self {
            PrimitiveKind::Integer => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Boolean => "bool",
            PrimitiveKind::Text => "str",
            PrimitiveKind::Bytes => "bytes",
        }
    }
}

/// Container shapes. A mapping carries independent key and value descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    Sequence(Box<TypeDescriptor>),
    Set(Box<TypeDescriptor>),
    Mapping {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
}

/// Normalized representation of a declared type shape.
///
/// The tree is always finite: descriptors are plain owned values, so a
/// self-referential declaration can only reach us as a `Named` leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    Container(Container),
    Optional(Box<TypeDescriptor>),
    Union(Vec<TypeDescriptor>),
    Named(String),
    #[default]
    Unknown,
}

impl TypeDescriptor {
    pub fn integer() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Integer)
    }

    pub fn float() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Float)
    }

    pub fn boolean() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Boolean)
    }

    pub fn text() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Text)
    }

    pub fn bytes() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Bytes)
    }

    pub fn sequence_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::Container(Container::Sequence(Box::new(element)))
    }

    pub fn set_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::Container(Container::Set(Box::new(element)))
    }

    pub fn mapping_of(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Container(Container::Mapping {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Optional(Box::new(inner))
    }

    pub fn union(alternatives: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Union(alternatives)
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeDescriptor::Named(name.into())
    }

    /// `Named` and `Unknown` carry no structural knowledge.
    pub fn is_opaque(&self) -> bool {
        matches!(self, TypeDescriptor::Named(_) | TypeDescriptor::Unknown)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeDescriptor::Unknown)
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeDescriptor::Optional(_))
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            TypeDescriptor::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Number of composite levels (Container/Optional/Union) on the deepest path.
    pub fn depth(&self) -> usize {
        match self {
            TypeDescriptor::Primitive(_) | TypeDescriptor::Named(_) | TypeDescriptor::Unknown => 0,
            TypeDescriptor::Container(Container::Sequence(e))
            | TypeDescriptor::Container(Container::Set(e))
            | TypeDescriptor::Optional(e) => 1 + e.depth(),
            TypeDescriptor::Container(Container::Mapping { key, value }) => {
                1 + key.depth().max(value.depth())
            }
            TypeDescriptor::Union(alts) => 1 + alts.iter().map(|a| a.depth()).max().unwrap_or(0),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(kind) => f.write_str(kind.label()),
            TypeDescriptor::Container(Container::Sequence(e)) => write!(f, "list[{e}]"),
            TypeDescriptor::Container(Container::Set(e)) => write!(f, "set[{e}]"),
            TypeDescriptor::Container(Container::Mapping { key, value }) => {
                write!(f, "dict[{key}, {value}]")
            }
            TypeDescriptor::Optional(inner) => write!(f, "Optional[{inner}]"),
            TypeDescriptor::Union(alts) => {
                f.write_str("Union[")?;
                for (i, alt) in alts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{alt}")?;
                }
                f.write_str("]")
            }
            TypeDescriptor::Named(name) => f.write_str(name),
            TypeDescriptor::Unknown => f.write_str("<unknown>"),
        }
    }
}

// -----------------------------------------------------------------------------
// Signature model
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: TypeDescriptor,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A normalized description of one discovered callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureModel {
    pub name: String,
    /// Owning class for methods; the receiver is not part of `parameters`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub return_type: TypeDescriptor,
}

impl SignatureModel {
    pub fn function(
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        return_type: TypeDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            receiver: None,
            parameters,
            return_type,
        }
    }

    pub fn method(
        receiver: impl Into<String>,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        return_type: TypeDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            receiver: Some(receiver.into()),
            parameters,
            return_type,
        }
    }

    /// `Class.method` for methods, the bare name otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.receiver {
            Some(owner) => format!("{owner}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// A signature together with the file it was discovered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSignature {
    pub file: String,
    pub signature: SignatureModel,
}

// -----------------------------------------------------------------------------
// Property claims
// -----------------------------------------------------------------------------

/// Identifiers of the fixed property claim catalog, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    NoCrashOnValidInput,
    ReturnTypeConformance,
    Idempotence,
    RoundTripAbsentOnOptional,
}

impl ClaimKind {
    pub fn id(self) -> &'static str {
        match self {
            ClaimKind::NoCrashOnValidInput => "no_crash_on_valid_input",
            ClaimKind::ReturnTypeConformance => "return_type_conformance",
            ClaimKind::Idempotence => "idempotence",
            ClaimKind::RoundTripAbsentOnOptional => "round_trip_absent_on_optional",
        }
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// -----------------------------------------------------------------------------
// Diagnostics
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A descriptor could not be mapped to a concrete strategy.
    UnresolvedType,
    /// Nested type structure exceeded the configured depth cap.
    RecursionLimitExceeded,
    /// Two generated test identifiers collided and one was renamed.
    NameCollision,
    /// The signature was structurally invalid; no unit was emitted.
    MalformedSignature,
    /// A heuristic claim was selected; it may not hold for stateful callables.
    HeuristicClaim,
    /// No property claim applied; only a placeholder body was emitted.
    NoClaims,
    /// A set element could not be hashed; generation fell back to a sequence.
    DegradedSet,
    /// Generation failed unexpectedly; a diagnostic-only placeholder was emitted.
    UnitFailure,
}

impl DiagnosticKind {
    pub fn id(self) -> &'static str {
        match self {
            DiagnosticKind::UnresolvedType => "unresolved_type",
            DiagnosticKind::RecursionLimitExceeded => "recursion_limit_exceeded",
            DiagnosticKind::NameCollision => "name_collision",
            DiagnosticKind::MalformedSignature => "malformed_signature",
            DiagnosticKind::HeuristicClaim => "heuristic_claim",
            DiagnosticKind::NoClaims => "no_claims",
            DiagnosticKind::DegradedSet => "degraded_set",
            DiagnosticKind::UnitFailure => "unit_failure",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Qualified name of the callable the diagnostic is about.
    pub target: String,
    /// Originating source file identifier.
    pub file: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        target: impl Into<String>,
        file: impl Into<String>,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            file: file.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.kind, self.target, self.file, self.message
        )
    }
}

// -----------------------------------------------------------------------------
// Generated test units
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterStrategy {
    pub name: String,
    pub declared: TypeDescriptor,
    pub strategy: StrategySpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    /// Every parameter resolved and at least one claim applies.
    Complete,
    /// Placeholders were emitted or no claim applied.
    Degraded,
    /// Generation failed; only a diagnostic comment is emitted.
    Failed,
}

/// The complete, self-contained generated test for one callable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTestUnit {
    /// Position of the source signature in discovery order.
    pub ordinal: usize,
    pub target_name: String,
    pub callable: String,
    pub test_name: String,
    pub source_file: String,
    pub module_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<StrategySpec>,
    pub parameter_strategies: Vec<ParameterStrategy>,
    pub return_type: TypeDescriptor,
    pub claims: Vec<ClaimKind>,
    pub diagnostics: Vec<Diagnostic>,
    pub status: UnitStatus,
}

impl GeneratedTestUnit {
    pub fn has_claim(&self, claim: ClaimKind) -> bool {
        self.claims.contains(&claim)
    }

    pub fn has_placeholders(&self) -> bool {
        self.receiver.as_ref().is_some_and(|r| r.contains_fallback())
            || self
                .parameter_strategies
                .iter()
                .any(|p| p.strategy.contains_fallback())
    }
}

// -----------------------------------------------------------------------------
// Run report
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

impl Default for ToolInfo {
    fn default() -> Self {
        Self {
            name: "propgen".to_string(),
            version: "0.0.0".to_string(),
        }
    }
}

impl ToolInfo {
    pub fn current() -> Self {
        Self {
            name: "propgen".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Complete,
    Partial,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: String,
    pub units: usize,
    pub bytes: usize,
    /// blake3 hex digest of the file contents.
    pub blake3: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteFailure {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub schema_version: u32,
    pub tool: ToolInfo,
    pub status: RunStatus,
    pub dry_run: bool,
    pub files: Vec<WrittenFile>,
    pub failures: Vec<WriteFailure>,
    pub diagnostics: Vec<Diagnostic>,
    pub units_total: usize,
    pub units_degraded: usize,
    pub units_skipped: usize,
}
