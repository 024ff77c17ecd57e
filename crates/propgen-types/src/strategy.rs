//! Strategy specs: generative-value specifications derived per parameter.

use serde::{Deserialize, Serialize};

/// Why a strategy degraded to a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No annotation, or annotation text that could not be classified.
    Unannotated,
    /// A user-defined type known only by name.
    NamedType,
    /// The nesting depth cap was reached.
    RecursionLimit,
    /// A set element or mapping key whose values cannot be hashed.
    Unhashable,
    /// The structure itself was invalid (e.g. a union with no alternatives).
    Malformed,
    /// The receiver of a method; built from the owning class's constructor.
    Receiver,
}

impl FallbackReason {
    pub fn id(self) -> &'static str {
        match self {
            FallbackReason::Unannotated => "unannotated",
            FallbackReason::NamedType => "named_type",
            FallbackReason::RecursionLimit => "recursion_limit",
            FallbackReason::Unhashable => "unhashable",
            FallbackReason::Malformed => "malformed",
            FallbackReason::Receiver => "receiver",
        }
    }
}

/// Concrete generator shapes, mirroring the `TypeDescriptor` vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    Integers {
        min: i64,
        max: i64,
        sentinels: Vec<i64>,
    },
    Floats {
        allow_non_finite: bool,
        sentinels: Vec<f64>,
    },
    Booleans,
    Text {
        max_len: usize,
        sentinels: Vec<String>,
    },
    Bytes {
        max_len: usize,
    },
    Sequence {
        element: Box<StrategySpec>,
        min_len: usize,
        max_len: usize,
    },
    Set {
        element: Box<StrategySpec>,
        min_len: usize,
        max_len: usize,
    },
    Mapping {
        key: Box<StrategySpec>,
        value: Box<StrategySpec>,
        min_len: usize,
        max_len: usize,
    },
    Optional {
        inner: Box<StrategySpec>,
        /// Chance, in percent, that a draw yields the absent value.
        absent_percent: u8,
    },
    OneOf {
        alternatives: Vec<StrategySpec>,
    },
    /// No concrete generator; rendered as marked scaffolding.
    Placeholder {
        type_label: String,
        reason: FallbackReason,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySpec {
    #[serde(flatten)]
    pub strategy: Strategy,
    /// True when this node is a degraded placeholder with no real generator.
    pub fallback: bool,
}

impl StrategySpec {
    pub fn concrete(strategy: Strategy) -> Self {
        Self {
            strategy,
            fallback: false,
        }
    }

    pub fn placeholder(type_label: impl Into<String>, reason: FallbackReason) -> Self {
        Self {
            strategy: Strategy::Placeholder {
                type_label: type_label.into(),
                reason,
            },
            fallback: true,
        }
    }

    /// True if this node or any descendant is a placeholder.
    pub fn contains_fallback(&self) -> bool {
        if self.fallback {
            return true;
        }
        match &self.strategy {
            Strategy::Sequence { element, .. } | Strategy::Set { element, .. } => {
                element.contains_fallback()
            }
            Strategy::Mapping { key, value, .. } => {
                key.contains_fallback() || value.contains_fallback()
            }
            Strategy::Optional { inner, .. } => inner.contains_fallback(),
            Strategy::OneOf { alternatives } => alternatives.iter().any(|a| a.contains_fallback()),
            _ => false,
        }
    }

    /// Placeholder nodes in depth-first order.
    pub fn placeholders(&self) -> Vec<(&str, FallbackReason)> {
        let mut out = Vec::new();
        collect_placeholders(self, &mut out);
        out
    }
}

fn collect_placeholders<'a>(spec: &'a StrategySpec, out: &mut Vec<(&'a str, FallbackReason)>) {
    match &spec.strategy {
        Strategy::Placeholder { type_label, reason } => out.push((type_label.as_str(), *reason)),
        Strategy::Sequence { element, .. } | Strategy::Set { element, .. } => {
            collect_placeholders(element, out)
        }
        Strategy::Mapping { key, value, .. } => {
            collect_placeholders(key, out);
            collect_placeholders(value, out);
        }
        Strategy::Optional { inner, .. } => collect_placeholders(inner, out),
        Strategy::OneOf { alternatives } => {
            for alt in alternatives {
                collect_placeholders(alt, out);
            }
        }
        _ => {}
    }
}
