//! # propgen-strategy
//!
//! **Tier 2 (Strategy Resolution)**
//!
//! Pure mapping from a `TypeDescriptor` to a `StrategySpec`.
//!
//! Every primitive strategy carries explicit boundary sentinels so edge cases
//! are drawn often, not only when the random search stumbles onto them.
//! Containers always admit the empty value. `Named` and `Unknown`
//! descriptors never get a guessed generator: they resolve to a placeholder
//! marked `fallback = true`, and a note records why.
//!
//! Termination is guaranteed by a depth counter rather than cycle
//! detection: a composite node reached at `settings.max_depth` resolves to a
//! placeholder instead of recursing further.
//!
//! ## What belongs here
//! * Descriptor to strategy mapping and its fallback policy
//! * Hashability checks for set elements and mapping keys
//!
//! ## What does NOT belong here
//! * Rendering strategies as source text (see propgen-emit)
//! * Property selection (see propgen-claims)

use propgen_settings::{FloatMode, GenerateSettings};
use propgen_types::{
    Container, DiagnosticKind, FallbackReason, Strategy, StrategySpec, TypeDescriptor,
};
use tracing::debug;

/// Signed 64-bit bounds used for integer strategies.
pub const INTEGER_MIN: i64 = i64::MIN;
pub const INTEGER_MAX: i64 = i64::MAX;

/// Integers always drawn with elevated frequency.
pub const INTEGER_SENTINELS: [i64; 5] = [0, -1, 1, INTEGER_MIN, INTEGER_MAX];

/// Finite floats always drawn with elevated frequency.
pub const FLOAT_SENTINELS: [f64; 7] = [
    0.0,
    -0.0,
    -1.0,
    1.0,
    f64::MIN_POSITIVE,
    f64::MAX,
    f64::MIN,
];

/// Text always drawn with elevated frequency: empty, whitespace, non-ASCII,
/// astral-plane, NUL and a combining sequence.
pub const TEXT_SENTINELS: [&str; 7] = [
    "",
    " ",
    "\u{e9}",
    "\u{65e5}\u{672c}\u{8a9e}",
    "\u{1f980}",
    "\u{0}",
    "e\u{301}",
];

/// A non-fatal event recorded while resolving one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionNote {
    pub kind: DiagnosticKind,
    /// Location inside the descriptor, e.g. `` (root) or `[element][key]`.
    pub path: String,
    pub message: String,
}

/// A resolved strategy plus the notes produced on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub spec: StrategySpec,
    pub notes: Vec<ResolutionNote>,
}

/// Resolve a descriptor starting at the root (depth 0).
pub fn resolve(descriptor: &TypeDescriptor, settings: &GenerateSettings) -> Resolution {
    resolve_from(descriptor, 0, settings)
}

/// Resolve a descriptor as if it were nested `recursion_depth` levels deep.
pub fn resolve_from(
    descriptor: &TypeDescriptor,
    recursion_depth: usize,
    settings: &GenerateSettings,
) -> Resolution {
    let mut resolver = Resolver {
        settings,
        notes: Vec::new(),
    };
    let spec = resolver.resolve(descriptor, recursion_depth, "");
    Resolution {
        spec,
        notes: resolver.notes,
    }
}

/// Whether every value the strategy can draw is hashable.
///
/// Placeholders are never hashable: nothing is known about their values.
pub fn is_hashable(spec: &StrategySpec) -> bool {
    if spec.fallback {
        return false;
    }
    match &spec.strategy {
        Strategy::Integers { .. }
        | Strategy::Floats { .. }
        | Strategy::Booleans
        | Strategy::Text { .. }
        | Strategy::Bytes { .. } => true,
        Strategy::Optional { inner, .. } => is_hashable(inner),
        Strategy::OneOf { alternatives } => alternatives.iter().all(is_hashable),
        Strategy::Sequence { .. }
        | Strategy::Set { .. }
        | Strategy::Mapping { .. }
        | Strategy::Placeholder { .. } => false,
    }
}

/// One-level label for a composite, safe for arbitrarily deep trees.
fn shallow_label(descriptor: &TypeDescriptor) -> String {
    match descriptor {
        TypeDescriptor::Container(Container::Sequence(_)) => "list[...]".to_string(),
        TypeDescriptor::Container(Container::Set(_)) => "set[...]".to_string(),
        TypeDescriptor::Container(Container::Mapping { .. }) => "dict[...]".to_string(),
        TypeDescriptor::Optional(_) => "Optional[...]".to_string(),
        TypeDescriptor::Union(_) => "Union[...]".to_string(),
        other => other.to_string(),
    }
}

struct Resolver<'a> {
    settings: &'a GenerateSettings,
    notes: Vec<ResolutionNote>,
}

impl Resolver<'_> {
    fn note(&mut self, kind: DiagnosticKind, path: &str, message: String) {
        debug!(kind = %kind, path, "{message}");
        self.notes.push(ResolutionNote {
            kind,
            path: path.to_string(),
            message,
        });
    }

    fn resolve(&mut self, descriptor: &TypeDescriptor, depth: usize, path: &str) -> StrategySpec {
        let composite = matches!(
            descriptor,
            TypeDescriptor::Container(_) | TypeDescriptor::Optional(_) | TypeDescriptor::Union(_)
        );
        if composite && depth >= self.settings.max_depth {
            let label = shallow_label(descriptor);
            self.note(
                DiagnosticKind::RecursionLimitExceeded,
                path,
                format!(
                    "`{label}` is nested deeper than max_depth {}; subtree replaced by a placeholder",
                    self.settings.max_depth
                ),
            );
            return StrategySpec::placeholder(label, FallbackReason::RecursionLimit);
        }

        let max_len = self.settings.max_collection_len;
        match descriptor {
            TypeDescriptor::Primitive(kind) => self.primitive(*kind),

            TypeDescriptor::Container(Container::Sequence(element)) => {
                let element = self.resolve(element, depth + 1, &format!("{path}[element]"));
                StrategySpec::concrete(Strategy::Sequence {
                    element: Box::new(element),
                    min_len: 0,
                    max_len,
                })
            }

            TypeDescriptor::Container(Container::Set(element)) => {
                let element = self.resolve(element, depth + 1, &format!("{path}[element]"));
                if is_hashable(&element) {
                    StrategySpec::concrete(Strategy::Set {
                        element: Box::new(element),
                        min_len: 0,
                        max_len,
                    })
                } else {
                    self.note(
                        DiagnosticKind::DegradedSet,
                        path,
                        "set elements cannot be guaranteed hashable; generating a list and omitting set-specific properties"
                            .to_string(),
                    );
                    StrategySpec::concrete(Strategy::Sequence {
                        element: Box::new(element),
                        min_len: 0,
                        max_len,
                    })
                }
            }

            TypeDescriptor::Container(Container::Mapping { key, value }) => {
                let key_path = format!("{path}[key]");
                let mut key_spec = self.resolve(key, depth + 1, &key_path);
                if !key_spec.fallback && !is_hashable(&key_spec) {
                    let label = shallow_label(key);
                    self.note(
                        DiagnosticKind::UnresolvedType,
                        &key_path,
                        format!("mapping keys of type `{label}` are not hashable"),
                    );
                    key_spec = StrategySpec::placeholder(label, FallbackReason::Unhashable);
                }
                let value_spec = self.resolve(value, depth + 1, &format!("{path}[value]"));
                StrategySpec::concrete(Strategy::Mapping {
                    key: Box::new(key_spec),
                    value: Box::new(value_spec),
                    min_len: 0,
                    max_len,
                })
            }

            TypeDescriptor::Optional(inner) => {
                // Optional[Optional[T]] draws the same values as Optional[T].
                let mut inner = inner.as_ref();
                let mut inner_depth = depth + 1;
                while let TypeDescriptor::Optional(next) = inner {
                    if inner_depth >= self.settings.max_depth {
                        break;
                    }
                    inner = next.as_ref();
                    inner_depth += 1;
                }
                let inner = self.resolve(inner, inner_depth, &format!("{path}[present]"));
                StrategySpec::concrete(Strategy::Optional {
                    inner: Box::new(inner),
                    absent_percent: self.settings.absent_percent,
                })
            }

            TypeDescriptor::Union(alternatives) => match alternatives.as_slice() {
                [] => {
                    self.note(
                        DiagnosticKind::UnresolvedType,
                        path,
                        "union has no alternatives".to_string(),
                    );
                    StrategySpec::placeholder("Union[]", FallbackReason::Malformed)
                }
                [only] => self.resolve(only, depth + 1, path),
                alternatives => {
                    let alternatives = alternatives
                        .iter()
                        .enumerate()
                        .map(|(i, alt)| self.resolve(alt, depth + 1, &format!("{path}[alt {i}]")))
                        .collect();
                    StrategySpec::concrete(Strategy::OneOf { alternatives })
                }
            },

            TypeDescriptor::Named(name) => {
                self.note(
                    DiagnosticKind::UnresolvedType,
                    path,
                    format!("`{name}` is a user-defined type known only by name"),
                );
                StrategySpec::placeholder(name.clone(), FallbackReason::NamedType)
            }

            TypeDescriptor::Unknown => {
                self.note(
                    DiagnosticKind::UnresolvedType,
                    path,
                    "no usable type annotation".to_string(),
                );
                StrategySpec::placeholder("<unknown>", FallbackReason::Unannotated)
            }
        }
    }

    fn primitive(&self, kind: propgen_types::PrimitiveKind) -> StrategySpec {
        use propgen_types::PrimitiveKind as P;

        let max_len = self.settings.max_collection_len;
        let strategy = match kind {
            P::Integer => Strategy::Integers {
                min: INTEGER_MIN,
                max: INTEGER_MAX,
                sentinels: INTEGER_SENTINELS.to_vec(),
            },
            P::Float => {
                let mut sentinels = FLOAT_SENTINELS.to_vec();
                let allow_non_finite = self.settings.float_mode == FloatMode::Extended;
                if allow_non_finite {
                    sentinels.extend([f64::NAN, f64::INFINITY, f64::NEG_INFINITY]);
                }
                Strategy::Floats {
                    allow_non_finite,
                    sentinels,
                }
            }
            P::Boolean => Strategy::Booleans,
            P::Text => Strategy::Text {
                max_len,
                sentinels: TEXT_SENTINELS.iter().map(|s| s.to_string()).collect(),
            },
            P::Bytes => Strategy::Bytes { max_len },
        };
        StrategySpec::concrete(strategy)
    }
}
