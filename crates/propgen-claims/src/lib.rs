//! # propgen-claims
//!
//! **Tier 2 (Property Selection)**
//!
//! A static catalog of generic property claims and the selector that filters
//! it for one signature. Selection looks only at the signature's shape:
//! parameter count, which parameters are opaque (`Named`/`Unknown`), which
//! are `Optional`, and whether the return type is declared.
//!
//! The receiver of a method is never counted as a parameter here.
//!
//! ## What belongs here
//! * The claim catalog, in render order
//! * Applicability predicates and selection notes
//!
//! ## What does NOT belong here
//! * Assertion rendering (see propgen-emit)
//! * Strategy resolution (see propgen-strategy)

use propgen_types::{ClaimKind, DiagnosticKind, SignatureModel};
use tracing::trace;

/// One entry of the fixed catalog.
#[derive(Debug, Clone, Copy)]
pub struct PropertyClaim {
    pub kind: ClaimKind,
    /// One-line description rendered next to the assertion block.
    pub summary: &'static str,
    /// Structural guess rather than a guaranteed property of the callable.
    pub heuristic: bool,
    predicate: fn(&SignatureModel) -> bool,
}

impl PropertyClaim {
    pub fn applies_to(&self, signature: &SignatureModel) -> bool {
        (self.predicate)(signature)
    }
}

static CATALOG: [PropertyClaim; 4] = [
    PropertyClaim {
        kind: ClaimKind::NoCrashOnValidInput,
        summary: "invocation completes without raising for well-typed inputs",
        heuristic: false,
        predicate: no_opaque_parameters,
    },
    PropertyClaim {
        kind: ClaimKind::ReturnTypeConformance,
        summary: "the returned value matches the declared return type",
        heuristic: false,
        predicate: declares_return_type,
    },
    PropertyClaim {
        kind: ClaimKind::Idempotence,
        summary: "re-feeding the output does not fail and yields an equal result (heuristic)",
        heuristic: true,
        predicate: single_parameter_matching_return,
    },
    PropertyClaim {
        kind: ClaimKind::RoundTripAbsentOnOptional,
        summary: "passing None for the optional parameter does not raise",
        heuristic: false,
        predicate: exactly_one_optional_parameter,
    },
];

/// The full catalog in render order.
pub fn catalog() -> &'static [PropertyClaim] {
    &CATALOG
}

/// Catalog entry for a claim kind.
pub fn claim(kind: ClaimKind) -> &'static PropertyClaim {
    // The catalog is indexed in `ClaimKind` declaration order.
    let index = match kind {
        ClaimKind::NoCrashOnValidInput => 0,
        ClaimKind::ReturnTypeConformance => 1,
        ClaimKind::Idempotence => 2,
        ClaimKind::RoundTripAbsentOnOptional => 3,
    };
    &CATALOG[index]
}

fn no_opaque_parameters(signature: &SignatureModel) -> bool {
    signature.parameters.iter().all(|p| !p.ty.is_opaque())
}

fn declares_return_type(signature: &SignatureModel) -> bool {
    !signature.return_type.is_unknown()
}

fn single_parameter_matching_return(signature: &SignatureModel) -> bool {
    match signature.parameters.as_slice() {
        [only] => only.ty == signature.return_type,
        _ => false,
    }
}

fn exactly_one_optional_parameter(signature: &SignatureModel) -> bool {
    signature
        .parameters
        .iter()
        .filter(|p| p.ty.is_optional())
        .count()
        == 1
}

/// A non-fatal observation made while selecting claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionNote {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Selected claims (catalog order) plus notes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub claims: Vec<ClaimKind>,
    pub notes: Vec<SelectionNote>,
}

impl Selection {
    pub fn contains(&self, kind: ClaimKind) -> bool {
        self.claims.contains(&kind)
    }
}

/// Filter the catalog for one signature. Deterministic; never random.
pub fn select(signature: &SignatureModel) -> Selection {
    let opaque: Vec<&str> = signature
        .parameters
        .iter()
        .filter(|p| p.ty.is_opaque())
        .map(|p| p.name.as_str())
        .collect();

    if !signature.parameters.is_empty() && opaque.len() == signature.parameters.len() {
        return Selection {
            claims: Vec::new(),
            notes: vec![SelectionNote {
                kind: DiagnosticKind::NoClaims,
                message: format!(
                    "every parameter ({}) lacks a concrete strategy; only a placeholder body was emitted",
                    opaque.join(", ")
                ),
            }],
        };
    }

    let mut selection = Selection::default();
    for entry in catalog() {
        if !entry.applies_to(signature) {
            continue;
        }
        trace!(callable = %signature.qualified_name(), claim = %entry.kind, "claim selected");
        selection.claims.push(entry.kind);
        if entry.heuristic {
            selection.notes.push(SelectionNote {
                kind: DiagnosticKind::HeuristicClaim,
                message: format!(
                    "`{}` was selected from signature shape alone; it may not hold for stateful callables",
                    entry.kind
                ),
            });
        }
    }

    if selection.claims.is_empty() {
        let reason = if opaque.is_empty() {
            "no catalog claim matches this signature shape".to_string()
        } else {
            format!(
                "parameters without a concrete strategy ({}) rule out the no-crash claim and no other claim applies",
                opaque.join(", ")
            )
        };
        selection.notes.push(SelectionNote {
            kind: DiagnosticKind::NoClaims,
            message: reason,
        });
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_lookup_matches_catalog_order() {
        for entry in catalog() {
            assert_eq!(claim(entry.kind).kind, entry.kind);
        }
    }

    #[test]
    fn only_idempotence_is_heuristic() {
        let heuristic: Vec<_> = catalog()
            .iter()
            .filter(|c| c.heuristic)
            .map(|c| c.kind)
            .collect();
        assert_eq!(heuristic, vec![ClaimKind::Idempotence]);
    }
}
