//! Composing a `GeneratedTestUnit` from one signature.

use std::collections::BTreeSet;

use propgen_claims::select;
use propgen_settings::GenerateSettings;
use propgen_strategy::resolve;
use propgen_types::{
    Container, Diagnostic, DiagnosticKind, FallbackReason, GeneratedTestUnit, ParameterStrategy,
    SourceSignature, StrategySpec, TypeDescriptor, UnitStatus,
};
use tracing::debug;

use crate::naming::{base_test_name, is_identifier};

/// Outcome of composing one signature.
#[derive(Debug, Clone, PartialEq)]
pub enum Composition {
    Unit(Box<GeneratedTestUnit>),
    /// Structurally invalid; nothing is emitted for it.
    Skipped(Diagnostic),
}

/// Resolve every parameter, select claims and collect diagnostics.
///
/// `module_path` is the dotted import path of `source.file`.
pub fn compose(
    ordinal: usize,
    source: &SourceSignature,
    module_path: &str,
    settings: &GenerateSettings,
) -> Composition {
    let signature = &source.signature;
    let target = signature.qualified_name();
    let diag = |kind: DiagnosticKind, message: String| {
        Diagnostic::new(target.clone(), source.file.clone(), kind, message)
    };

    if let Err(reason) = validate(source, module_path) {
        debug!(callable = %target, file = %source.file, "skipping malformed signature");
        return Composition::Skipped(diag(DiagnosticKind::MalformedSignature, reason));
    }

    let mut diagnostics = Vec::new();

    let receiver = signature.receiver.as_ref().map(|owner| {
        diagnostics.push(diag(
            DiagnosticKind::UnresolvedType,
            format!(
                "receiver `{owner}` is built with st.builds({owner}); supply constructor strategies if it takes arguments"
            ),
        ));
        StrategySpec::placeholder(owner.clone(), FallbackReason::Receiver)
    });

    let parameter_strategies = signature
        .parameters
        .iter()
        .map(|param| {
            let resolution = resolve(&param.ty, settings);
            for note in resolution.notes {
                diagnostics.push(diag(
                    note.kind,
                    format!("parameter `{}{}`: {}", param.name, note.path, note.message),
                ));
            }
            ParameterStrategy {
                name: param.name.clone(),
                declared: param.ty.clone(),
                strategy: resolution.spec,
            }
        })
        .collect::<Vec<_>>();

    let selection = select(signature);
    for note in selection.notes {
        diagnostics.push(diag(note.kind, note.message));
    }

    let mut unit = GeneratedTestUnit {
        ordinal,
        target_name: target.clone(),
        callable: signature.name.clone(),
        test_name: base_test_name(signature),
        source_file: source.file.clone(),
        module_path: module_path.to_string(),
        receiver,
        parameter_strategies,
        return_type: signature.return_type.clone(),
        claims: selection.claims,
        diagnostics,
        status: UnitStatus::Complete,
    };
    unit.status = status_of(&unit);
    debug!(callable = %target, status = ?unit.status, claims = unit.claims.len(), "composed unit");
    Composition::Unit(Box::new(unit))
}

/// Diagnostic-only unit standing in for one whose generation failed.
pub fn failed_unit(
    ordinal: usize,
    source: &SourceSignature,
    module_path: &str,
    message: &str,
) -> GeneratedTestUnit {
    let target = source.signature.qualified_name();
    GeneratedTestUnit {
        ordinal,
        target_name: target.clone(),
        callable: source.signature.name.clone(),
        test_name: base_test_name(&source.signature),
        source_file: source.file.clone(),
        module_path: module_path.to_string(),
        receiver: None,
        parameter_strategies: Vec::new(),
        return_type: source.signature.return_type.clone(),
        claims: Vec::new(),
        diagnostics: vec![Diagnostic::new(
            target,
            source.file.clone(),
            DiagnosticKind::UnitFailure,
            format!("generation failed: {message}"),
        )],
        status: UnitStatus::Failed,
    }
}

fn status_of(unit: &GeneratedTestUnit) -> UnitStatus {
    let degraded = unit.claims.is_empty()
        || unit.has_placeholders()
        || unit.diagnostics.iter().any(|d| {
            !matches!(
                d.kind,
                DiagnosticKind::HeuristicClaim | DiagnosticKind::NameCollision
            )
        });
    if degraded {
        UnitStatus::Degraded
    } else {
        UnitStatus::Complete
    }
}

fn validate(source: &SourceSignature, module_path: &str) -> Result<(), String> {
    let signature = &source.signature;
    if module_path.is_empty() {
        return Err(format!(
            "no importable module path can be derived from `{}`",
            source.file
        ));
    }
    if !is_identifier(&signature.name) {
        return Err(format!("`{}` is not a valid identifier", signature.name));
    }
    if let Some(owner) = &signature.receiver
        && !is_identifier(owner)
    {
        return Err(format!("class name `{owner}` is not a valid identifier"));
    }

    let mut seen = BTreeSet::new();
    for param in &signature.parameters {
        if !is_identifier(&param.name) {
            return Err(format!("parameter name `{}` is not a valid identifier", param.name));
        }
        if !seen.insert(param.name.as_str()) {
            return Err(format!("duplicate parameter name `{}`", param.name));
        }
        if has_empty_union(&param.ty) {
            return Err(format!(
                "parameter `{}` declares a union with no alternatives",
                param.name
            ));
        }
    }
    if has_empty_union(&signature.return_type) {
        return Err("return type declares a union with no alternatives".to_string());
    }
    Ok(())
}

fn has_empty_union(descriptor: &TypeDescriptor) -> bool {
    match descriptor {
        TypeDescriptor::Union(alts) => alts.is_empty() || alts.iter().any(has_empty_union),
        TypeDescriptor::Container(Container::Sequence(e))
        | TypeDescriptor::Container(Container::Set(e))
        | TypeDescriptor::Optional(e) => has_empty_union(e),
        TypeDescriptor::Container(Container::Mapping { key, value }) => {
            has_empty_union(key) || has_empty_union(value)
        }
        TypeDescriptor::Primitive(_) | TypeDescriptor::Named(_) | TypeDescriptor::Unknown => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propgen_types::{Parameter, SignatureModel};

    fn source(sig: SignatureModel) -> SourceSignature {
        SourceSignature {
            file: "pkg/calc.py".to_string(),
            signature: sig,
        }
    }

    #[test]
    fn nested_empty_union_is_detected() {
        let d = TypeDescriptor::sequence_of(TypeDescriptor::union(vec![]));
        assert!(has_empty_union(&d));
        assert!(!has_empty_union(&TypeDescriptor::integer()));
    }

    #[test]
    fn keyword_parameter_is_malformed() {
        let sig = SignatureModel::function(
            "f",
            vec![Parameter::new("lambda", TypeDescriptor::integer())],
            TypeDescriptor::Unknown,
        );
        assert!(validate(&source(sig), "pkg.calc").is_err());
    }

    #[test]
    fn failed_unit_carries_one_failure_diagnostic() {
        let sig = SignatureModel::function("f", vec![], TypeDescriptor::Unknown);
        let unit = failed_unit(3, &source(sig), "pkg.calc", "boom");
        assert_eq!(unit.status, UnitStatus::Failed);
        assert_eq!(unit.diagnostics.len(), 1);
        assert_eq!(unit.diagnostics[0].kind, DiagnosticKind::UnitFailure);
    }
}
