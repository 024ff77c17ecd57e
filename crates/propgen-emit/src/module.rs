//! Rendering units and whole test modules.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use propgen_claims::claim;
use propgen_settings::{GenerateSettings, OutputGrouping};
use propgen_types::{
    ClaimKind, DiagnosticKind, GeneratedTestUnit, PrimitiveKind, Strategy, UnitStatus,
};

use crate::naming::{is_plain_import, local_name, module_alias, test_file_name};
use crate::render::{
    PLACEHOLDER_EXPR, comment_text, conformance_expr, py_str, strategy_expr,
    uses_optional_helper,
};

const INDENT: &str = "    ";

const BANNER: &str = "\
# Generated by propgen. Do not edit by hand; regenerate from the signature manifest.
# Lines marked \"# propgen: placeholder\" need a real strategy before the test is meaningful.
";

const OPTIONAL_HELPER: &str = "\
def _optional(inner, absent_percent):
    return st.integers(min_value=0, max_value=99).flatmap(
        lambda roll: st.none() if roll < absent_percent else inner
    )
";

/// Output file a unit is written to under the given grouping.
pub fn output_file_for(unit: &GeneratedTestUnit, settings: &GenerateSettings) -> String {
    match settings.grouping {
        OutputGrouping::PerFile => test_file_name(&unit.module_path, &unit.source_file),
        OutputGrouping::Combined => settings.combined_file_name.clone(),
    }
}

/// Render one unit as a standalone test, importing its module under the
/// default alias.
pub fn emit(unit: &GeneratedTestUnit, settings: &GenerateSettings) -> String {
    render_unit(unit, &module_alias(&unit.module_path), settings)
}

/// Render a full test module. `units` must already be in discovery order.
pub fn render_module(units: &[&GeneratedTestUnit], settings: &GenerateSettings) -> String {
    let aliases = assign_aliases(units);

    let mut out = String::from(BANNER);
    out.push('\n');
    out.push_str("import collections.abc as _abc\n");
    if aliases.keys().any(|path| !is_plain_import(path)) {
        out.push_str("import importlib\n");
    }
    out.push('\n');
    out.push_str("from hypothesis import given, settings, strategies as st\n");

    if !aliases.is_empty() {
        out.push('\n');
        for (path, alias) in &aliases {
            if is_plain_import(path) {
                let _ = writeln!(out, "import {path} as {alias}");
            } else {
                let _ = writeln!(out, "{alias} = importlib.import_module({})", py_str(path));
            }
        }
    }

    let needs_helper = units.iter().any(|u| {
        u.status != UnitStatus::Failed
            && u
                .parameter_strategies
                .iter()
                .any(|p| uses_optional_helper(&p.strategy))
    });
    if needs_helper {
        out.push_str("\n\n");
        out.push_str(OPTIONAL_HELPER);
    }

    for unit in units {
        let alias = aliases
            .get(&unit.module_path)
            .cloned()
            .unwrap_or_else(|| module_alias(&unit.module_path));
        out.push_str("\n\n");
        out.push_str(&render_unit(unit, &alias, settings));
    }
    out
}

/// Module path to alias, sorted by path; colliding aliases get a numeric suffix.
fn assign_aliases(units: &[&GeneratedTestUnit]) -> BTreeMap<String, String> {
    let paths: BTreeSet<&str> = units
        .iter()
        .filter(|u| u.status != UnitStatus::Failed)
        .map(|u| u.module_path.as_str())
        .collect();

    let mut used = BTreeSet::new();
    let mut aliases = BTreeMap::new();
    for path in paths {
        let base = module_alias(path);
        let mut alias = base.clone();
        let mut n = 2;
        while used.contains(&alias) {
            alias = format!("{base}_{n}");
            n += 1;
        }
        used.insert(alias.clone());
        aliases.insert(path.to_string(), alias);
    }
    aliases
}

/// Render one unit. `alias` is the name its module is imported under.
pub fn render_unit(unit: &GeneratedTestUnit, alias: &str, settings: &GenerateSettings) -> String {
    let mut out = String::new();

    if unit.status == UnitStatus::Failed {
        let _ = writeln!(
            out,
            "# propgen: generation failed for {} ({})",
            comment_text(&unit.target_name),
            comment_text(&unit.source_file)
        );
        for d in &unit.diagnostics {
            let _ = writeln!(out, "# propgen: {}: {}", d.kind, comment_text(&d.message));
        }
        return out;
    }

    let _ = writeln!(
        out,
        "# {} ({})",
        unit.target_name,
        comment_text(&unit.source_file)
    );

    // Local argument names, receiver first.
    let mut taken = BTreeSet::new();
    let receiver_local = unit.receiver.as_ref().map(|_| "receiver".to_string());
    let locals: Vec<String> = unit
        .parameter_strategies
        .iter()
        .map(|p| {
            let name = local_name(&p.name, &taken);
            taken.insert(name.clone());
            name
        })
        .collect();

    if let Some(Strategy::Placeholder { type_label, .. }) =
        unit.receiver.as_ref().map(|r| &r.strategy)
    {
        let _ = writeln!(
            out,
            "# propgen: placeholder receiver: {} (receiver); st.builds only fills annotated constructor arguments",
            comment_text(type_label)
        );
    }
    for p in &unit.parameter_strategies {
        for (label, reason) in p.strategy.placeholders() {
            let _ = writeln!(
                out,
                "# propgen: placeholder `{}`: {} ({}); replace {PLACEHOLDER_EXPR} with a real strategy",
                p.name,
                comment_text(label),
                reason.id()
            );
        }
    }
    for d in unit
        .diagnostics
        .iter()
        .filter(|d| d.kind != DiagnosticKind::UnresolvedType)
    {
        let _ = writeln!(out, "# propgen: {}: {}", d.kind, comment_text(&d.message));
    }
    if !unit.claims.is_empty() {
        let ids: Vec<&str> = unit.claims.iter().map(|c| c.id()).collect();
        let _ = writeln!(out, "# claims: {}", ids.join(", "));
    }

    let mut arguments: Vec<(String, String)> = Vec::new();
    if let (Some(local), Some(Strategy::Placeholder { type_label, .. })) = (
        &receiver_local,
        unit.receiver.as_ref().map(|r| &r.strategy),
    ) {
        arguments.push((local.clone(), format!("st.builds({alias}.{type_label})")));
    }
    for (p, local) in unit.parameter_strategies.iter().zip(&locals) {
        arguments.push((local.clone(), strategy_expr(&p.strategy)));
    }

    if !arguments.is_empty() {
        let _ = writeln!(out, "@settings(max_examples={})", settings.max_examples);
        out.push_str("@given(\n");
        for (name, expr) in &arguments {
            let _ = writeln!(out, "{INDENT}{name}={expr},");
        }
        out.push_str(")\n");
    }
    let names: Vec<&str> = arguments.iter().map(|(n, _)| n.as_str()).collect();
    let _ = writeln!(out, "def {}({}):", unit.test_name, names.join(", "));

    if unit.claims.is_empty() {
        let _ = writeln!(
            out,
            "{INDENT}# propgen: no property claim applies; fill in the placeholder strategies and add assertions"
        );
        let _ = writeln!(out, "{INDENT}pass");
        return out;
    }

    let callee = match &receiver_local {
        Some(local) => format!("{local}.{}", unit.callable),
        None => format!("{alias}.{}", unit.callable),
    };
    let target = py_str(&unit.target_name);

    // Absent branch first; it must not depend on the present-value call.
    if unit.has_claim(ClaimKind::RoundTripAbsentOnOptional) {
        let kind = ClaimKind::RoundTripAbsentOnOptional;
        let _ = writeln!(out, "{INDENT}# {}: {}", kind.id(), claim(kind).summary);
        let args: Vec<String> = unit
            .parameter_strategies
            .iter()
            .zip(&locals)
            .map(|(p, local)| {
                if p.declared.is_optional() {
                    "None".to_string()
                } else {
                    local.clone()
                }
            })
            .collect();
        let _ = writeln!(out, "{INDENT}{}", call_expr(&callee, &args));
    }

    let needs_result = unit.has_claim(ClaimKind::NoCrashOnValidInput)
        || unit.has_claim(ClaimKind::ReturnTypeConformance)
        || unit.has_claim(ClaimKind::Idempotence);
    if needs_result {
        if unit.has_claim(ClaimKind::NoCrashOnValidInput) {
            let kind = ClaimKind::NoCrashOnValidInput;
            let _ = writeln!(out, "{INDENT}# {}: {}", kind.id(), claim(kind).summary);
        }
        let _ = writeln!(out, "{INDENT}result = {}", call_expr(&callee, &locals));
    }

    for kind in &unit.claims {
        if matches!(
            kind,
            ClaimKind::NoCrashOnValidInput | ClaimKind::RoundTripAbsentOnOptional
        ) {
            continue;
        }
        let _ = writeln!(out, "{INDENT}# {}: {}", kind.id(), claim(*kind).summary);
        match kind {
            ClaimKind::ReturnTypeConformance => {
                let predicate = conformance_expr(&unit.return_type, "result", settings.max_depth);
                let _ = writeln!(
                    out,
                    "{INDENT}assert {predicate}, {target} + \" returned \" + repr(result) + \", expected \" + {}",
                    py_str(&unit.return_type.to_string())
                );
            }
            ClaimKind::Idempotence => {
                let _ = writeln!(out, "{INDENT}again = {}", call_expr(&callee, &["result".to_string()]));
                let equal = match unit.return_type.as_primitive() {
                    Some(PrimitiveKind::Float) => {
                        Some("again == result or (again != again and result != result)")
                    }
                    Some(_) => Some("again == result"),
                    None => None,
                };
                if let Some(equal) = equal {
                    let _ = writeln!(
                        out,
                        "{INDENT}assert {equal}, \"re-feeding \" + repr(result) + \" to \" + {target} + \" returned \" + repr(again)"
                    );
                }
            }
            ClaimKind::NoCrashOnValidInput | ClaimKind::RoundTripAbsentOnOptional => {}
        }
    }
    out
}

fn call_expr(callee: &str, args: &[String]) -> String {
    format!("{callee}({})", args.join(", "))
}
