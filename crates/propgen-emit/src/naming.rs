//! Identifiers, module paths, aliases and test names.

use std::collections::{BTreeMap, BTreeSet};

use propgen_types::{Diagnostic, DiagnosticKind, GeneratedTestUnit, SignatureModel, UnitStatus};

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Names a generated test body relies on; arguments are renamed around them.
const RESERVED_LOCALS: &[&str] = &[
    "result",
    "again",
    "receiver",
    "st",
    "given",
    "settings",
    "importlib",
    "isinstance",
    "repr",
    "type",
    "any",
    "all",
    "bool",
    "int",
    "float",
    "str",
    "bytes",
    "bytearray",
    "_optional",
    "_abc",
];

/// Fixed suffix appended to every derived test identifier.
pub const TEST_NAME_SUFFIX: &str = "_properties";

/// ASCII identifier that is not a keyword.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !KEYWORDS.contains(&s)
}

/// Map arbitrary text onto `[A-Za-z0-9_]`, never starting with a digit.
pub fn sanitize(s: &str) -> String {
    let mut out: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Dotted import path for a source file.
///
/// Backslashes are treated as separators, `strip_prefix` is removed when it
/// matches on a segment boundary, the extension is dropped and `__init__`
/// segments disappear. Returns an empty string when nothing importable is left.
pub fn module_path(file: &str, strip_prefix: Option<&str>) -> String {
    let normalized = file.replace('\\', "/");
    let mut rest = normalized.trim_start_matches("./");

    if let Some(prefix) = strip_prefix {
        let prefix = prefix.replace('\\', "/");
        let prefix = prefix.trim_start_matches("./").trim_end_matches('/');
        if !prefix.is_empty()
            && let Some(stripped) = rest.strip_prefix(prefix)
            && (stripped.is_empty() || stripped.starts_with('/'))
        {
            rest = stripped.trim_start_matches('/');
        }
    }

    let mut segments: Vec<&str> = rest
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if let Some(last) = segments.last_mut()
        && let Some((stem, _ext)) = last.rsplit_once('.')
        && !stem.is_empty()
    {
        *last = stem;
    }
    segments.retain(|s| *s != "__init__");
    segments.join(".")
}

/// True when `import <path> as alias` is valid for this module path.
pub fn is_plain_import(module_path: &str) -> bool {
    !module_path.is_empty() && module_path.split('.').all(is_identifier)
}

/// Default alias under which a module is imported by generated tests.
pub fn module_alias(module_path: &str) -> String {
    format!("_mod_{}", sanitize(&module_path.replace('.', "_")))
}

/// Stable per-file identifier used in output file names and collision suffixes.
pub fn file_identifier(module_path: &str, source_file: &str) -> String {
    let base = if module_path.is_empty() {
        source_file
    } else {
        module_path
    };
    sanitize(&base.replace('.', "_")).to_ascii_lowercase()
}

/// Output file name for a source file under per-file grouping.
pub fn test_file_name(module_path: &str, source_file: &str) -> String {
    format!("test_{}.py", file_identifier(module_path, source_file))
}

/// `test_<owner>_<name>_properties` before collision handling.
pub fn base_test_name(signature: &SignatureModel) -> String {
    match &signature.receiver {
        Some(owner) => format!(
            "test_{}_{}{TEST_NAME_SUFFIX}",
            owner.to_ascii_lowercase(),
            signature.name
        ),
        None => format!("test_{}{TEST_NAME_SUFFIX}", signature.name),
    }
}

/// Make every rendered test name unique across the batch.
///
/// Units must be in discovery order. A name shared by several units gets
/// `__<file identifier>` appended; any duplicate left after that gets a
/// numeric suffix. Each rename is recorded on the unit as `NameCollision`.
pub fn assign_test_names(units: &mut [GeneratedTestUnit]) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for unit in units.iter().filter(|u| u.status != UnitStatus::Failed) {
        *counts.entry(unit.test_name.clone()).or_default() += 1;
    }

    let mut taken: BTreeSet<String> = counts
        .iter()
        .filter(|(_, n)| **n == 1)
        .map(|(name, _)| name.clone())
        .collect();

    for unit in units.iter_mut().filter(|u| u.status != UnitStatus::Failed) {
        let shared_by = counts.get(&unit.test_name).copied().unwrap_or(0);
        if shared_by < 2 {
            continue;
        }
        let stem = format!(
            "{}__{}",
            unit.test_name,
            file_identifier(&unit.module_path, &unit.source_file)
        );
        let mut candidate = stem.clone();
        let mut n = 2;
        while taken.contains(&candidate) {
            candidate = format!("{stem}_{n}");
            n += 1;
        }
        taken.insert(candidate.clone());
        unit.diagnostics.push(Diagnostic::new(
            unit.target_name.clone(),
            unit.source_file.clone(),
            DiagnosticKind::NameCollision,
            format!(
                "test name `{}` is shared by {shared_by} callables; renamed to `{candidate}`",
                unit.test_name
            ),
        ));
        unit.test_name = candidate;
    }
}

/// A test-local argument name that shadows nothing the body uses.
pub fn local_name(name: &str, taken: &BTreeSet<String>) -> String {
    let mut candidate = if name.starts_with("_mod_") {
        format!("arg{name}")
    } else {
        name.to_string()
    };
    while RESERVED_LOCALS.contains(&candidate.as_str()) || taken.contains(&candidate) {
        candidate.push('_');
    }
    candidate
}
