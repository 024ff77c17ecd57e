//! Parallel fan-out over signatures, ordered fan-in, and module rendering.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, warn};

use propgen_emit::{
    Composition, assign_test_names, compose, failed_unit, module_path, output_file_for,
    render_module,
};
use propgen_settings::GenerateSettings;
use propgen_types::{Diagnostic, GeneratedTestUnit, SourceSignature, UnitStatus};

use crate::error::PropgenError;

/// One rendered output module, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// File name relative to the output directory.
    pub name: String,
    pub contents: String,
    pub units: usize,
}

/// Everything produced by a generation pass, before any disk I/O.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    /// Rendered modules sorted by file name.
    pub files: Vec<RenderedFile>,
    /// Every emitted unit in discovery order, with final test names.
    pub units: Vec<GeneratedTestUnit>,
    /// All diagnostics in discovery order.
    pub diagnostics: Vec<Diagnostic>,
    pub units_total: usize,
    pub units_degraded: usize,
    pub units_skipped: usize,
}

enum Outcome {
    Unit(GeneratedTestUnit),
    Skipped(Diagnostic),
}

/// Run resolution, selection and rendering for every signature.
///
/// The result depends only on `sources` and `settings`: units are computed
/// in parallel but gathered back by discovery index before naming and
/// rendering.
pub fn generate(sources: &[SourceSignature], settings: &GenerateSettings) -> Result<Generation> {
    settings.validate().map_err(PropgenError::from)?;

    let outcomes = if settings.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(settings.threads)
            .build()
            .map_err(PropgenError::internal)?;
        pool.install(|| fan_out(sources, settings))
    } else {
        fan_out(sources, settings)
    };

    let mut units = Vec::new();
    let mut skipped = Vec::new();
    for (ordinal, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Outcome::Unit(unit) => units.push(unit),
            Outcome::Skipped(diagnostic) => skipped.push((ordinal, diagnostic)),
        }
    }

    assign_test_names(&mut units);

    let mut ordered: Vec<(usize, Diagnostic)> = units
        .iter()
        .flat_map(|u| u.diagnostics.iter().cloned().map(move |d| (u.ordinal, d)))
        .chain(skipped.iter().cloned())
        .collect();
    ordered.sort_by_key(|(ordinal, _)| *ordinal);
    let diagnostics = ordered.into_iter().map(|(_, d)| d).collect();

    let mut groups: BTreeMap<String, Vec<&GeneratedTestUnit>> = BTreeMap::new();
    for unit in &units {
        groups
            .entry(output_file_for(unit, settings))
            .or_default()
            .push(unit);
    }
    let files = groups
        .into_iter()
        .map(|(name, members)| {
            debug!(file = %name, units = members.len(), "rendering module");
            RenderedFile {
                contents: render_module(&members, settings),
                units: members.len(),
                name,
            }
        })
        .collect();

    let units_degraded = units
        .iter()
        .filter(|u| u.status != UnitStatus::Complete)
        .count();

    Ok(Generation {
        files,
        units_total: sources.len(),
        units_degraded,
        units_skipped: skipped.len(),
        units,
        diagnostics,
    })
}

fn fan_out(sources: &[SourceSignature], settings: &GenerateSettings) -> Vec<Outcome> {
    sources
        .par_iter()
        .enumerate()
        .map(|(ordinal, source)| run_unit(ordinal, source, settings))
        .collect()
}

fn run_unit(ordinal: usize, source: &SourceSignature, settings: &GenerateSettings) -> Outcome {
    let module = module_path(&source.file, settings.strip_prefix.as_deref());
    let composed = catch_unwind(AssertUnwindSafe(|| {
        compose(ordinal, source, &module, settings)
    }));
    match composed {
        Ok(Composition::Unit(unit)) => {
            if unit.status == UnitStatus::Degraded {
                warn!(
                    callable = %unit.target_name,
                    file = %unit.source_file,
                    diagnostics = unit.diagnostics.len(),
                    "degraded unit"
                );
            }
            Outcome::Unit(*unit)
        }
        Ok(Composition::Skipped(diagnostic)) => {
            warn!(callable = %diagnostic.target, file = %diagnostic.file, "{}", diagnostic.message);
            Outcome::Skipped(diagnostic)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(callable = %source.signature.qualified_name(), file = %source.file, "unit failed: {message}");
            Outcome::Unit(failed_unit(ordinal, source, &module, &message))
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
