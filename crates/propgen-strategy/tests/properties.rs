//! Property-based tests for strategy resolution.
//!
//! Resolution must terminate on any finite descriptor, never exceed the
//! configured depth, and always admit the empty container.

use proptest::prelude::*;
use propgen_settings::GenerateSettings;
use propgen_strategy::{is_hashable, resolve};
use propgen_types::{DiagnosticKind, FallbackReason, Strategy as Spec, StrategySpec, TypeDescriptor};

fn arb_leaf() -> impl Strategy<Value = TypeDescriptor> {
    prop_oneof![
        Just(TypeDescriptor::integer()),
        Just(TypeDescriptor::float()),
        Just(TypeDescriptor::boolean()),
        Just(TypeDescriptor::text()),
        Just(TypeDescriptor::bytes()),
        Just(TypeDescriptor::Unknown),
        "[A-Z][a-zA-Z]{0,8}".prop_map(TypeDescriptor::named),
    ]
}

fn arb_descriptor() -> impl Strategy<Value = TypeDescriptor> {
    arb_leaf().prop_recursive(12, 96, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(TypeDescriptor::sequence_of),
            inner.clone().prop_map(TypeDescriptor::set_of),
            (inner.clone(), inner.clone()).prop_map(|(k, v)| TypeDescriptor::mapping_of(k, v)),
            inner.clone().prop_map(TypeDescriptor::optional),
            prop::collection::vec(inner, 0..4).prop_map(TypeDescriptor::union),
        ]
    })
}

/// Composite levels on the deepest path of a resolved strategy.
fn spec_depth(spec: &StrategySpec) -> usize {
    match &spec.strategy {
        Spec::Sequence { element, .. } | Spec::Set { element, .. } => 1 + spec_depth(element),
        Spec::Mapping { key, value, .. } => 1 + spec_depth(key).max(spec_depth(value)),
        Spec::Optional { inner, .. } => 1 + spec_depth(inner),
        Spec::OneOf { alternatives } => 1 + alternatives.iter().map(spec_depth).max().unwrap_or(0),
        _ => 0,
    }
}

fn all_containers_admit_empty(spec: &StrategySpec) -> bool {
    match &spec.strategy {
        Spec::Sequence { element, min_len, .. } | Spec::Set { element, min_len, .. } => {
            *min_len == 0 && all_containers_admit_empty(element)
        }
        Spec::Mapping {
            key,
            value,
            min_len,
            ..
        } => *min_len == 0 && all_containers_admit_empty(key) && all_containers_admit_empty(value),
        Spec::Optional { inner, .. } => all_containers_admit_empty(inner),
        Spec::OneOf { alternatives } => alternatives.iter().all(all_containers_admit_empty),
        _ => true,
    }
}

fn deep_sequence(levels: usize) -> TypeDescriptor {
    let mut d = TypeDescriptor::integer();
    for _ in 0..levels {
        d = TypeDescriptor::sequence_of(d);
    }
    d
}

proptest! {
    #[test]
    fn resolution_never_exceeds_max_depth(d in arb_descriptor(), max_depth in 1usize..8) {
        let settings = GenerateSettings { max_depth, ..GenerateSettings::default() };
        let r = resolve(&d, &settings);
        prop_assert!(spec_depth(&r.spec) <= max_depth);
    }

    #[test]
    fn depth_cap_is_reported_when_hit(levels in 1usize..200, max_depth in 1usize..10) {
        let settings = GenerateSettings { max_depth, ..GenerateSettings::default() };
        let r = resolve(&deep_sequence(levels), &settings);
        let capped = r.notes.iter().any(|n| n.kind == DiagnosticKind::RecursionLimitExceeded);
        prop_assert_eq!(capped, levels > max_depth);
        let recursion_placeholders = r
            .spec
            .placeholders()
            .iter()
            .filter(|(_, reason)| *reason == FallbackReason::RecursionLimit)
            .count();
        prop_assert_eq!(recursion_placeholders > 0, levels > max_depth);
    }

    #[test]
    fn containers_always_admit_empty(d in arb_descriptor()) {
        let r = resolve(&d, &GenerateSettings::default());
        prop_assert!(all_containers_admit_empty(&r.spec));
    }

    #[test]
    fn every_placeholder_has_a_note(d in arb_descriptor()) {
        let r = resolve(&d, &GenerateSettings::default());
        let placeholders = r.spec.placeholders().len();
        prop_assert!(r.notes.len() >= placeholders);
    }

    #[test]
    fn resolution_is_deterministic(d in arb_descriptor()) {
        let settings = GenerateSettings::default();
        prop_assert_eq!(resolve(&d, &settings), resolve(&d, &settings));
    }

    #[test]
    fn set_elements_are_hashable(d in arb_descriptor()) {
        fn check(spec: &StrategySpec) -> bool {
            match &spec.strategy {
                Spec::Set { element, .. } => is_hashable(element) && check(element),
                Spec::Sequence { element, .. } => check(element),
                Spec::Mapping { key, value, .. } => check(key) && check(value),
                Spec::Optional { inner, .. } => check(inner),
                Spec::OneOf { alternatives } => alternatives.iter().all(check),
                _ => true,
            }
        }
        let r = resolve(&d, &GenerateSettings::default());
        prop_assert!(check(&r.spec));
    }
}
