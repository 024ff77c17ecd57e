//! Property tests for annotation classification.

use proptest::prelude::*;

use propgen_annotation::classify;
use propgen_types::TypeDescriptor;

fn scalar() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["int", "float", "bool", "str", "bytes", "User"])
}

/// Annotation text generated from a small grammar.
fn annotation() -> impl Strategy<Value = String> {
    scalar().prop_map(str::to_string).prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| format!("list[{t}]")),
            inner.clone().prop_map(|t| format!("Optional[{t}]")),
            (inner.clone(), inner.clone()).prop_map(|(k, v)| format!("dict[{k}, {v}]")),
            (inner.clone(), inner).prop_map(|(a, b)| format!("{a} | {b}")),
        ]
    })
}

proptest! {
    #[test]
    fn classification_never_panics(text in "\\PC{0,64}") {
        let _ = classify(&text);
    }

    #[test]
    fn classification_is_deterministic(text in annotation()) {
        prop_assert_eq!(classify(&text), classify(&text));
    }

    #[test]
    fn grammar_annotations_are_never_unknown(text in annotation()) {
        prop_assert!(!classify(&text).is_unknown(), "{}", text);
    }

    #[test]
    fn whitespace_is_insignificant(text in annotation()) {
        let spaced = text.replace('[', " [ ").replace(',', " , ");
        prop_assert_eq!(classify(&text), classify(&spaced));
    }

    #[test]
    fn optional_wrapping_is_idempotent(text in annotation()) {
        let once = classify(&format!("Optional[{text}]"));
        let twice = classify(&format!("Optional[Optional[{text}]]"));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn unions_never_nest_directly(text in annotation()) {
        fn check(t: &TypeDescriptor) -> bool {
            match t {
                TypeDescriptor::Union(alts) => alts.iter().all(|a| {
                    !matches!(a, TypeDescriptor::Union(_) | TypeDescriptor::Optional(_)) && check(a)
                }),
                TypeDescriptor::Optional(inner) => {
                    !matches!(**inner, TypeDescriptor::Optional(_)) && check(inner)
                }
                TypeDescriptor::Container(propgen_types::Container::Sequence(e))
                | TypeDescriptor::Container(propgen_types::Container::Set(e)) => check(e),
                TypeDescriptor::Container(propgen_types::Container::Mapping { key, value }) => {
                    check(key) && check(value)
                }
                _ => true,
            }
        }
        prop_assert!(check(&classify(&text)), "{}", text);
    }
}
