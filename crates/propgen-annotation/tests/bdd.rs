//! BDD-style scenarios for annotation classification.

use propgen_annotation::{MAX_NESTING, classify, classify_opt};
use propgen_types::TypeDescriptor as T;

// ── Scenario: builtin scalars ──────────────────────────────────────────

#[test]
fn given_builtin_scalar_names_when_classified_then_primitives() {
    assert_eq!(classify("int"), T::integer());
    assert_eq!(classify("float"), T::float());
    assert_eq!(classify("bool"), T::boolean());
    assert_eq!(classify("str"), T::text());
    assert_eq!(classify("bytes"), T::bytes());
    assert_eq!(classify("bytearray"), T::bytes());
}

#[test]
fn given_qualified_builtin_when_classified_then_qualifier_is_ignored() {
    assert_eq!(classify("builtins.int"), T::integer());
    assert_eq!(classify("typing.List[int]"), T::sequence_of(T::integer()));
    assert_eq!(
        classify("collections.abc.Mapping[str, bytes]"),
        T::mapping_of(T::text(), T::bytes())
    );
}

// ── Scenario: containers ───────────────────────────────────────────────

#[test]
fn given_pep585_and_typing_spellings_when_classified_then_same_descriptor() {
    assert_eq!(classify("list[str]"), classify("List[str]"));
    assert_eq!(classify("set[int]"), classify("typing.Set[int]"));
    assert_eq!(classify("dict[str, int]"), classify("Dict[str, int]"));
}

#[test]
fn given_bare_container_when_classified_then_elements_unknown() {
    assert_eq!(classify("list"), T::sequence_of(T::Unknown));
    assert_eq!(classify("dict"), T::mapping_of(T::Unknown, T::Unknown));
}

#[test]
fn given_homogeneous_tuple_when_classified_then_sequence() {
    assert_eq!(classify("tuple[int, ...]"), T::sequence_of(T::integer()));
    assert_eq!(classify("tuple[int, str]"), T::Unknown);
}

#[test]
fn given_nested_containers_when_classified_then_structure_preserved() {
    assert_eq!(
        classify("dict[str, list[Optional[float]]]"),
        T::mapping_of(T::text(), T::sequence_of(T::optional(T::float())))
    );
}

// ── Scenario: optionals and unions ─────────────────────────────────────

#[test]
fn given_optional_spellings_when_classified_then_all_agree() {
    let expected = T::optional(T::integer());
    assert_eq!(classify("Optional[int]"), expected);
    assert_eq!(classify("int | None"), expected);
    assert_eq!(classify("None | int"), expected);
    assert_eq!(classify("Union[int, None]"), expected);
}

#[test]
fn given_union_with_none_when_classified_then_optional_of_union() {
    assert_eq!(
        classify("Union[int, str, None]"),
        T::optional(T::union(vec![T::integer(), T::text()]))
    );
}

#[test]
fn given_duplicate_alternatives_when_classified_then_deduplicated() {
    assert_eq!(classify("int | int"), T::integer());
    assert_eq!(
        classify("Union[int, Union[str, int]]"),
        T::union(vec![T::integer(), T::text()])
    );
}

#[test]
fn given_nested_optional_when_classified_then_flattened() {
    assert_eq!(classify("Optional[Optional[str]]"), T::optional(T::text()));
}

// ── Scenario: user types and unsupported constructs ───────────────────

#[test]
fn given_user_defined_names_when_classified_then_named() {
    assert_eq!(classify("User"), T::named("User"));
    assert_eq!(classify("models.User"), T::named("models.User"));
    assert_eq!(classify("'User'"), T::named("User"));
}

#[test]
fn given_subscripted_user_generic_when_classified_then_unknown() {
    assert_eq!(classify("Box[int]"), T::Unknown);
    assert_eq!(classify("models.Page[User]"), T::Unknown);
}

#[test]
fn given_unsupported_typing_constructs_when_classified_then_unknown() {
    for text in ["Any", "Callable[[int], str]", "Literal['a', 'b']", "Iterator[int]", "object"] {
        assert_eq!(classify(text), T::Unknown, "{text}");
    }
}

#[test]
fn given_annotated_when_classified_then_metadata_dropped() {
    assert_eq!(classify("Annotated[int, 'positive']"), T::integer());
}

#[test]
fn given_garbage_when_classified_then_unknown() {
    for text in ["", "   ", "list[", "dict[str]]", "int,", "3", "a..b", "$x", "None"] {
        assert_eq!(classify(text), T::Unknown, "{text:?}");
    }
}

#[test]
fn given_absent_annotation_when_classified_then_unknown() {
    assert_eq!(classify_opt(None), T::Unknown);
    assert_eq!(classify_opt(Some("")), T::Unknown);
    assert_eq!(classify_opt(Some("int")), T::integer());
}

#[test]
fn given_pathological_nesting_when_classified_then_unknown_without_overflow() {
    let deep = format!("{}int{}", "list[".repeat(MAX_NESTING * 4), "]".repeat(MAX_NESTING * 4));
    assert_eq!(classify(&deep), T::Unknown);
}
