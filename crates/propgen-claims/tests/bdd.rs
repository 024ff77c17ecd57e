//! BDD-style scenario tests for property selection.

use propgen_claims::{claim, select};
use propgen_types::{ClaimKind, DiagnosticKind, Parameter, SignatureModel, TypeDescriptor};

fn int() -> TypeDescriptor {
    TypeDescriptor::integer()
}

#[test]
fn given_add_then_no_crash_and_conformance_are_selected() {
    // Given add(a: int, b: int) -> int
    let sig = SignatureModel::function(
        "add",
        vec![Parameter::new("a", int()), Parameter::new("b", int())],
        int(),
    );

    // When claims are selected
    let selection = select(&sig);

    // Then exactly the two general claims apply
    assert_eq!(
        selection.claims,
        vec![
            ClaimKind::NoCrashOnValidInput,
            ClaimKind::ReturnTypeConformance
        ]
    );
    assert!(selection.notes.is_empty());
}

#[test]
fn given_normalize_with_optional_text_then_absent_claim_is_selected() {
    let sig = SignatureModel::function(
        "normalize",
        vec![Parameter::new(
            "x",
            TypeDescriptor::optional(TypeDescriptor::text()),
        )],
        TypeDescriptor::text(),
    );

    let selection = select(&sig);

    assert_eq!(
        selection.claims,
        vec![
            ClaimKind::NoCrashOnValidInput,
            ClaimKind::ReturnTypeConformance,
            ClaimKind::RoundTripAbsentOnOptional,
        ]
    );
}

#[test]
fn given_identity_then_idempotence_is_selected_and_flagged_heuristic() {
    let sig = SignatureModel::function("identity", vec![Parameter::new("x", int())], int());

    let selection = select(&sig);

    assert_eq!(
        selection.claims,
        vec![
            ClaimKind::NoCrashOnValidInput,
            ClaimKind::ReturnTypeConformance,
            ClaimKind::Idempotence,
        ]
    );
    assert_eq!(selection.notes.len(), 1);
    assert_eq!(selection.notes[0].kind, DiagnosticKind::HeuristicClaim);
    assert!(claim(ClaimKind::Idempotence).heuristic);
}

#[test]
fn given_only_named_parameters_then_no_claims_and_a_note() {
    let sig = SignatureModel::function(
        "ship",
        vec![
            Parameter::new("order", TypeDescriptor::named("Order")),
            Parameter::new("carrier", TypeDescriptor::Unknown),
        ],
        TypeDescriptor::boolean(),
    );

    let selection = select(&sig);

    assert!(selection.claims.is_empty());
    assert_eq!(selection.notes[0].kind, DiagnosticKind::NoClaims);
    assert!(selection.notes[0].message.contains("order, carrier"));
}

#[test]
fn given_mixed_parameters_then_no_crash_is_withheld() {
    let sig = SignatureModel::function(
        "price",
        vec![
            Parameter::new("item", TypeDescriptor::named("Item")),
            Parameter::new("qty", int()),
        ],
        TypeDescriptor::float(),
    );

    let selection = select(&sig);

    assert_eq!(selection.claims, vec![ClaimKind::ReturnTypeConformance]);
}

#[test]
fn given_two_optional_parameters_then_absent_claim_is_not_selected() {
    let opt = TypeDescriptor::optional(int());
    let sig = SignatureModel::function(
        "merge",
        vec![Parameter::new("a", opt.clone()), Parameter::new("b", opt)],
        TypeDescriptor::Unknown,
    );

    let selection = select(&sig);

    assert_eq!(selection.claims, vec![ClaimKind::NoCrashOnValidInput]);
}

#[test]
fn given_method_then_receiver_is_not_counted() {
    // Given Counter.bump(self, n: int) -> int; the receiver is not a parameter
    let sig = SignatureModel::method("Counter", "bump", vec![Parameter::new("n", int())], int());

    let selection = select(&sig);

    assert!(selection.contains(ClaimKind::NoCrashOnValidInput));
    assert!(selection.contains(ClaimKind::Idempotence));
}

#[test]
fn given_zero_parameter_function_with_unknown_return_then_only_no_crash() {
    let sig = SignatureModel::function("tick", vec![], TypeDescriptor::Unknown);
    assert_eq!(select(&sig).claims, vec![ClaimKind::NoCrashOnValidInput]);
}
