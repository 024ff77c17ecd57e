//! BDD-style scenario tests for unit composition and rendering.

use propgen_emit::{
    Composition, assign_test_names, compose, emit, failed_unit, module_path, output_file_for,
    render_module,
};
use propgen_settings::{GenerateSettings, OutputGrouping};
use propgen_types::{
    ClaimKind, DiagnosticKind, GeneratedTestUnit, Parameter, SignatureModel, SourceSignature,
    Strategy, TypeDescriptor, UnitStatus,
};

fn source(file: &str, signature: SignatureModel) -> SourceSignature {
    SourceSignature {
        file: file.to_string(),
        signature,
    }
}

fn unit(ordinal: usize, src: &SourceSignature, settings: &GenerateSettings) -> GeneratedTestUnit {
    match compose(ordinal, src, &module_path(&src.file, None), settings) {
        Composition::Unit(unit) => *unit,
        Composition::Skipped(d) => panic!("unexpected skip: {d}"),
    }
}

fn int() -> TypeDescriptor {
    TypeDescriptor::integer()
}

// =============================================================================
// Reference signatures
// =============================================================================

#[test]
fn given_add_when_composed_then_two_integer_strategies_and_no_placeholders() {
    // Given add(a: int, b: int) -> int
    let settings = GenerateSettings::default();
    let src = source(
        "pkg/calc.py",
        SignatureModel::function(
            "add",
            vec![Parameter::new("a", int()), Parameter::new("b", int())],
            int(),
        ),
    );

    // When the unit is composed
    let unit = unit(0, &src, &settings);

    // Then both parameters carry boundary sentinels and nothing is degraded
    assert_eq!(
        unit.claims,
        vec![
            ClaimKind::NoCrashOnValidInput,
            ClaimKind::ReturnTypeConformance
        ]
    );
    assert_eq!(unit.parameter_strategies.len(), 2);
    for p in &unit.parameter_strategies {
        match &p.strategy.strategy {
            Strategy::Integers { sentinels, .. } => {
                for v in [0, -1, i64::MIN, i64::MAX] {
                    assert!(sentinels.contains(&v));
                }
            }
            other => panic!("expected integers, got {other:?}"),
        }
    }
    assert!(!unit.has_placeholders());
    assert!(unit.diagnostics.is_empty());
    assert_eq!(unit.status, UnitStatus::Complete);

    // And the rendered test calls the target positionally
    let text = emit(&unit, &settings);
    assert!(text.contains("def test_add_properties(a, b):"));
    assert!(text.contains("result = _mod_pkg_calc.add(a, b)"));
    assert!(text.contains("st.sampled_from([0, -1, 1, -9223372036854775808, 9223372036854775807])"));
    assert!(!text.contains("propgen: placeholder"));
}

#[test]
fn given_normalize_when_rendered_then_absent_branch_is_called_with_none() {
    let settings = GenerateSettings::default();
    let src = source(
        "pkg/text.py",
        SignatureModel::function(
            "normalize",
            vec![Parameter::new(
                "x",
                TypeDescriptor::optional(TypeDescriptor::text()),
            )],
            TypeDescriptor::text(),
        ),
    );

    let unit = unit(0, &src, &settings);
    let text = emit(&unit, &settings);

    assert!(unit.has_claim(ClaimKind::RoundTripAbsentOnOptional));
    assert!(text.contains("x=_optional(st.one_of("));
    assert!(text.contains(", 25),\n"));
    assert!(text.contains("    _mod_pkg_text.normalize(None)\n"));
    let absent = text.find("normalize(None)").unwrap();
    let present = text.find("result = _mod_pkg_text.normalize(x)").unwrap();
    assert!(absent < present, "absent branch must run first:\n{text}");
}

#[test]
fn given_identity_then_idempotence_is_rendered_with_equality() {
    let settings = GenerateSettings::default();
    let src = source(
        "pkg/calc.py",
        SignatureModel::function("identity", vec![Parameter::new("x", int())], int()),
    );

    let unit = unit(0, &src, &settings);
    let text = emit(&unit, &settings);

    assert!(unit.has_claim(ClaimKind::Idempotence));
    assert!(
        unit.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::HeuristicClaim)
    );
    assert!(text.contains("again = _mod_pkg_calc.identity(result)"));
    assert!(text.contains("assert again == result, "));
}

#[test]
fn given_two_run_functions_in_different_files_then_names_are_disambiguated_by_file() {
    let settings = GenerateSettings::default();
    let sig = SignatureModel::function("run", vec![], TypeDescriptor::Unknown);
    let first = source("jobs/nightly.py", sig.clone());
    let second = source("jobs/hourly.py", sig);

    let build = || {
        let mut units = vec![unit(0, &first, &settings), unit(1, &second, &settings)];
        assign_test_names(&mut units);
        units
    };

    let units = build();
    assert_eq!(units[0].test_name, "test_run_properties__jobs_nightly");
    assert_eq!(units[1].test_name, "test_run_properties__jobs_hourly");
    for u in &units {
        assert!(
            u.diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::NameCollision)
        );
    }

    // Rerun yields the same names in the same order
    let again: Vec<String> = build().into_iter().map(|u| u.test_name).collect();
    assert_eq!(
        again,
        vec![
            "test_run_properties__jobs_nightly".to_string(),
            "test_run_properties__jobs_hourly".to_string()
        ]
    );
}

#[test]
fn given_same_name_twice_in_one_file_then_numeric_suffix_is_added() {
    let settings = GenerateSettings::default();
    let sig = SignatureModel::function("run", vec![], TypeDescriptor::Unknown);
    let a = source("jobs.py", sig.clone());
    let b = source("jobs.py", sig);

    let mut units = vec![unit(0, &a, &settings), unit(1, &b, &settings)];
    assign_test_names(&mut units);

    assert_eq!(units[0].test_name, "test_run_properties__jobs");
    assert_eq!(units[1].test_name, "test_run_properties__jobs_2");
}

#[test]
fn given_only_opaque_parameters_then_unit_still_renders_with_placeholders() {
    // Given a callable whose parameters are all Named/Unknown
    let settings = GenerateSettings::default();
    let src = source(
        "shop/orders.py",
        SignatureModel::function(
            "ship",
            vec![
                Parameter::new("order", TypeDescriptor::named("Order")),
                Parameter::new("note", TypeDescriptor::Unknown),
            ],
            TypeDescriptor::boolean(),
        ),
    );

    // When composed and rendered
    let unit = unit(0, &src, &settings);
    let text = emit(&unit, &settings);

    // Then the unit exists, is degraded, and is explicit about its ignorance
    assert!(unit.claims.is_empty());
    assert_eq!(unit.status, UnitStatus::Degraded);
    assert!(!unit.diagnostics.is_empty());
    assert!(text.contains("# propgen: placeholder `order`: Order (named_type)"));
    assert!(text.contains("# propgen: placeholder `note`: <unknown> (unannotated)"));
    assert!(text.contains("order=st.from_type(object),"));
    assert!(text.contains("    pass\n"));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn given_duplicate_parameter_names_then_unit_is_skipped() {
    let src = source(
        "pkg/calc.py",
        SignatureModel::function(
            "dup",
            vec![Parameter::new("x", int()), Parameter::new("x", int())],
            int(),
        ),
    );

    let outcome = compose(0, &src, "pkg.calc", &GenerateSettings::default());

    match outcome {
        Composition::Skipped(d) => {
            assert_eq!(d.kind, DiagnosticKind::MalformedSignature);
            assert_eq!(d.target, "dup");
            assert!(d.message.contains("duplicate"));
        }
        Composition::Unit(_) => panic!("expected a skip"),
    }
}

#[test]
fn given_empty_union_return_then_unit_is_skipped() {
    let src = source(
        "pkg/calc.py",
        SignatureModel::function("f", vec![], TypeDescriptor::union(vec![])),
    );
    let outcome = compose(0, &src, "pkg.calc", &GenerateSettings::default());
    assert!(matches!(outcome, Composition::Skipped(_)));
}

// =============================================================================
// Rendering details
// =============================================================================

#[test]
fn given_boolean_flag_then_rendered_unit_matches_exactly() {
    let settings = GenerateSettings::default();
    let src = source(
        "pkg/flags.py",
        SignatureModel::function(
            "flag",
            vec![Parameter::new("on", TypeDescriptor::boolean())],
            TypeDescriptor::boolean(),
        ),
    );

    let text = emit(&unit(0, &src, &settings), &settings);

    let expected = [
        "# flag (pkg/flags.py)",
        "# propgen: heuristic_claim: `idempotence` was selected from signature shape alone; it may not hold for stateful callables",
        "# claims: no_crash_on_valid_input, return_type_conformance, idempotence",
        "@settings(max_examples=100)",
        "@given(",
        "    on=st.booleans(),",
        ")",
        "def test_flag_properties(on):",
        "    # no_crash_on_valid_input: invocation completes without raising for well-typed inputs",
        "    result = _mod_pkg_flags.flag(on)",
        "    # return_type_conformance: the returned value matches the declared return type",
        "    assert isinstance(result, bool), \"flag\" + \" returned \" + repr(result) + \", expected \" + \"bool\"",
        "    # idempotence: re-feeding the output does not fail and yields an equal result (heuristic)",
        "    again = _mod_pkg_flags.flag(result)",
        "    assert again == result, \"re-feeding \" + repr(result) + \" to \" + \"flag\" + \" returned \" + repr(again)",
        "",
    ]
    .join("\n");
    assert_eq!(text, expected);
}

#[test]
fn given_zero_parameter_function_then_no_given_decorator() {
    let settings = GenerateSettings::default();
    let src = source(
        "pkg/clock.py",
        SignatureModel::function("tick", vec![], TypeDescriptor::Unknown),
    );

    let text = emit(&unit(0, &src, &settings), &settings);

    assert!(!text.contains("@given"));
    assert!(!text.contains("@settings"));
    assert!(text.contains("def test_tick_properties():\n"));
    assert!(text.contains("result = _mod_pkg_clock.tick()"));
}

#[test]
fn given_method_then_receiver_is_built_from_class() {
    let settings = GenerateSettings::default();
    let src = source(
        "pkg/stack.py",
        SignatureModel::method(
            "Stack",
            "push",
            vec![Parameter::new("item", int())],
            TypeDescriptor::Unknown,
        ),
    );

    let unit = unit(0, &src, &settings);
    let text = emit(&unit, &settings);

    assert_eq!(unit.test_name, "test_stack_push_properties");
    assert!(text.contains("    receiver=st.builds(_mod_pkg_stack.Stack),"));
    assert!(text.contains("def test_stack_push_properties(receiver, item):"));
    assert!(text.contains("result = receiver.push(item)"));
    assert!(text.contains("# propgen: placeholder receiver: Stack (receiver)"));
}

#[test]
fn given_parameter_named_result_then_test_argument_is_renamed() {
    let settings = GenerateSettings::default();
    let src = source(
        "pkg/calc.py",
        SignatureModel::function("wrap", vec![Parameter::new("result", int())], TypeDescriptor::Unknown),
    );

    let text = emit(&unit(0, &src, &settings), &settings);

    assert!(text.contains("    result_=st.one_of("));
    assert!(text.contains("result = _mod_pkg_calc.wrap(result_)"));
}

#[test]
fn given_named_return_type_then_conformance_checks_class_names() {
    let settings = GenerateSettings::default();
    let src = source(
        "pkg/models.py",
        SignatureModel::function(
            "load",
            vec![Parameter::new("raw", TypeDescriptor::bytes())],
            TypeDescriptor::named("models.User"),
        ),
    );

    let text = emit(&unit(0, &src, &settings), &settings);

    assert!(text.contains("any(_c.__name__ == \"User\" for _c in type(result).__mro__)"));
}

#[test]
fn given_failed_unit_then_only_comments_are_rendered() {
    let settings = GenerateSettings::default();
    let src = source(
        "pkg/calc.py",
        SignatureModel::function("boom", vec![], TypeDescriptor::Unknown),
    );

    let text = emit(&failed_unit(0, &src, "pkg.calc", "resolver panicked"), &settings);

    assert!(text.starts_with("# propgen: generation failed for boom (pkg/calc.py)\n"));
    assert!(text.contains("# propgen: unit_failure: generation failed: resolver panicked"));
    assert!(!text.contains("def "));
}

// =============================================================================
// Modules
// =============================================================================

#[test]
fn given_units_from_two_modules_then_imports_are_sorted_and_helper_included() {
    let settings = GenerateSettings::default();
    let z = source(
        "z/last.py",
        SignatureModel::function(
            "f",
            vec![Parameter::new("x", TypeDescriptor::optional(int()))],
            TypeDescriptor::Unknown,
        ),
    );
    let a = source(
        "a/first.py",
        SignatureModel::function("g", vec![], TypeDescriptor::Unknown),
    );
    let units = [unit(0, &z, &settings), unit(1, &a, &settings)];
    let refs: Vec<&GeneratedTestUnit> = units.iter().collect();

    let text = render_module(&refs, &settings);

    let first = text.find("import a.first as _mod_a_first").expect("a import");
    let last = text.find("import z.last as _mod_z_last").expect("z import");
    assert!(first < last);
    assert!(text.contains("def _optional(inner, absent_percent):"));
    assert!(!text.contains("import importlib"));
    // Units keep discovery order, not import order
    assert!(text.find("def test_f_properties").unwrap() < text.find("def test_g_properties").unwrap());
}

#[test]
fn given_non_identifier_module_path_then_importlib_is_used() {
    let settings = GenerateSettings::default();
    let src = source(
        "my-pkg/util.py",
        SignatureModel::function("h", vec![], TypeDescriptor::Unknown),
    );
    let units = [unit(0, &src, &settings)];
    let refs: Vec<&GeneratedTestUnit> = units.iter().collect();

    let text = render_module(&refs, &settings);

    assert!(text.contains("import importlib\n"));
    assert!(text.contains("_mod_my_pkg_util = importlib.import_module(\"my-pkg.util\")"));
}

#[test]
fn given_grouping_then_output_file_follows_it() {
    let mut settings = GenerateSettings::default();
    let src = source(
        "pkg/calc.py",
        SignatureModel::function("f", vec![], TypeDescriptor::Unknown),
    );
    let unit = unit(0, &src, &settings);

    assert_eq!(output_file_for(&unit, &settings), "test_pkg_calc.py");

    settings.grouping = OutputGrouping::Combined;
    assert_eq!(output_file_for(&unit, &settings), "test_properties.py");
}
