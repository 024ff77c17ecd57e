//! Python literals, Hypothesis strategy expressions and conformance predicates.

use std::fmt::Write as _;

use propgen_types::{Container, PrimitiveKind, Strategy, StrategySpec, TypeDescriptor};

/// Expression every placeholder renders as; a marker comment precedes the test.
pub const PLACEHOLDER_EXPR: &str = "st.from_type(object)";

/// Double-quoted Python string literal containing only printable ASCII.
pub fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ' '..='~' => out.push(c),
            c if (c as u32) < 0x100 => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if (c as u32) < 0x10000 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => {
                let _ = write!(out, "\\U{:08x}", c as u32);
            }
        }
    }
    out.push('"');
    out
}

/// Python float literal; non-finite values go through `float(...)`.
pub fn py_float(v: f64) -> String {
    if v.is_nan() {
        "float(\"nan\")".to_string()
    } else if v == f64::INFINITY {
        "float(\"inf\")".to_string()
    } else if v == f64::NEG_INFINITY {
        "float(\"-inf\")".to_string()
    } else {
        format!("{v:?}")
    }
}

fn py_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

fn list_of<T>(items: &[T], render: impl Fn(&T) -> String) -> String {
    let inner: Vec<String> = items.iter().map(render).collect();
    format!("[{}]", inner.join(", "))
}

/// Render a strategy spec as a Hypothesis expression.
///
/// Placeholders become [`PLACEHOLDER_EXPR`] so the module always parses.
pub fn strategy_expr(spec: &StrategySpec) -> String {
    match &spec.strategy {
        Strategy::Integers {
            min,
            max,
            sentinels,
        } => format!(
            "st.one_of(st.sampled_from({}), st.integers(min_value={min}, max_value={max}))",
            list_of(sentinels, |v| v.to_string())
        ),
        Strategy::Floats {
            allow_non_finite,
            sentinels,
        } => format!(
            "st.one_of(st.sampled_from({}), st.floats(allow_nan={nf}, allow_infinity={nf}))",
            list_of(sentinels, |v| py_float(*v)),
            nf = py_bool(*allow_non_finite)
        ),
        Strategy::Booleans => "st.booleans()".to_string(),
        Strategy::Text { max_len, sentinels } => format!(
            "st.one_of(st.sampled_from({}), st.text(max_size={max_len}))",
            list_of(sentinels, |s| py_str(s))
        ),
        Strategy::Bytes { max_len } => {
            format!("st.one_of(st.just(b\"\"), st.binary(max_size={max_len}))")
        }
        Strategy::Sequence {
            element,
            min_len,
            max_len,
        } => format!(
            "st.lists({}, min_size={min_len}, max_size={max_len})",
            strategy_expr(element)
        ),
        Strategy::Set {
            element,
            min_len,
            max_len,
        } => format!(
            "st.sets({}, min_size={min_len}, max_size={max_len})",
            strategy_expr(element)
        ),
        Strategy::Mapping {
            key,
            value,
            min_len,
            max_len,
        } => format!(
            "st.dictionaries({}, {}, min_size={min_len}, max_size={max_len})",
            strategy_expr(key),
            strategy_expr(value)
        ),
        Strategy::Optional {
            inner,
            absent_percent,
        } => format!("_optional({}, {absent_percent})", strategy_expr(inner)),
        Strategy::OneOf { alternatives } => {
            let alts: Vec<String> = alternatives.iter().map(strategy_expr).collect();
            format!("st.one_of({})", alts.join(", "))
        }
        Strategy::Placeholder { .. } => PLACEHOLDER_EXPR.to_string(),
    }
}

/// True if rendering this spec references the `_optional` helper.
pub fn uses_optional_helper(spec: &StrategySpec) -> bool {
    match &spec.strategy {
        Strategy::Optional { .. } => true,
        Strategy::Sequence { element, .. } | Strategy::Set { element, .. } => {
            uses_optional_helper(element)
        }
        Strategy::Mapping { key, value, .. } => {
            uses_optional_helper(key) || uses_optional_helper(value)
        }
        Strategy::OneOf { alternatives } => alternatives.iter().any(uses_optional_helper),
        _ => false,
    }
}

/// Python boolean expression that holds when `value` matches `descriptor`.
///
/// Composite levels at or beyond `max_depth` are not inspected. Unknown
/// leaves always conform; a named leaf conforms when a class of that name
/// appears in the value's MRO.
pub fn conformance_expr(descriptor: &TypeDescriptor, value: &str, max_depth: usize) -> String {
    conforms(descriptor, value, 0, max_depth)
}

fn conforms(descriptor: &TypeDescriptor, value: &str, depth: usize, max_depth: usize) -> String {
    let composite = matches!(
        descriptor,
        TypeDescriptor::Container(_) | TypeDescriptor::Optional(_) | TypeDescriptor::Union(_)
    );
    if composite && depth >= max_depth {
        return "True".to_string();
    }

    let d = depth + 1;
    match descriptor {
        TypeDescriptor::Primitive(kind) => match kind {
            PrimitiveKind::Integer => {
                format!("(isinstance({value}, int) and not isinstance({value}, bool))")
            }
            PrimitiveKind::Float => {
                format!("(isinstance({value}, (int, float)) and not isinstance({value}, bool))")
            }
            PrimitiveKind::Boolean => format!("isinstance({value}, bool)"),
            PrimitiveKind::Text => format!("isinstance({value}, str)"),
            PrimitiveKind::Bytes => format!("isinstance({value}, (bytes, bytearray))"),
        },
        TypeDescriptor::Container(Container::Sequence(element)) => format!(
            "(isinstance({value}, _abc.Sequence) and not isinstance({value}, (str, bytes, bytearray)) and all({} for _v{d} in {value}))",
            conforms(element, &format!("_v{d}"), d, max_depth)
        ),
        TypeDescriptor::Container(Container::Set(element)) => format!(
            "(isinstance({value}, _abc.Set) and all({} for _v{d} in {value}))",
            conforms(element, &format!("_v{d}"), d, max_depth)
        ),
        TypeDescriptor::Container(Container::Mapping { key, value: val }) => format!(
            "(isinstance({value}, _abc.Mapping) and all({} and {} for _k{d}, _v{d} in {value}.items()))",
            conforms(key, &format!("_k{d}"), d, max_depth),
            conforms(val, &format!("_v{d}"), d, max_depth)
        ),
        TypeDescriptor::Optional(inner) => {
            format!("({value} is None or {})", conforms(inner, value, d, max_depth))
        }
        TypeDescriptor::Union(alternatives) => {
            if alternatives.is_empty() {
                return "False".to_string();
            }
            let alts: Vec<String> = alternatives
                .iter()
                .map(|alt| conforms(alt, value, d, max_depth))
                .collect();
            format!("({})", alts.join(" or "))
        }
        TypeDescriptor::Named(name) => {
            let short = name.rsplit('.').next().unwrap_or(name);
            format!(
                "any(_c.__name__ == {} for _c in type({value}).__mro__)",
                py_str(short)
            )
        }
        TypeDescriptor::Unknown => "True".to_string(),
    }
}

/// Single-line comment text: control characters become spaces.
pub fn comment_text(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
