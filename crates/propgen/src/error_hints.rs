use anyhow::Error;

pub(crate) fn format(err: &Error) -> String {
    let mut out = format!("Error: {err:#}");
    let hints = suggestions(err);
    if !hints.is_empty() {
        out.push_str("\n\nHints:\n");
        for hint in hints {
            out.push_str("- ");
            out.push_str(&hint);
            out.push('\n');
        }
    }
    out
}

fn suggestions(err: &Error) -> Vec<String> {
    let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
    let haystack = chain.join(" | ").to_ascii_lowercase();
    let mut out: Vec<String> = Vec::new();

    if haystack.contains("no manifest given") {
        push_hint(&mut out, "Usage: `propgen <MANIFEST> --output <DIR>`.");
    }

    if haystack.contains("failed to read manifest") || haystack.contains("no such file or directory")
    {
        push_hint(&mut out, "Verify the manifest path exists and is readable.");
        push_hint(
            &mut out,
            "Use an absolute path to avoid working-directory confusion.",
        );
    }

    if haystack.contains("[invalid_manifest]") || haystack.contains("[invalid_json]") {
        push_hint(
            &mut out,
            "The manifest must look like `{\"files\": [{\"path\": ..., \"functions\": [...], \"classes\": [...]}]}`.",
        );
    }

    if haystack.contains("invalid setting") {
        push_hint(
            &mut out,
            "Run `propgen init --print` to see every setting with its default.",
        );
    }

    if haystack.contains("failed to load config") {
        push_hint(
            &mut out,
            "Check `propgen.toml` syntax and key names, or regenerate with `propgen init --force`.",
        );
    }

    if haystack.contains("already exists") && haystack.contains("--force") {
        push_hint(&mut out, "Pass `--print` to see the template without writing it.");
    }

    out
}

fn push_hint(out: &mut Vec<String>, hint: &str) {
    if !out.iter().any(|h| h == hint) {
        out.push(hint.to_string());
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::{format, suggestions};

    #[test]
    fn suggests_for_missing_manifest() {
        let err = anyhow!("No such file or directory (os error 2)")
            .context("failed to read manifest sigs.json");
        let hints = suggestions(&err);
        assert!(hints.iter().any(|h| h.contains("manifest path exists")));
    }

    #[test]
    fn suggests_for_bad_settings() {
        let err = anyhow!("[invalid_settings] invalid setting `max_depth`: must be between 1 and 32, got 0");
        let hints = suggestions(&err);
        assert!(hints.iter().any(|h| h.contains("init --print")));
    }

    #[test]
    fn suggests_for_bad_config_file() {
        let err = anyhow!("unknown field `max_dept`").context("failed to load config propgen.toml");
        let hints = suggestions(&err);
        assert!(hints.iter().any(|h| h.contains("init --force")));
    }

    #[test]
    fn unrelated_errors_have_no_hints() {
        let err = anyhow!("something else");
        assert!(suggestions(&err).is_empty());
        assert_eq!(format(&err), "Error: something else");
    }

    #[test]
    fn format_includes_hints_section() {
        let err = anyhow!("no manifest given; pass the path to a signature manifest (JSON)");
        let rendered = format(&err);
        assert!(rendered.starts_with("Error:"));
        assert!(rendered.contains("Hints:"));
    }
}
