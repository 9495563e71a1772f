//! Output formatting for check results.

use anyhow::Result;
use archgate_baseline::ViolationDiff;
use archgate_core::{CheckResult, Severity, Violation};
use serde_json::json;
use std::fmt::Write;

use crate::OutputFormat;

/// Renders results in the given format.
///
/// With a baseline diff, text and compact output show only new violations;
/// JSON always carries every violation plus the diff.
pub fn render(
    result: &CheckResult,
    diff: Option<&ViolationDiff>,
    format: OutputFormat,
    color: bool,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(result, diff, color),
        OutputFormat::Json => render_json(result, diff)?,
        OutputFormat::Compact => render_compact(result, diff),
    })
}

fn shown<'a>(result: &'a CheckResult, diff: Option<&'a ViolationDiff>) -> &'a [Violation] {
    diff.map_or(&result.violations, |d| &d.new)
}

fn render_text(result: &CheckResult, diff: Option<&ViolationDiff>, color: bool) -> String {
    let paint = |code: &str, text: &str| {
        if color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_owned()
        }
    };

    let mut out = String::new();
    for v in shown(result, diff) {
        let severity = match v.severity {
            Severity::Error => paint("31", "error"),
            Severity::Warning => paint("33", "warning"),
            Severity::Info => paint("34", "info"),
        };
        let _ = write!(out, "{} at {}", v.rule_id, v.file);
        if let Some(line) = v.effective_line() {
            let _ = write!(out, ":{line}");
        }
        let _ = writeln!(out, "\n  {severity}: {}", v.message);
        if let Some(suggestion) = &v.suggestion {
            let _ = writeln!(out, "  = help: {suggestion}");
        }
        if let Some(doc) = &v.doc_ref {
            let _ = writeln!(out, "  = see: {doc}");
        }
        out.push('\n');
    }

    if !result.failed_rules.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            paint(
                "33",
                &format!("Skipped failed rule(s): {}", result.failed_rules.join(", "))
            )
        );
    }

    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "31"
    } else if warnings > 0 {
        "33"
    } else {
        "32"
    };
    let _ = writeln!(
        out,
        "{}",
        paint(
            summary_color,
            &format!(
                "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)",
                result.files_checked
            )
        )
    );
    if let Some(d) = diff {
        let _ = writeln!(
            out,
            "Baseline: {} new, {} unchanged, {} resolved",
            d.new.len(),
            d.unchanged.len(),
            d.resolved.len()
        );
    }
    out
}

fn render_json(result: &CheckResult, diff: Option<&ViolationDiff>) -> Result<String> {
    let (errors, warnings, infos) = result.count_by_severity();
    let mut value = json!({
        "filesChecked": result.files_checked,
        "summary": { "errors": errors, "warnings": warnings, "info": infos },
        "violations": result.violations,
        "failedRules": result.failed_rules,
    });
    if let Some(d) = diff {
        value["baseline"] = json!({
            "new": d.new,
            "unchanged": d.unchanged.len(),
            "resolved": d.resolved,
        });
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

fn render_compact(result: &CheckResult, diff: Option<&ViolationDiff>) -> String {
    shown(result, diff)
        .iter()
        .map(|v| format!("{v}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgate_core::SourceRange;

    fn result() -> CheckResult {
        let mut result = CheckResult::new();
        result.files_checked = 3;
        result.violations = vec![
            Violation::new(
                "forbidden-layer-import",
                Severity::Error,
                "src/domain/a.ts",
                "Layer 'domain' must not import from layer 'infra' (src/infra/b.ts)",
            )
            .with_range(SourceRange::line(1))
            .with_doc_ref("docs/adr/0001.md"),
            Violation::new("cyclic-dependency", Severity::Warning, "src/infra/b.ts", "cycle")
                .with_suggestion("Invert one of the imports"),
        ];
        result
    }

    #[test]
    fn text_output() {
        let out = render(&result(), None, OutputFormat::Text, false).unwrap();
        insta::assert_snapshot!(out.trim_end(), @r"
        forbidden-layer-import at src/domain/a.ts:1
          error: Layer 'domain' must not import from layer 'infra' (src/infra/b.ts)
          = see: docs/adr/0001.md

        cyclic-dependency at src/infra/b.ts
          warning: cycle
          = help: Invert one of the imports

        Found 1 error(s), 1 warning(s), 0 info(s) in 3 file(s)
        ");
    }

    #[test]
    fn compact_output() {
        let out = render(&result(), None, OutputFormat::Compact, false).unwrap();
        insta::assert_snapshot!(out.trim_end(), @r"
        src/domain/a.ts:1:1: error [forbidden-layer-import] Layer 'domain' must not import from layer 'infra' (src/infra/b.ts) (see: docs/adr/0001.md)
        src/infra/b.ts: warning [cyclic-dependency] cycle
        ");
    }

    #[test]
    fn baseline_diff_limits_text_to_new() {
        let result = result();
        let diff = ViolationDiff {
            new: vec![result.violations[1].clone()],
            unchanged: vec![result.violations[0].clone()],
            resolved: Vec::new(),
        };
        let out = render(&result, Some(&diff), OutputFormat::Text, false).unwrap();
        assert!(!out.contains("forbidden-layer-import at"));
        assert!(out.contains("cyclic-dependency at src/infra/b.ts"));
        assert!(out.ends_with("Baseline: 1 new, 1 unchanged, 0 resolved\n"));
    }

    #[test]
    fn json_output_is_parseable() {
        let out = render(&result(), None, OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["filesChecked"], 3);
        assert_eq!(value["summary"]["errors"], 1);
        assert_eq!(value["violations"][0]["ruleId"], "forbidden-layer-import");
        assert!(value.get("baseline").is_none());
    }
}
