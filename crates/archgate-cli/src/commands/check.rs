//! Check command implementation.

use anyhow::Result;
use archgate_baseline::{BaselineStore, ViolationDiff};
use archgate_core::CheckResult;
use std::io::IsTerminal;
use std::process::ExitCode;

use crate::pipeline::analyze;
use crate::project::ProjectLocation;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    location: &ProjectLocation,
    format: OutputFormat,
    use_baseline: bool,
    ratchet: bool,
) -> Result<ExitCode> {
    let mut analysis = analyze(location)?;
    if location.is_partial() {
        analysis
            .result
            .violations
            .retain(|v| location.in_scope(&v.file));
    }

    let diff = use_baseline.then(|| {
        let store = BaselineStore::for_project(&analysis.root);
        if store.baseline().is_none() {
            tracing::warn!(
                "No baseline at {}; every violation counts as new",
                store.path().display()
            );
        }
        let mut diff = store.compare_violations(&analysis.result.violations);
        diff.resolved.retain(|b| location.in_scope(&b.violation.file));
        diff
    });

    let color = format == OutputFormat::Text && std::io::stdout().is_terminal();
    print!(
        "{}",
        super::output::render(&analysis.result, diff.as_ref(), format, color)?
    );

    if let Some(d) = diff.as_ref().filter(|d| ratchet && d.ratchet_failed()) {
        tracing::warn!(
            "{} baseline violation(s) were resolved; run `archgate baseline` to record the improvement",
            d.resolved.len()
        );
    }

    Ok(if fails(&analysis.result, diff.as_ref(), ratchet) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Whether the run should exit non-zero.
///
/// Without a baseline any error fails. With one, only new errors fail, plus
/// resolved entries when ratcheting.
fn fails(result: &CheckResult, diff: Option<&ViolationDiff>, ratchet: bool) -> bool {
    match diff {
        None => result.has_errors(),
        Some(d) => d.has_new_errors() || (ratchet && d.ratchet_failed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgate_core::{Severity, Violation};

    fn error() -> Violation {
        Violation::new("r", Severity::Error, "a.ts", "m")
    }

    #[test]
    fn errors_fail_without_baseline() {
        let mut result = CheckResult::new();
        assert!(!fails(&result, None, false));
        result.violations.push(Violation::new("r", Severity::Warning, "a.ts", "m"));
        assert!(!fails(&result, None, false));
        result.violations.push(error());
        assert!(fails(&result, None, false));
    }

    #[test]
    fn baseline_only_fails_on_new_errors() {
        let mut result = CheckResult::new();
        result.violations.push(error());
        let known = ViolationDiff {
            unchanged: vec![error()],
            ..ViolationDiff::default()
        };
        assert!(!fails(&result, Some(&known), false));

        let new = ViolationDiff {
            new: vec![error()],
            ..ViolationDiff::default()
        };
        assert!(fails(&result, Some(&new), false));
    }

    #[test]
    fn ratchet_fails_on_resolved_entries() {
        let mut store = BaselineStore::new("unused.json");
        store.create_baseline(&[error()], None);
        let result = CheckResult::new();
        let diff = store.compare_violations(&result.violations);
        assert!(!fails(&result, Some(&diff), false));
        assert!(fails(&result, Some(&diff), true));
    }
}
