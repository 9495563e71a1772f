//! Core types for violations and check results.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form structured data attached to a violation (cycle members, reasons, ...).
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Severity level for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a check.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A line/column position in a source file. Both are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A span of source text, start inclusive and end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    /// Start of the span.
    pub start: Position,
    /// End of the span.
    pub end: Position,
}

impl SourceRange {
    /// Creates a range from two positions.
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A range covering a whole line, used when only the line is known.
    #[must_use]
    pub fn line(line: usize) -> Self {
        Self {
            start: Position::new(line, 1),
            end: Position::new(line + 1, 1),
        }
    }
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// A structural violation found by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Id of the rule that produced this violation (e.g. `"no-domain-to-infra"`).
    pub rule_id: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Project-relative file path (forward slashes).
    pub file: String,
    /// Source range, when the violation points at a specific statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
    /// Source line, when only the line is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Structured rule-specific data.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
    /// Reference to a design document (e.g., "ARCHITECTURE.md L85").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_ref: Option<String>,
}

impl Violation {
    /// Creates a new violation with no position.
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            file: file.into(),
            range: None,
            line: None,
            suggestion: None,
            metadata: Metadata::new(),
            doc_ref: None,
        }
    }

    /// Attaches a source range.
    #[must_use]
    pub fn with_range(mut self, range: SourceRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Attaches a source line.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Adds one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Adds a design document reference to this violation.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = Some(doc_ref.into());
        self
    }

    /// Line the violation points at, from the range if present.
    #[must_use]
    pub fn effective_line(&self) -> Option<usize> {
        self.range.map(|r| r.start.line).or(self.line)
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} at {}", self.rule_id, self.file);
        if let Some(line) = self.effective_line() {
            let _ = write!(output, ":{line}");
        }
        output.push('\n');
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {suggestion}");
        }
        if let Some(doc_ref) = &self.doc_ref {
            let _ = writeln!(output, "  = see: {doc_ref}");
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file)?;
        if let Some(range) = &self.range {
            write!(f, ":{}:{}", range.start.line, range.start.column)?;
        } else if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        write!(f, ": {} [{}] {}", self.severity, self.rule_id, self.message)?;
        if let Some(doc_ref) = &self.doc_ref {
            write!(f, " (see: {doc_ref})")?;
        }
        Ok(())
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        let location = match v.effective_line() {
            Some(line) => format!("{}:{line}", v.file),
            None => v.file.clone(),
        };
        let help = match (&v.suggestion, &v.doc_ref) {
            (Some(s), Some(d)) => Some(format!("{s} (see: {d})")),
            (Some(s), None) => Some(s.clone()),
            (None, Some(d)) => Some(format!("see: {d}")),
            (None, None) => None,
        };
        Self {
            message: format!("[{}] {} ({location})", v.rule_id, v.message),
            help,
        }
    }
}

/// Result of running a check over a project.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files in the graph.
    pub files_checked: usize,
    /// Ids of rules that failed during evaluation and were skipped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_rules: Vec<String>,
}

impl CheckResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Returns violations filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations
            .iter()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "no-domain-to-infra",
            severity,
            "src/domain/user.ts",
            "domain -> infra dependency not allowed",
        )
        .with_range(SourceRange::new(Position::new(3, 1), Position::new(3, 40)))
    }

    #[test]
    fn display_uses_range_start() {
        let v = make_violation(Severity::Error);
        insta::assert_snapshot!(
            v.to_string(),
            @"src/domain/user.ts:3:1: error [no-domain-to-infra] domain -> infra dependency not allowed"
        );
    }

    #[test]
    fn display_falls_back_to_line() {
        let v = Violation::new("caps", Severity::Warning, "a.py", "network").with_line(12);
        assert_eq!(v.to_string(), "a.py:12: warning [caps] network");
        assert_eq!(v.effective_line(), Some(12));
    }

    #[test]
    fn display_includes_doc_ref() {
        let v = make_violation(Severity::Error).with_doc_ref("DDD.md L33");
        assert!(v.to_string().ends_with("(see: DDD.md L33)"));
    }

    #[test]
    fn format_includes_suggestion_and_doc_ref() {
        let v = make_violation(Severity::Error)
            .with_suggestion("Depend on a domain port instead")
            .with_doc_ref("ARCHITECTURE.md L85");
        let formatted = v.format();
        assert!(formatted.starts_with("no-domain-to-infra at src/domain/user.ts:3\n"));
        assert!(formatted.contains("= help: Depend on a domain port instead"));
        assert!(formatted.contains("= see: ARCHITECTURE.md L85"));
    }

    #[test]
    fn serializes_camel_case_and_skips_empty_fields() {
        let v = Violation::new("r", Severity::Info, "a.ts", "m");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["ruleId"], "r");
        assert_eq!(json["severity"], "info");
        assert!(json.get("metadata").is_none());
        assert!(json.get("range").is_none());
    }

    #[test]
    fn metadata_round_trips() {
        let v = Violation::new("cycles", Severity::Error, "a.ts", "cycle")
            .with_metadata("cycleSize", 3)
            .with_metadata("cycle", vec!["a.ts", "b.ts", "c.ts"]);
        let json = serde_json::to_string(&v).unwrap();
        let back: Violation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn diagnostic_carries_help_and_location() {
        let v = make_violation(Severity::Error).with_suggestion("move it");
        let diag = ViolationDiagnostic::from(&v);
        assert!(diag.to_string().contains("(src/domain/user.ts:3)"));
        assert_eq!(diag.help.as_deref(), Some("move it"));
    }

    #[test]
    fn count_by_severity_and_thresholds() {
        let mut result = CheckResult::new();
        result.violations.push(make_violation(Severity::Warning));
        result.violations.push(make_violation(Severity::Info));
        assert_eq!(result.count_by_severity(), (0, 1, 1));
        assert!(!result.has_errors());
        assert!(result.has_violations_at(Severity::Warning));

        result.violations.push(make_violation(Severity::Error));
        assert!(result.has_errors());
        assert_eq!(result.by_severity(Severity::Error).len(), 1);
    }
}
