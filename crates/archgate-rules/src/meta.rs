//! Identity and presentation shared by every rule instance.

use archgate_core::{RuleConfig, RuleKind, Severity, Violation};

/// Id, severity and configured overrides of one rule instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMeta {
    /// Id reported on violations.
    pub id: String,
    /// Severity of produced violations.
    pub severity: Severity,
    /// Replaces every generated message when set.
    pub message: Option<String>,
    /// Design document reference attached to violations.
    pub doc: Option<String>,
}

impl RuleMeta {
    /// Default identity for a kind: id is the kind name, severity `error`.
    #[must_use]
    pub fn for_kind(kind: RuleKind) -> Self {
        Self {
            id: kind.name().to_owned(),
            severity: Severity::Error,
            message: None,
            doc: None,
        }
    }

    /// Identity taken from a `[[rules]]` entry.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        Self {
            id: config.rule_id().to_owned(),
            severity: config.effective_severity(),
            message: config.message.clone(),
            doc: config.doc.clone(),
        }
    }

    /// Sets the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Starts a violation for `file`, applying the message override and doc reference.
    #[must_use]
    pub fn violation(&self, file: &str, generated: String) -> Violation {
        let message = self.message.clone().unwrap_or(generated);
        let violation = Violation::new(&self.id, self.severity, file, message);
        match &self.doc {
            Some(doc) => violation.with_doc_ref(doc),
            None => violation,
        }
    }
}
