//! `natural-language`: free-text rules are accepted but not evaluated.

use archgate_core::{Rule, RuleContext, RuleError, RuleKind, Severity, Violation};

use crate::meta::RuleMeta;

/// A rule stated in prose. Never produces violations.
#[derive(Debug, Clone)]
pub struct NaturalLanguage {
    meta: RuleMeta,
    text: String,
}

impl NaturalLanguage {
    /// Wraps the rule text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            meta: RuleMeta::for_kind(RuleKind::NaturalLanguage),
            text: text.into(),
        }
    }

    /// Replaces the rule identity.
    #[must_use]
    pub fn with_meta(mut self, meta: RuleMeta) -> Self {
        self.meta = meta;
        self
    }

    /// The rule text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Rule for NaturalLanguage {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn kind(&self) -> RuleKind {
        RuleKind::NaturalLanguage
    }

    fn severity(&self) -> Severity {
        self.meta.severity
    }

    fn check(&self, _ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        Ok(Vec::new())
    }
}
