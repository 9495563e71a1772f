//! `file-pattern-layer`: files matching a glob must live in a given layer.

use archgate_core::{
    GlobPattern, PatternError, Rule, RuleContext, RuleError, RuleKind, Severity, Violation,
};

use crate::meta::RuleMeta;

/// Requires files matching `pattern` to resolve to `required_layer`.
///
/// Unmapped files count as being in the wrong layer.
#[derive(Debug, Clone)]
pub struct FilePatternLayer {
    meta: RuleMeta,
    pattern: GlobPattern,
    required_layer: String,
}

impl FilePatternLayer {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid glob.
    pub fn new(pattern: &str, required_layer: impl Into<String>) -> Result<Self, PatternError> {
        Ok(Self {
            meta: RuleMeta::for_kind(RuleKind::FilePatternLayer),
            pattern: GlobPattern::new(pattern)?,
            required_layer: required_layer.into(),
        })
    }

    /// Replaces the rule identity.
    #[must_use]
    pub fn with_meta(mut self, meta: RuleMeta) -> Self {
        self.meta = meta;
        self
    }
}

impl Rule for FilePatternLayer {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn kind(&self) -> RuleKind {
        RuleKind::FilePatternLayer
    }

    fn severity(&self) -> Severity {
        self.meta.severity
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        Ok(ctx
            .files()
            .filter(|f| self.pattern.matches(&f.path))
            .filter(|f| f.layer.as_deref() != Some(self.required_layer.as_str()))
            .map(|f| {
                let actual = f.layer.as_deref().unwrap_or("unmapped");
                self.meta
                    .violation(
                        &f.path,
                        format!(
                            "Files matching '{}' must be in layer '{}', found '{actual}'",
                            self.pattern.as_str(),
                            self.required_layer
                        ),
                    )
                    .with_metadata("requiredLayer", self.required_layer.as_str())
                    .with_metadata("actualLayer", f.layer.clone())
            })
            .collect())
    }
}
