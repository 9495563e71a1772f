//! `max-dependencies`: caps the number of outgoing edges per file.

use archgate_core::{Rule, RuleContext, RuleError, RuleKind, Severity, Violation};

use crate::meta::RuleMeta;

/// Flags files with more than `max` outgoing edges.
#[derive(Debug, Clone)]
pub struct MaxDependencies {
    meta: RuleMeta,
    max: usize,
    layer: Option<String>,
}

impl MaxDependencies {
    /// Creates the rule for all files.
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self {
            meta: RuleMeta::for_kind(RuleKind::MaxDependencies),
            max,
            layer: None,
        }
    }

    /// Restricts the rule to files of one layer.
    #[must_use]
    pub fn in_layer(mut self, layer: Option<String>) -> Self {
        self.layer = layer;
        self
    }

    /// Replaces the rule identity.
    #[must_use]
    pub fn with_meta(mut self, meta: RuleMeta) -> Self {
        self.meta = meta;
        self
    }
}

impl Rule for MaxDependencies {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn kind(&self) -> RuleKind {
        RuleKind::MaxDependencies
    }

    fn severity(&self) -> Severity {
        self.meta.severity
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let mut violations = Vec::new();
        for file in ctx.files() {
            if let Some(layer) = &self.layer {
                if file.layer.as_ref() != Some(layer) {
                    continue;
                }
            }
            let count = ctx.dependency_count(&file.path);
            if count > self.max {
                violations.push(
                    self.meta
                        .violation(
                            &file.path,
                            format!("File has {count} dependencies (max {})", self.max),
                        )
                        .with_suggestion("Split the file or introduce a facade")
                        .with_metadata("count", count)
                        .with_metadata("max", self.max),
                );
            }
        }
        Ok(violations)
    }
}
