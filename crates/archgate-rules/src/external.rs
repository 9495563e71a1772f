//! `external-dependency`: allow-list for third-party packages.

use archgate_core::utils::package_matches;
use archgate_core::{Rule, RuleContext, RuleError, RuleKind, Severity, Violation};

use crate::meta::RuleMeta;

/// Flags external imports that match none of the allowed package patterns.
///
/// A pattern matches a package exactly, as a `/` or `.` path prefix
/// (`@nestjs` allows `@nestjs/core`), or as a trailing-`*` prefix.
#[derive(Debug, Clone)]
pub struct ExternalDependency {
    meta: RuleMeta,
    allowed: Vec<String>,
    layer: Option<String>,
}

impl ExternalDependency {
    /// Creates the rule for all files.
    #[must_use]
    pub fn new<S: Into<String>>(allowed: impl IntoIterator<Item = S>) -> Self {
        Self {
            meta: RuleMeta::for_kind(RuleKind::ExternalDependency),
            allowed: allowed.into_iter().map(Into::into).collect(),
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

    fn is_allowed(&self, package: &str) -> bool {
        self.allowed.iter().any(|p| package_matches(package, p))
    }
}

impl Rule for ExternalDependency {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn kind(&self) -> RuleKind {
        RuleKind::ExternalDependency
    }

    fn severity(&self) -> Severity {
        self.meta.severity
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let mut violations = Vec::new();
        for file in ctx.files() {
            if self.layer.is_some() && file.layer != self.layer {
                continue;
            }
            for import in file.external_imports.iter().filter(|e| !self.is_allowed(&e.package)) {
                let mut v = self
                    .meta
                    .violation(
                        &file.path,
                        format!("External dependency '{}' is not allowed", import.package),
                    )
                    .with_metadata("package", import.package.as_str());
                if let Some(range) = import.range {
                    v = v.with_range(range);
                }
                violations.push(v);
            }
        }
        Ok(violations)
    }
}
