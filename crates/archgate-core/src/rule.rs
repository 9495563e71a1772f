//! Rule trait and the static rule catalogue.

use crate::context::RuleContext;
use crate::types::{Severity, Violation};

/// A structural rule evaluated against the whole project graph.
///
/// Rules are read-only over the [`RuleContext`] and must not rely on
/// evaluation order; the engine may run them in any sequence.
///
/// # Example
///
/// ```ignore
/// use archgate_core::{Rule, RuleContext, RuleError, RuleKind, Severity, Violation};
///
/// pub struct NoOrphans;
///
/// impl Rule for NoOrphans {
///     fn id(&self) -> &str { "no-orphans" }
///     fn kind(&self) -> RuleKind { RuleKind::MaxDependencies }
///     fn severity(&self) -> Severity { Severity::Info }
///
///     fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
///         Ok(ctx
///             .files()
///             .filter(|f| ctx.dependency_count(&f.path) == 0)
///             .map(|f| Violation::new(self.id(), self.severity(), &f.path, "no imports"))
///             .collect())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Id reported on violations (configured id or the kind name).
    fn id(&self) -> &str;

    /// Catalogue entry this rule implements.
    fn kind(&self) -> RuleKind;

    /// Severity of produced violations.
    fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks the project and returns any violations found.
    ///
    /// # Errors
    ///
    /// Returns an error when the rule cannot be evaluated; the engine logs it
    /// and continues with the remaining rules.
    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Error raised while evaluating a rule.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The rule's input is inconsistent with the graph.
    #[error("rule `{rule_id}` failed: {message}")]
    Failed {
        /// Failing rule.
        rule_id: String,
        /// What went wrong.
        message: String,
    },
}

impl RuleError {
    /// Shorthand constructor.
    #[must_use]
    pub fn failed(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }
}

/// Every rule kind the engine knows, with its config name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// `forbidden-layer-import`
    ForbiddenLayerImport,
    /// `allowed-layer-import`
    AllowedLayerImport,
    /// `file-pattern-layer`
    FilePatternLayer,
    /// `max-dependencies`
    MaxDependencies,
    /// `cyclic-dependency`
    CyclicDependency,
    /// `external-dependency`
    ExternalDependency,
    /// `allowed-capability`
    AllowedCapability,
    /// `forbidden-capability`
    ForbiddenCapability,
    /// `context-visibility`
    ContextVisibility,
    /// `natural-language`
    NaturalLanguage,
}

impl RuleKind {
    /// The full catalogue, in documentation order.
    pub const ALL: &'static [RuleKind] = &[
        Self::ForbiddenLayerImport,
        Self::AllowedLayerImport,
        Self::FilePatternLayer,
        Self::MaxDependencies,
        Self::CyclicDependency,
        Self::ExternalDependency,
        Self::AllowedCapability,
        Self::ForbiddenCapability,
        Self::ContextVisibility,
        Self::NaturalLanguage,
    ];

    /// Kebab-case name used as `kind` in configuration.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ForbiddenLayerImport => "forbidden-layer-import",
            Self::AllowedLayerImport => "allowed-layer-import",
            Self::FilePatternLayer => "file-pattern-layer",
            Self::MaxDependencies => "max-dependencies",
            Self::CyclicDependency => "cyclic-dependency",
            Self::ExternalDependency => "external-dependency",
            Self::AllowedCapability => "allowed-capability",
            Self::ForbiddenCapability => "forbidden-capability",
            Self::ContextVisibility => "context-visibility",
            Self::NaturalLanguage => "natural-language",
        }
    }

    /// One-line description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::ForbiddenLayerImport => "Forbid imports from one layer to another",
            Self::AllowedLayerImport => "Restrict a layer's imports to an allow-list of layers",
            Self::FilePatternLayer => "Require files matching a glob to live in a layer",
            Self::MaxDependencies => "Limit the number of outgoing imports per file",
            Self::CyclicDependency => "Forbid import cycles between files",
            Self::ExternalDependency => "Restrict external packages to an allow-list",
            Self::AllowedCapability => "Restrict detected capabilities to an allow-list",
            Self::ForbiddenCapability => "Forbid detected capabilities",
            Self::ContextVisibility => "Enforce public surfaces and dependencies between contexts",
            Self::NaturalLanguage => "Free-text rule (not evaluated)",
        }
    }

    /// Looks up a kind by its config name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in RuleKind::ALL {
            assert_eq!(RuleKind::from_name(kind.name()), Some(*kind));
            assert!(!kind.description().is_empty());
        }
        assert_eq!(RuleKind::from_name("layer-dependency"), None);
    }

    #[test]
    fn rule_error_message() {
        let e = RuleError::failed("cycles", "graph is inconsistent");
        assert_eq!(e.to_string(), "rule `cycles` failed: graph is inconsistent");
    }
}
