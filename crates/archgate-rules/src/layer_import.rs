//! Layer direction rules: `forbidden-layer-import` and `allowed-layer-import`.
//!
//! Both look at every resolved edge and compare the layers of its two
//! endpoints. Edges whose target has no layer never violate either rule.

use archgate_core::{DependencyEdge, Rule, RuleContext, RuleError, RuleKind, Severity, Violation};

use crate::meta::RuleMeta;

/// Forbids edges from one layer to another.
#[derive(Debug, Clone)]
pub struct ForbiddenLayerImport {
    meta: RuleMeta,
    from: String,
    to: String,
}

impl ForbiddenLayerImport {
    /// Forbids `from` → `to` edges.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            meta: RuleMeta::for_kind(RuleKind::ForbiddenLayerImport),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Replaces the rule identity.
    #[must_use]
    pub fn with_meta(mut self, meta: RuleMeta) -> Self {
        self.meta = meta;
        self
    }
}

impl Rule for ForbiddenLayerImport {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn kind(&self) -> RuleKind {
        RuleKind::ForbiddenLayerImport
    }

    fn severity(&self) -> Severity {
        self.meta.severity
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        Ok(ctx
            .edges()
            .iter()
            .filter(|e| {
                ctx.layer_of(&e.from) == Some(self.from.as_str())
                    && ctx.layer_of(&e.to) == Some(self.to.as_str())
            })
            .map(|e| {
                edge_violation(
                    &self.meta,
                    e,
                    &self.from,
                    &self.to,
                    format!(
                        "Layer '{}' must not import from layer '{}' ({})",
                        self.from, self.to, e.to
                    ),
                )
                .with_suggestion(format!(
                    "Depend on an abstraction outside '{}' instead of importing it directly",
                    self.to
                ))
            })
            .collect())
    }
}

/// Restricts the layers a layer may import from.
///
/// The layer itself counts like any other: list it in `allowed` to permit
/// imports within the layer.
#[derive(Debug, Clone)]
pub struct AllowedLayerImport {
    meta: RuleMeta,
    from: String,
    allowed: Vec<String>,
}

impl AllowedLayerImport {
    /// Allows `from` to import only from `allowed`.
    #[must_use]
    pub fn new<S: Into<String>>(from: impl Into<String>, allowed: impl IntoIterator<Item = S>) -> Self {
        Self {
            meta: RuleMeta::for_kind(RuleKind::AllowedLayerImport),
            from: from.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Replaces the rule identity.
    #[must_use]
    pub fn with_meta(mut self, meta: RuleMeta) -> Self {
        self.meta = meta;
        self
    }

    fn permits(&self, target: &str) -> bool {
        self.allowed.iter().any(|a| a == target)
    }
}

impl Rule for AllowedLayerImport {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn kind(&self) -> RuleKind {
        RuleKind::AllowedLayerImport
    }

    fn severity(&self) -> Severity {
        self.meta.severity
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let mut violations = Vec::new();
        for edge in ctx.edges() {
            if ctx.layer_of(&edge.from) != Some(self.from.as_str()) {
                continue;
            }
            let Some(target) = ctx.layer_of(&edge.to) else {
                continue;
            };
            if self.permits(target) {
                continue;
            }
            let allowed = if self.allowed.is_empty() {
                "none".to_owned()
            } else {
                self.allowed.join(", ")
            };
            violations.push(
                edge_violation(
                    &self.meta,
                    edge,
                    &self.from,
                    target,
                    format!(
                        "Layer '{}' may not import from layer '{target}' ({}); allowed: {allowed}",
                        self.from, edge.to
                    ),
                )
                .with_metadata("allowed", self.allowed.clone()),
            );
        }
        Ok(violations)
    }
}

fn edge_violation(
    meta: &RuleMeta,
    edge: &DependencyEdge,
    from_layer: &str,
    to_layer: &str,
    message: String,
) -> Violation {
    let mut v = meta
        .violation(&edge.from, message)
        .with_metadata("fromLayer", from_layer)
        .with_metadata("toLayer", to_layer)
        .with_metadata("target", edge.to.as_str());
    if let Some(range) = edge.range {
        v = v.with_range(range);
    }
    v
}
