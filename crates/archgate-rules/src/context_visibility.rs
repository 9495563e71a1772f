//! `context-visibility`: bounded contexts talk through public surfaces only.
//!
//! For every edge whose endpoints belong to two different contexts:
//!
//! 1. a target outside every `public` glob is a `non-public-target` violation;
//! 2. otherwise, if the source context declares `can-depend-on` and the target
//!    context is not listed, it is a `disallowed-context-dependency` violation.
//!
//! Edges touching an unmapped file are never checked.

use std::collections::HashMap;

use archgate_core::{ContextRule, Rule, RuleContext, RuleError, RuleKind, Severity, Violation};

use crate::meta::RuleMeta;

/// Reason reported when the target file is internal to its context.
pub const NON_PUBLIC_TARGET: &str = "non-public-target";

/// Reason reported when the source context does not declare the target context.
pub const DISALLOWED_CONTEXT_DEPENDENCY: &str = "disallowed-context-dependency";

/// Enforces context public surfaces and declared context dependencies.
#[derive(Debug, Clone)]
pub struct ContextVisibility {
    meta: RuleMeta,
    can_depend_on: HashMap<String, Vec<String>>,
}

impl ContextVisibility {
    /// Creates the rule from per-context declarations.
    ///
    /// Contexts without a `can-depend-on` list may depend on any context's
    /// public surface.
    #[must_use]
    pub fn new(contexts: &[ContextRule]) -> Self {
        Self {
            meta: RuleMeta::for_kind(RuleKind::ContextVisibility),
            can_depend_on: contexts
                .iter()
                .filter_map(|c| {
                    c.can_depend_on
                        .as_ref()
                        .map(|deps| (c.context.clone(), deps.clone()))
                })
                .collect(),
        }
    }

    /// Replaces the rule identity.
    #[must_use]
    pub fn with_meta(mut self, meta: RuleMeta) -> Self {
        self.meta = meta;
        self
    }

    fn declares(&self, from: &str, to: &str) -> bool {
        self.can_depend_on
            .get(from)
            .map_or(true, |deps| deps.iter().any(|d| d == to))
    }
}

impl Rule for ContextVisibility {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn kind(&self) -> RuleKind {
        RuleKind::ContextVisibility
    }

    fn severity(&self) -> Severity {
        self.meta.severity
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let mut violations = Vec::new();
        for edge in ctx.edges() {
            let (Some(from), Some(to)) = (ctx.context_of(&edge.from), ctx.context_of(&edge.to)) else {
                continue;
            };
            if from == to {
                continue;
            }

            let (reason, message) = if !ctx.is_public(&edge.to) {
                (
                    NON_PUBLIC_TARGET,
                    format!(
                        "Context '{from}' imports '{}', which is internal to context '{to}'",
                        edge.to
                    ),
                )
            } else if !self.declares(from, to) {
                (
                    DISALLOWED_CONTEXT_DEPENDENCY,
                    format!("Context '{from}' does not declare a dependency on context '{to}'"),
                )
            } else {
                continue;
            };

            let mut v = self
                .meta
                .violation(&edge.from, message)
                .with_metadata("reason", reason)
                .with_metadata("fromContext", from)
                .with_metadata("toContext", to)
                .with_metadata("target", edge.to.as_str());
            if let Some(range) = edge.range {
                v = v.with_range(range);
            }
            violations.push(v);
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgate_core::{ContextMapping, ContextResolver, DependencyEdge, Language, ProjectGraph, SourceFile};

    fn contexts() -> ContextResolver {
        let mapping = |name: &str| ContextMapping {
            name: name.into(),
            include: vec![format!("src/{name}/**")],
            exclude: Vec::new(),
            priority: 0,
            public: vec![format!("src/{name}/api/**")],
        };
        ContextResolver::new(&[mapping("billing"), mapping("orders"), mapping("shipping")]).unwrap()
    }

    fn graph(resolver: &ContextResolver, edges: &[(&str, &str)]) -> ProjectGraph {
        let mut g = ProjectGraph::new();
        for path in [
            "src/orders/service.ts",
            "src/billing/api/invoice.ts",
            "src/billing/internal/tax.ts",
            "src/shipping/api/label.ts",
            "src/util/log.ts",
        ] {
            let mut file = SourceFile::new(path, Language::TypeScript);
            file.context = resolver.resolve(path).map(str::to_owned);
            g.insert_file(file);
        }
        for (from, to) in edges {
            g.add_edge(DependencyEdge::import(*from, *to, "typescript"));
        }
        g
    }

    fn reasons(violations: &[Violation]) -> Vec<&str> {
        violations
            .iter()
            .map(|v| v.metadata["reason"].as_str().unwrap_or_default())
            .collect()
    }

    #[test]
    fn internal_target_is_flagged() {
        let resolver = contexts();
        let g = graph(
            &resolver,
            &[
                ("src/orders/service.ts", "src/billing/internal/tax.ts"),
                ("src/orders/service.ts", "src/billing/api/invoice.ts"),
            ],
        );
        let ctx = RuleContext::new(&g, &resolver);

        let violations = ContextVisibility::new(&[]).check(&ctx).unwrap();
        assert_eq!(reasons(&violations), vec![NON_PUBLIC_TARGET]);
        assert_eq!(violations[0].metadata["target"], "src/billing/internal/tax.ts");
    }

    #[test]
    fn undeclared_context_is_flagged() {
        let resolver = contexts();
        let g = graph(
            &resolver,
            &[
                ("src/orders/service.ts", "src/billing/api/invoice.ts"),
                ("src/orders/service.ts", "src/shipping/api/label.ts"),
            ],
        );
        let ctx = RuleContext::new(&g, &resolver);

        let rule = ContextVisibility::new(&[ContextRule {
            context: "orders".into(),
            can_depend_on: Some(vec!["billing".into()]),
        }]);
        let violations = rule.check(&ctx).unwrap();
        assert_eq!(reasons(&violations), vec![DISALLOWED_CONTEXT_DEPENDENCY]);
        assert_eq!(violations[0].metadata["toContext"], "shipping");
    }

    #[test]
    fn same_context_and_unmapped_edges_pass() {
        let resolver = contexts();
        let g = graph(
            &resolver,
            &[
                ("src/billing/api/invoice.ts", "src/billing/internal/tax.ts"),
                ("src/orders/service.ts", "src/util/log.ts"),
                ("src/util/log.ts", "src/billing/internal/tax.ts"),
            ],
        );
        let ctx = RuleContext::new(&g, &resolver);
        assert!(ContextVisibility::new(&[]).check(&ctx).unwrap().is_empty());
    }
}
