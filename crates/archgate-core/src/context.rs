//! Context types for rule execution.

use std::collections::HashMap;

use crate::graph::{DependencyEdge, ProjectGraph, SourceFile};
use crate::mapping::ContextResolver;

/// Read-only view of the project handed to every rule.
///
/// Built once per run and shared by all rules. Layer, context and capability
/// data are already attached to each [`SourceFile`]; the context only adds
/// derived lookups.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    /// The dependency graph.
    pub graph: &'a ProjectGraph,
    /// Context mappings, for public-surface checks.
    pub contexts: &'a ContextResolver,
    dependency_counts: HashMap<&'a str, usize>,
}

impl<'a> RuleContext<'a> {
    /// Creates a rule context over a graph.
    #[must_use]
    pub fn new(graph: &'a ProjectGraph, contexts: &'a ContextResolver) -> Self {
        Self {
            graph,
            contexts,
            dependency_counts: graph.dependency_counts(),
        }
    }

    /// All files in path order.
    pub fn files(&self) -> impl Iterator<Item = &'a SourceFile> + 'a {
        self.graph.files.values()
    }

    /// All edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &'a [DependencyEdge] {
        &self.graph.edges
    }

    /// Looks up a file.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&'a SourceFile> {
        self.graph.files.get(path)
    }

    /// Layer of a file, if the file is known and mapped.
    #[must_use]
    pub fn layer_of(&self, path: &str) -> Option<&'a str> {
        self.file(path).and_then(|f| f.layer.as_deref())
    }

    /// Context of a file, if the file is known and mapped.
    #[must_use]
    pub fn context_of(&self, path: &str) -> Option<&'a str> {
        self.file(path).and_then(|f| f.context.as_deref())
    }

    /// Number of outgoing edges of a file.
    #[must_use]
    pub fn dependency_count(&self, path: &str) -> usize {
        self.dependency_counts.get(path).copied().unwrap_or(0)
    }

    /// Whether a path is part of some context's public surface.
    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        self.contexts.is_public(path)
    }
}
