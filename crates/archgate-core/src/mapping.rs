//! Layer and context resolution: maps file paths to named buckets.
//!
//! Mappings are tried in priority order (highest first, declaration order on
//! ties). A mapping accepts a path when one of its `include` globs matches and
//! none of its `exclude` globs do; an exclude match only rules out that one
//! mapping, later mappings still get their turn.

use std::collections::HashSet;

use tracing::warn;

use crate::config::{ConfigError, ContextMapping, LayerMapping, ProjectConfig};
use crate::pattern::{any_matches, GlobPattern};

#[derive(Debug, Clone)]
struct CompiledMapping {
    name: String,
    include: Vec<GlobPattern>,
    exclude: Vec<GlobPattern>,
    priority: i32,
}

impl CompiledMapping {
    fn compile(
        name: &str,
        include: &[String],
        exclude: &[String],
        priority: i32,
        context: &str,
    ) -> Result<Self, ConfigError> {
        let compile = |patterns: &[String], field: &str| {
            GlobPattern::compile_all(patterns).map_err(|e| ConfigError::Pattern {
                context: format!("{context}.{field}"),
                source: e,
            })
        };
        Ok(Self {
            name: name.to_string(),
            include: compile(include, "include")?,
            exclude: compile(exclude, "exclude")?,
            priority,
        })
    }

    fn accepts(&self, path: &str) -> bool {
        !any_matches(&self.exclude, path) && any_matches(&self.include, path)
    }
}

/// Priority-ordered mapping list shared by both resolvers.
#[derive(Debug, Clone, Default)]
struct Classifier {
    mappings: Vec<CompiledMapping>,
}

impl Classifier {
    fn new(mut mappings: Vec<CompiledMapping>) -> Self {
        // `sort_by` is stable, so equal priorities keep declaration order.
        mappings.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { mappings }
    }

    fn resolve(&self, path: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.accepts(path))
            .map(|m| m.name.as_str())
    }
}

/// Resolves project-relative paths to declared architecture layers.
#[derive(Debug, Clone, Default)]
pub struct LayerResolver {
    classifier: Classifier,
    declared: Vec<String>,
}

impl LayerResolver {
    /// Builds a resolver from declared layer names and mappings.
    ///
    /// Mappings naming an undeclared layer are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapping glob does not compile.
    pub fn new(declared: &[&str], mappings: &[LayerMapping]) -> Result<Self, ConfigError> {
        let known: HashSet<&str> = declared.iter().copied().collect();
        let mut compiled = Vec::new();
        for (i, m) in mappings.iter().enumerate() {
            if !known.contains(m.name.as_str()) {
                warn!("Ignoring layer mapping {i}: layer '{}' is not declared", m.name);
                continue;
            }
            compiled.push(CompiledMapping::compile(
                &m.name,
                &m.include,
                &m.exclude,
                m.priority,
                &format!("layer-mappings[{i}]"),
            )?);
        }
        Ok(Self {
            classifier: Classifier::new(compiled),
            declared: declared.iter().map(|s| (*s).to_string()).collect(),
        })
    }

    /// Builds a resolver from the layers and mappings of a config.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapping glob does not compile.
    pub fn from_config(config: &ProjectConfig) -> Result<Self, ConfigError> {
        Self::new(&config.layer_names(), &config.effective_layer_mappings())
    }

    /// Which layer does this path belong to?
    ///
    /// Never returns a name that is not declared.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.classifier.resolve(path)
    }

    /// Declared layer names.
    #[must_use]
    pub fn declared(&self) -> &[String] {
        &self.declared
    }
}

/// Resolves paths to bounded contexts and answers visibility questions.
#[derive(Debug, Clone, Default)]
pub struct ContextResolver {
    classifier: Classifier,
    public: Vec<GlobPattern>,
}

impl ContextResolver {
    /// Builds a resolver from context mappings. Every mapping name declares a context.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapping glob does not compile.
    pub fn new(mappings: &[ContextMapping]) -> Result<Self, ConfigError> {
        let mut compiled = Vec::new();
        let mut public = Vec::new();
        for (i, m) in mappings.iter().enumerate() {
            let context = format!("context-mappings[{i}]");
            compiled.push(CompiledMapping::compile(
                &m.name,
                &m.include,
                &m.exclude,
                m.priority,
                &context,
            )?);
            public.extend(GlobPattern::compile_all(&m.public).map_err(|e| {
                ConfigError::Pattern {
                    context: format!("{context}.public"),
                    source: e,
                }
            })?);
        }
        Ok(Self {
            classifier: Classifier::new(compiled),
            public,
        })
    }

    /// Builds a resolver from the context mappings of a config.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapping glob does not compile.
    pub fn from_config(config: &ProjectConfig) -> Result<Self, ConfigError> {
        Self::new(&config.context_mappings)
    }

    /// Which context does this path belong to?
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.classifier.resolve(path)
    }

    /// True if any mapping declares the path public, whichever context owns it.
    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        any_matches(&self.public, path)
    }

    /// True if no context mappings are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classifier.mappings.is_empty()
    }
}
