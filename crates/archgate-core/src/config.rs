//! TOML configuration for layers, contexts, capabilities and rules.
//!
//! ```toml
//! [analyzer]
//! exclude = ["**/generated/**"]
//!
//! [[layers]]
//! name = "domain"
//!
//! [[layer-mappings]]
//! name = "domain"
//! include = ["src/domain/**"]
//! priority = 10
//!
//! [[rules]]
//! kind = "forbidden-layer-import"
//! from = "domain"
//! to = "infra"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::pattern::GlobPattern;
use crate::rule::RuleKind;
use crate::types::Severity;

/// Top-level project configuration.
///
/// Treated as an immutable snapshot once loaded; resolvers copy what they need.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectConfig {
    /// Scanner settings.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Declared layers.
    #[serde(default)]
    pub layers: Vec<LayerDef>,

    /// Explicit path-to-layer mappings.
    #[serde(default)]
    pub layer_mappings: Vec<LayerMapping>,

    /// Path-to-context mappings.
    #[serde(default)]
    pub context_mappings: Vec<ContextMapping>,

    /// Capability detectors. `None` selects the built-in table.
    #[serde(default)]
    pub capabilities: Option<Vec<CapabilityDef>>,

    /// Configured rules.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// TypeScript path aliases (overrides `tsconfig.json`).
    #[serde(default)]
    pub typescript: Option<TypeScriptPaths>,
}

/// Scanner-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AnalyzerConfig {
    /// Glob patterns to exclude from the scan.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Maximum directory depth of the file walk.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Worker threads for extraction. `None` or `1` runs sequentially.
    #[serde(default)]
    pub parallelism: Option<usize>,

    /// Whether to use the content-hash scan cache.
    #[serde(default = "default_true")]
    pub cache: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            exclude: vec!["**/node_modules/**".to_string(), "**/dist/**".to_string()],
            max_depth: default_max_depth(),
            parallelism: None,
            cache: true,
        }
    }
}

fn default_max_depth() -> usize {
    64
}

fn default_true() -> bool {
    true
}

/// A named architecture layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDef {
    /// Layer name (e.g., `"domain"`).
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Shorthand include globs, equivalent to a priority-0 mapping.
    #[serde(default)]
    pub paths: Vec<String>,
}

/// Maps paths to a layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerMapping {
    /// Layer name.
    pub name: String,
    /// Globs a path must match.
    pub include: Vec<String>,
    /// Globs that veto an include match.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Higher wins. Ties go to the first declared mapping.
    #[serde(default)]
    pub priority: i32,
}

/// Maps paths to a bounded context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextMapping {
    /// Context name.
    pub name: String,
    /// Globs a path must match.
    pub include: Vec<String>,
    /// Globs that veto an include match.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Higher wins. Ties go to the first declared mapping.
    #[serde(default)]
    pub priority: i32,
    /// Globs of files other contexts may depend on.
    #[serde(default)]
    pub public: Vec<String>,
}

/// A capability detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityDef {
    /// Capability name (e.g., `"network"`).
    pub name: String,
    /// Import patterns: exact package, `/` or `.` prefix, or trailing `*`.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Call tokens searched for on each source line (e.g., `"fetch("`).
    #[serde(default)]
    pub calls: Vec<String>,
}

/// TypeScript `baseUrl` / `paths` for alias resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeScriptPaths {
    /// Base directory for alias targets, relative to the project root.
    #[serde(default, rename = "base-url", alias = "baseUrl")]
    pub base_url: Option<String>,
    /// Alias pattern to target patterns, e.g. `"@app/*" = ["src/app/*"]`.
    #[serde(default)]
    pub paths: BTreeMap<String, Vec<String>>,
}

/// One configured rule: shared presentation fields plus the variant's check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Rule id used in violations. Defaults to the kind name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Violation severity. Defaults to `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Replaces the generated violation message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Design document reference attached to violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// The variant-specific check.
    #[serde(flatten)]
    pub check: RuleCheck,
}

impl RuleConfig {
    /// Wraps a check with default presentation fields.
    #[must_use]
    pub fn new(check: RuleCheck) -> Self {
        Self {
            id: None,
            severity: None,
            message: None,
            doc: None,
            check,
        }
    }

    /// Sets the rule id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Effective rule id.
    #[must_use]
    pub fn rule_id(&self) -> &str {
        self.id.as_deref().unwrap_or_else(|| self.check.kind().name())
    }

    /// Effective severity.
    #[must_use]
    pub fn effective_severity(&self) -> Severity {
        self.severity.unwrap_or(Severity::Error)
    }
}

/// A per-context dependency declaration for `context-visibility`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContextRule {
    /// Source context name.
    pub context: String,
    /// Contexts this one may depend on. `None` means unrestricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_depend_on: Option<Vec<String>>,
}

/// The discriminated rule variants, keyed by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RuleCheck {
    /// Edges from layer `from` to layer `to` are forbidden.
    ForbiddenLayerImport {
        /// Source layer.
        from: String,
        /// Target layer.
        to: String,
    },
    /// Edges from layer `from` may only reach the listed layers.
    AllowedLayerImport {
        /// Source layer.
        from: String,
        /// Allowed target layers.
        allowed: Vec<String>,
    },
    /// Files matching `pattern` must live in `required_layer`.
    FilePatternLayer {
        /// File glob.
        pattern: String,
        /// Layer the files must resolve to.
        #[serde(rename = "required-layer")]
        required_layer: String,
    },
    /// Files may have at most `max` outgoing edges.
    MaxDependencies {
        /// Maximum outgoing edges.
        max: usize,
        /// Only check files of this layer.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<String>,
    },
    /// The file graph must be acyclic.
    CyclicDependency,
    /// External packages must be allow-listed.
    ExternalDependency {
        /// Allowed package patterns.
        allowed: Vec<String>,
        /// Only check files of this layer.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<String>,
    },
    /// Only the listed capabilities may be used.
    AllowedCapability {
        /// Allowed capability names.
        allowed: Vec<String>,
        /// Only check files of this layer.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<String>,
    },
    /// The listed capabilities must not be used.
    ForbiddenCapability {
        /// Forbidden capability names.
        forbidden: Vec<String>,
        /// Only check files of this layer.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<String>,
    },
    /// Cross-context edges must target public files and declared contexts.
    ContextVisibility {
        /// Per-context dependency declarations.
        #[serde(default)]
        contexts: Vec<ContextRule>,
    },
    /// Free-text rule; accepted but not evaluated.
    NaturalLanguage {
        /// The rule text.
        #[serde(default)]
        text: String,
    },
}

impl RuleCheck {
    /// The catalogue entry for this variant.
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::ForbiddenLayerImport { .. } => RuleKind::ForbiddenLayerImport,
            Self::AllowedLayerImport { .. } => RuleKind::AllowedLayerImport,
            Self::FilePatternLayer { .. } => RuleKind::FilePatternLayer,
            Self::MaxDependencies { .. } => RuleKind::MaxDependencies,
            Self::CyclicDependency => RuleKind::CyclicDependency,
            Self::ExternalDependency { .. } => RuleKind::ExternalDependency,
            Self::AllowedCapability { .. } => RuleKind::AllowedCapability,
            Self::ForbiddenCapability { .. } => RuleKind::ForbiddenCapability,
            Self::ContextVisibility { .. } => RuleKind::ContextVisibility,
            Self::NaturalLanguage { .. } => RuleKind::NaturalLanguage,
        }
    }

    /// Layer names referenced by this check.
    fn referenced_layers(&self) -> Vec<&str> {
        match self {
            Self::ForbiddenLayerImport { from, to } => vec![from.as_str(), to.as_str()],
            Self::AllowedLayerImport { from, allowed } => std::iter::once(from.as_str())
                .chain(allowed.iter().map(String::as_str))
                .collect(),
            Self::FilePatternLayer { required_layer, .. } => vec![required_layer.as_str()],
            Self::MaxDependencies { layer, .. }
            | Self::ExternalDependency { layer, .. }
            | Self::AllowedCapability { layer, .. }
            | Self::ForbiddenCapability { layer, .. } => layer.iter().map(String::as_str).collect(),
            Self::CyclicDependency | Self::ContextVisibility { .. } | Self::NaturalLanguage { .. } => {
                Vec::new()
            }
        }
    }
}

/// Errors when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },

    /// A rule uses a `kind` no rule implements.
    #[error("rules[{index}]: unknown rule kind `{kind}`")]
    UnknownRuleKind {
        /// Position in `[[rules]]`.
        index: usize,
        /// The unrecognised kind.
        kind: String,
    },

    /// A glob in a mapping or rule does not compile.
    #[error("{context}: {source}")]
    Pattern {
        /// Where the pattern was found (e.g. `layer-mappings[0].include`).
        context: String,
        /// The underlying pattern error.
        source: crate::pattern::PatternError,
    },

    /// Config is structurally invalid.
    #[error("config validation: {0}")]
    Validation(String),
}

impl ProjectConfig {
    /// Load from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse from a TOML string.
    ///
    /// Unknown rule kinds reject the whole configuration; a partially loaded
    /// rule set would report a misleadingly clean result.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is invalid or a rule kind is unknown.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: toml::Table = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        check_rule_kinds(&raw)?;

        toml::Value::Table(raw)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse {
                message: e.to_string(),
            })
    }

    /// Names of all declared layers, in declaration order.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }

    /// Explicit mappings followed by the implicit mappings of layer `paths`.
    #[must_use]
    pub fn effective_layer_mappings(&self) -> Vec<LayerMapping> {
        let implicit = self
            .layers
            .iter()
            .filter(|l| !l.paths.is_empty())
            .map(|l| LayerMapping {
                name: l.name.clone(),
                include: l.paths.clone(),
                exclude: Vec::new(),
                priority: 0,
            });
        self.layer_mappings.iter().cloned().chain(implicit).collect()
    }

    /// Validate config consistency.
    ///
    /// Mappings naming undeclared layers are not errors (they are skipped
    /// with a warning at resolution time); rules naming undeclared layers are.
    ///
    /// # Errors
    ///
    /// Returns error describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for layer in &self.layers {
            if !seen.insert(layer.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "layer '{}' is declared more than once",
                    layer.name
                )));
            }
        }

        for (i, m) in self.effective_layer_mappings().iter().enumerate() {
            compile_context(&m.include, || format!("layer-mappings[{i}].include"))?;
            compile_context(&m.exclude, || format!("layer-mappings[{i}].exclude"))?;
        }
        for (i, m) in self.context_mappings.iter().enumerate() {
            compile_context(&m.include, || format!("context-mappings[{i}].include"))?;
            compile_context(&m.exclude, || format!("context-mappings[{i}].exclude"))?;
            compile_context(&m.public, || format!("context-mappings[{i}].public"))?;
        }

        for (i, rule) in self.rules.iter().enumerate() {
            for layer in rule.check.referenced_layers() {
                if !seen.contains(layer) {
                    return Err(ConfigError::Validation(format!(
                        "rules[{i}] ({}): unknown layer '{layer}'",
                        rule.rule_id()
                    )));
                }
            }
            if let RuleCheck::FilePatternLayer { pattern, .. } = &rule.check {
                GlobPattern::new(pattern).map_err(|e| ConfigError::Pattern {
                    context: format!("rules[{i}].pattern"),
                    source: e,
                })?;
            }
        }

        Ok(())
    }
}

fn compile_context(patterns: &[String], context: impl Fn() -> String) -> Result<(), ConfigError> {
    GlobPattern::compile_all(patterns)
        .map(|_| ())
        .map_err(|e| ConfigError::Pattern {
            context: context(),
            source: e,
        })
}

fn check_rule_kinds(raw: &toml::Table) -> Result<(), ConfigError> {
    let Some(rules) = raw.get("rules").and_then(toml::Value::as_array) else {
        return Ok(());
    };
    for (index, rule) in rules.iter().enumerate() {
        let kind = rule
            .get("kind")
            .and_then(toml::Value::as_str)
            .ok_or_else(|| ConfigError::Parse {
                message: format!("rules[{index}]: missing `kind`"),
            })?;
        if RuleKind::from_name(kind).is_none() {
            return Err(ConfigError::UnknownRuleKind {
                index,
                kind: kind.to_string(),
            });
        }
    }
    Ok(())
}
