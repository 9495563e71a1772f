//! Dependency graph model.
//!
//! A [`ProjectGraph`] is rebuilt from scratch on every run. Files are keyed by
//! their project-relative path (forward slashes) in an ordered map so that
//! iteration, and therefore every rule's output, is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::types::SourceRange;

/// Source language of a scanned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// `.ts`, `.tsx`, `.mts`, `.cts`
    TypeScript,
    /// `.js`, `.jsx`, `.mjs`, `.cjs`
    JavaScript,
    /// `.py`
    Python,
    /// `.java`
    Java,
    /// `.kt`, `.kts`
    Kotlin,
}

impl Language {
    /// Detects the language from a file path's extension.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit_once('.').map(|(_, ext)| ext)?;
        match ext {
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "py" => Some(Self::Python),
            "java" => Some(Self::Java),
            "kt" | "kts" => Some(Self::Kotlin),
            _ => None,
        }
    }

    /// Lowercase language name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Kotlin => "kotlin",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capability occurrence detected in a file (e.g. a `network` import).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedCapability {
    /// Capability name (e.g. `"network"`).
    pub name: String,
    /// Line of the occurrence (1-indexed), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// What triggered detection (an import specifier or a call token).
    pub evidence: String,
}

/// A third-party package imported by a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalImport {
    /// Package name (`lodash`, `@scope/name`, `requests`, `java.util`).
    pub package: String,
    /// Location of the first import of the package in the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
}

impl ExternalImport {
    /// An external import with a known location.
    #[must_use]
    pub fn new(package: impl Into<String>, range: SourceRange) -> Self {
        Self {
            package: package.into(),
            range: Some(range),
        }
    }

    /// An external import with no location.
    #[must_use]
    pub fn unlocated(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            range: None,
        }
    }
}

/// A scanned project file and everything attached to it during the build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    /// Project-relative path with forward slashes. Also the file's id.
    pub path: String,
    /// Source language.
    pub language: Language,
    /// Resolved architectural layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// Resolved bounded context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Raw import specifiers in source order.
    #[serde(default)]
    pub raw_imports: Vec<String>,
    /// Imports that did not resolve to a project file, one per package.
    #[serde(default)]
    pub external_imports: Vec<ExternalImport>,
    /// Detected capability occurrences.
    #[serde(default)]
    pub capabilities: Vec<DetectedCapability>,
}

impl SourceFile {
    /// Creates an unclassified file with no imports.
    #[must_use]
    pub fn new(path: impl Into<String>, language: Language) -> Self {
        Self {
            path: path.into(),
            language,
            layer: None,
            context: None,
            raw_imports: Vec::new(),
            external_imports: Vec::new(),
            capabilities: Vec::new(),
        }
    }

    /// Sets the layer.
    #[must_use]
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    /// Sets the context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Names of the external packages, in first-import order.
    #[must_use]
    pub fn external_packages(&self) -> Vec<&str> {
        self.external_imports.iter().map(|e| e.package.as_str()).collect()
    }
}

/// How a dependency was expressed in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// An import / require / re-export.
    Import,
    /// A textual include.
    Include,
    /// Any other kind of reference.
    Other,
}

/// A single resolved import occurrence between two project files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Importing file id.
    pub from: String,
    /// Imported file id.
    pub to: String,
    /// Edge kind.
    pub kind: EdgeKind,
    /// Confidence of the resolution (0.0 to 1.0).
    pub confidence: f64,
    /// Id of the extractor that produced the edge.
    pub source: String,
    /// Location of the import statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
}

impl DependencyEdge {
    /// Creates an import edge with full confidence.
    #[must_use]
    pub fn import(from: impl Into<String>, to: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: EdgeKind::Import,
            confidence: 1.0,
            source: source.into(),
            range: None,
        }
    }

    /// Sets the confidence, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Sets the source range of the import.
    #[must_use]
    pub fn with_range(mut self, range: SourceRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// The project dependency graph.
///
/// Invariant: both endpoints of every edge are keys of `files`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectGraph {
    /// Files keyed by path.
    pub files: BTreeMap<String, SourceFile>,
    /// Edges in insertion order, one per import occurrence.
    pub edges: Vec<DependencyEdge>,
}

impl ProjectGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) a file.
    pub fn insert_file(&mut self, file: SourceFile) {
        self.files.insert(file.path.clone(), file);
    }

    /// Adds an edge if both endpoints are known files.
    ///
    /// Returns `false` and drops the edge otherwise.
    pub fn add_edge(&mut self, edge: DependencyEdge) -> bool {
        if self.files.contains_key(&edge.from) && self.files.contains_key(&edge.to) {
            self.edges.push(edge);
            true
        } else {
            tracing::debug!("Dropping edge {} -> {}: unknown endpoint", edge.from, edge.to);
            false
        }
    }

    /// Looks up a file by path.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&SourceFile> {
        self.files.get(path)
    }

    /// Outgoing edges of a file.
    pub fn outgoing<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a DependencyEdge> + 'a {
        self.edges.iter().filter(move |e| e.from == path)
    }

    /// Number of outgoing edges per file. Files without edges map to zero.
    #[must_use]
    pub fn dependency_counts(&self) -> HashMap<&str, usize> {
        let mut counts: HashMap<&str, usize> =
            self.files.keys().map(|k| (k.as_str(), 0)).collect();
        for edge in &self.edges {
            *counts.entry(edge.from.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of files with no resolved layer.
    #[must_use]
    pub fn unmapped_count(&self) -> usize {
        self.files.values().filter(|f| f.layer.is_none()).count()
    }
}
