//! Language-agnostic extraction types and trait.
//!
//! `LanguageExtractor` is the extension point for adding new languages.
//! Implement it to teach the graph builder how to pull import specifiers and
//! package info out of a new language.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use archgate_core::{Position, SourceRange};

/// A single import occurrence extracted from source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSite {
    /// Raw specifier as written (`"../infra/db"`, `"com.example.User"`, `".models"`).
    pub specifier: String,
    /// Location of the whole import statement or call.
    pub range: SourceRange,
}

impl ImportSite {
    /// Creates an import site spanning a single line.
    #[must_use]
    pub fn at_line(specifier: impl Into<String>, line: usize) -> Self {
        Self {
            specifier: specifier.into(),
            range: SourceRange::line(line),
        }
    }

    /// Creates an import site with an explicit range.
    #[must_use]
    pub fn new(specifier: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            specifier: specifier.into(),
            range: SourceRange::new(start, end),
        }
    }

    /// 1-indexed line of the import.
    #[must_use]
    pub fn line(&self) -> usize {
        self.range.start.line
    }
}

/// Result of analyzing a single source file.
///
/// This is also the unit stored in the scan cache, so it only holds data
/// derived from the file's own content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// Package/namespace declaration (Java, Kotlin), if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Import occurrences in source order.
    #[serde(default)]
    pub imports: Vec<ImportSite>,
}

/// Errors raised by an extractor.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The tree-sitter grammar could not be loaded.
    #[error("failed to load {language} grammar: {source}")]
    Grammar {
        /// Language id.
        language: &'static str,
        /// Underlying error.
        source: tree_sitter::LanguageError,
    },
    /// The parser produced no tree.
    #[error("failed to parse {language} source")]
    Parse {
        /// Language id.
        language: &'static str,
    },
    /// A line-matching pattern failed to compile.
    #[error("invalid import pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Compiles a static pattern once and hands out the shared regex.
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    pattern: &str,
) -> Result<&'static Regex, ExtractError> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| ExtractError::Pattern(e.clone()))
}

/// Trait for language-specific import extraction.
///
/// The extractor receives raw source text and returns a [`FileAnalysis`]
/// containing the language-agnostic intermediate representation.
pub trait LanguageExtractor: Send + Sync {
    /// Extractor identifier, recorded as the `source` of every edge it yields.
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".kt", ".kts"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extract imports and package info from source code.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed at all.
    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError>;
}

/// The set of registered extractors, looked up by file extension.
pub struct ExtractorSet {
    extractors: Vec<Box<dyn LanguageExtractor>>,
}

impl ExtractorSet {
    /// Creates an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Registers an extractor. Later registrations do not override earlier ones.
    #[must_use]
    pub fn with(mut self, extractor: impl LanguageExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Finds the extractor for a path, by extension.
    #[must_use]
    pub fn for_path(&self, path: &str) -> Option<&dyn LanguageExtractor> {
        self.extractors
            .iter()
            .find(|e| e.extensions().iter().any(|ext| path.ends_with(ext)))
            .map(AsRef::as_ref)
    }
}

impl Default for ExtractorSet {
    /// Every built-in extractor.
    fn default() -> Self {
        Self::empty()
            .with(crate::typescript::TypeScriptExtractor::typescript())
            .with(crate::typescript::TypeScriptExtractor::tsx())
            .with(crate::python::PythonExtractor::new())
            .with(crate::java::JavaExtractor::new())
            .with(crate::kotlin::KotlinExtractor::new())
    }
}

impl std::fmt::Debug for ExtractorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.extractors.iter().map(|e| e.language_id()))
            .finish()
    }
}
