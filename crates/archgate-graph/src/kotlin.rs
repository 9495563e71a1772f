//! Kotlin language extractor using Tree-sitter.

use tree_sitter::{Language, Node, Parser};

use archgate_core::Position;

use crate::extractor::{ExtractError, FileAnalysis, ImportSite, LanguageExtractor};

/// Extracts imports and the package declaration from Kotlin source.
pub struct KotlinExtractor {
    language: Language,
}

impl KotlinExtractor {
    /// Creates a new Kotlin extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_kotlin_ng::LANGUAGE.into(),
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    /// Join identifier children of a `qualified_identifier` node with dots.
    fn qualified_id(node: &Node<'_>, src: &[u8]) -> String {
        let mut parts = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "identifier" {
                parts.push(Self::text(&child, src).to_owned());
            }
        }
        parts.join(".")
    }

    fn find_qualified(node: &Node<'_>, src: &[u8]) -> Option<String> {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|c| c.kind() == "qualified_identifier")?;
        Some(Self::qualified_id(&found, src))
    }

    fn extract_import(node: &Node<'_>, src: &[u8]) -> Option<ImportSite> {
        let mut path = Self::find_qualified(node, src)?;
        let wildcard = Self::text(node, src)
            .split_whitespace()
            .any(|tok| tok.ends_with(".*") || tok == "*");
        if wildcard {
            path.push_str(".*");
        }
        let start = node.start_position();
        let end = node.end_position();
        Some(ImportSite::new(
            path,
            Position::new(start.row + 1, start.column + 1),
            Position::new(end.row + 1, end.column + 1),
        ))
    }
}

impl Default for KotlinExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for KotlinExtractor {
    fn language_id(&self) -> &'static str {
        "kotlin"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".kt", ".kts"]
    }

    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|source| ExtractError::Grammar {
                language: "kotlin",
                source,
            })?;

        let src = source.as_bytes();
        let tree = parser
            .parse(src, None)
            .ok_or(ExtractError::Parse { language: "kotlin" })?;
        let root = tree.root_node();

        let mut result = FileAnalysis::default();

        let mut cursor = root.walk();
        for node in root.children(&mut cursor) {
            match node.kind() {
                "package_header" => {
                    result.package = Self::find_qualified(&node, src);
                }
                "import" => {
                    if let Some(imp) = Self::extract_import(&node, src) {
                        result.imports.push(imp);
                    }
                }
                _ => {}
            }
        }

        Ok(result)
    }
}
