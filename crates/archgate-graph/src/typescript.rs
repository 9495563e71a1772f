//! TypeScript / JavaScript import extractor using Tree-sitter.
//!
//! Collects string-literal specifiers from:
//!
//! - `import ... from "x"` and side-effect `import "x"`
//! - `export ... from "x"`
//! - dynamic `import("x")`
//! - CommonJS `require("x")`
//! - TypeScript `import x = require("x")`

use tree_sitter::{Language, Node, Parser};

use archgate_core::Position;

use crate::extractor::{ExtractError, FileAnalysis, ImportSite, LanguageExtractor};

/// Extracts import specifiers from TypeScript and JavaScript source.
///
/// Two dialects exist because the TSX grammar is required for JSX syntax but
/// mis-parses TypeScript angle-bracket casts; plain `.ts` files use the
/// TypeScript grammar and everything else the TSX grammar.
pub struct TypeScriptExtractor {
    language: Language,
    id: &'static str,
    extensions: &'static [&'static str],
}

impl TypeScriptExtractor {
    /// Extractor for `.ts`, `.mts` and `.cts` files.
    #[must_use]
    pub fn typescript() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            id: "typescript",
            extensions: &[".ts", ".mts", ".cts"],
        }
    }

    /// Extractor for `.tsx` and JavaScript files.
    #[must_use]
    pub fn tsx() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
            id: "tsx",
            extensions: &[".tsx", ".js", ".jsx", ".mjs", ".cjs"],
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    fn position(point: tree_sitter::Point) -> Position {
        Position::new(point.row + 1, point.column + 1)
    }

    /// Literal value of a string node; `None` for interpolated templates.
    fn string_value(node: &Node<'_>, src: &[u8]) -> Option<String> {
        match node.kind() {
            "string" => {
                let raw = Self::text(node, src);
                Some(raw.trim_matches(|c| c == '"' || c == '\'').to_owned())
            }
            "template_string" => {
                let mut cursor = node.walk();
                let interpolated = node
                    .named_children(&mut cursor)
                    .any(|c| c.kind() == "template_substitution");
                if interpolated {
                    None
                } else {
                    Some(Self::text(node, src).trim_matches('`').to_owned())
                }
            }
            _ => None,
        }
    }

    fn first_string_child(node: &Node<'_>, src: &[u8]) -> Option<String> {
        let mut cursor = node.walk();
        let first = node.named_children(&mut cursor).next()?;
        Self::string_value(&first, src)
    }

    /// Returns the specifier if `node` is an import-like construct.
    fn specifier(node: &Node<'_>, src: &[u8]) -> Option<String> {
        match node.kind() {
            "import_statement" | "export_statement" => {
                if let Some(source) = node.child_by_field_name("source") {
                    return Self::string_value(&source, src);
                }
                let mut cursor = node.walk();
                let clause = node
                    .named_children(&mut cursor)
                    .find(|c| c.kind() == "import_require_clause")?;
                match clause.child_by_field_name("source") {
                    Some(source) => Self::string_value(&source, src),
                    None => {
                        let mut inner = clause.walk();
                        let source = clause
                            .named_children(&mut inner)
                            .find(|c| c.kind() == "string")?;
                        Self::string_value(&source, src)
                    }
                }
            }
            "call_expression" => {
                let function = node.child_by_field_name("function")?;
                let is_loader = match function.kind() {
                    "import" => true,
                    "identifier" => Self::text(&function, src) == "require",
                    _ => false,
                };
                if !is_loader {
                    return None;
                }
                let args = node.child_by_field_name("arguments")?;
                Self::first_string_child(&args, src)
            }
            _ => None,
        }
    }
}

impl LanguageExtractor for TypeScriptExtractor {
    fn language_id(&self) -> &'static str {
        self.id
    }

    fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|source| ExtractError::Grammar {
                language: self.id,
                source,
            })?;

        let src = source.as_bytes();
        let tree = parser
            .parse(src, None)
            .ok_or(ExtractError::Parse { language: self.id })?;

        let mut result = FileAnalysis::default();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            if let Some(specifier) = Self::specifier(&node, src) {
                if !specifier.is_empty() {
                    result.imports.push(ImportSite::new(
                        specifier,
                        Self::position(node.start_position()),
                        Self::position(node.end_position()),
                    ));
                }
                continue;
            }
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        Ok(result)
    }
}
