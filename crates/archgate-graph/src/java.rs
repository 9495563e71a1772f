//! Java import extractor (line-oriented regex matching).

use std::sync::OnceLock;

use regex::Regex;

use crate::extractor::{cached_regex, ExtractError, FileAnalysis, ImportSite, LanguageExtractor};

static PACKAGE_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static IMPORT_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

const PACKAGE_PATTERN: &str = r"^\s*package\s+([\w.]+)\s*;";
const IMPORT_PATTERN: &str = r"^\s*import\s+(?:static\s+)?([\w.]+(?:\.\*)?)\s*;";

/// Extracts `package` and `import [static] a.b.C;` declarations from Java source.
#[derive(Debug, Default)]
pub struct JavaExtractor;

impl JavaExtractor {
    /// Creates a new Java extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LanguageExtractor for JavaExtractor {
    fn language_id(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".java"]
    }

    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError> {
        let package_re = cached_regex(&PACKAGE_RE, PACKAGE_PATTERN)?;
        let import_re = cached_regex(&IMPORT_RE, IMPORT_PATTERN)?;

        let mut result = FileAnalysis::default();
        for (idx, line) in source.lines().enumerate() {
            if result.package.is_none() {
                if let Some(caps) = package_re.captures(line) {
                    result.package = Some(caps[1].to_owned());
                    continue;
                }
            }
            if let Some(caps) = import_re.captures(line) {
                result
                    .imports
                    .push(ImportSite::at_line(&caps[1], idx + 1));
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_package_and_imports() {
        let src = "package com.example.app;\n\nimport java.util.List;\nimport static org.junit.Assert.assertEquals;\nimport com.example.domain.*;\n\npublic class App {}\n";
        let a = JavaExtractor::new().analyze(src).unwrap();
        assert_eq!(a.package.as_deref(), Some("com.example.app"));
        let specs: Vec<(&str, usize)> = a
            .imports
            .iter()
            .map(|i| (i.specifier.as_str(), i.line()))
            .collect();
        assert_eq!(
            specs,
            vec![
                ("java.util.List", 3),
                ("org.junit.Assert.assertEquals", 4),
                ("com.example.domain.*", 5)
            ]
        );
    }

    #[test]
    fn no_package() {
        let a = JavaExtractor::new().analyze("class A {}\n").unwrap();
        assert!(a.package.is_none());
        assert!(a.imports.is_empty());
    }
}
