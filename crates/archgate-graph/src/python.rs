//! Python import extractor (line-oriented regex matching).
//!
//! Recognises `import a.b, c as d` and `from x.y import z`. Relative
//! `from . import a, b` yields one site per name (`.a`, `.b`) so each can be
//! resolved to a sibling module; `from .pkg import x` yields `.pkg`.
//! Multi-line parenthesised name lists only contribute their first line.

use std::sync::OnceLock;

use regex::Regex;

use crate::extractor::{cached_regex, ExtractError, FileAnalysis, ImportSite, LanguageExtractor};

static IMPORT_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static FROM_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

const IMPORT_PATTERN: &str = r"^\s*import\s+([\w.][\w.\s,]*?)\s*(?:#.*)?$";
const FROM_PATTERN: &str = r"^\s*from\s+(\.*[\w.]*)\s+import\s+(.+?)\s*(?:#.*)?$";

/// Extracts import specifiers from Python source.
#[derive(Debug, Default)]
pub struct PythonExtractor;

impl PythonExtractor {
    /// Creates a new Python extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// First identifier of an `a.b as c` clause.
    fn clause_name(clause: &str) -> Option<&str> {
        let name = clause.split_whitespace().next()?;
        let name = name.trim_matches(|c| c == '(' || c == ')');
        (!name.is_empty() && name != "*").then_some(name)
    }
}

impl LanguageExtractor for PythonExtractor {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".py"]
    }

    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError> {
        let import_re = cached_regex(&IMPORT_RE, IMPORT_PATTERN)?;
        let from_re = cached_regex(&FROM_RE, FROM_PATTERN)?;

        let mut result = FileAnalysis::default();
        for (idx, line) in source.lines().enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = from_re.captures(line) {
                let module = &caps[1];
                if module.is_empty() || module == "__future__" {
                    continue;
                }
                if module.chars().all(|c| c == '.') {
                    for name in caps[2].split(',').filter_map(Self::clause_name) {
                        result
                            .imports
                            .push(ImportSite::at_line(format!("{module}{name}"), line_no));
                    }
                } else {
                    result.imports.push(ImportSite::at_line(module, line_no));
                }
                continue;
            }

            if let Some(caps) = import_re.captures(line) {
                for name in caps[1].split(',').filter_map(Self::clause_name) {
                    result.imports.push(ImportSite::at_line(name, line_no));
                }
            }
        }
        Ok(result)
    }
}
