//! Compiled glob patterns for project-relative paths.
//!
//! `*` and `?` stay within one path segment; only `**` crosses `/`.

const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Error raised for a glob that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// Glob pattern is empty.
    #[error("glob pattern must not be empty")]
    Empty,

    /// Glob pattern has invalid syntax.
    #[error("invalid glob pattern `{pattern}`: {reason}")]
    Invalid {
        /// The invalid pattern.
        pattern: String,
        /// Reason for the error.
        reason: String,
    },
}

/// A validated glob pattern for file path matching.
///
/// The glob is compiled once at construction and reused for all match calls.
/// Paths are matched in their normalized form (forward slashes, no leading `./`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    raw: String,
    compiled: glob::Pattern,
}

impl GlobPattern {
    /// Creates a new glob pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty or has invalid glob syntax.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let compiled = glob::Pattern::new(pattern).map_err(|e| PatternError::Invalid {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
        })
    }

    /// Compiles every pattern of a list, stopping at the first invalid one.
    ///
    /// # Errors
    ///
    /// Returns the first pattern error encountered.
    pub fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Self>, PatternError> {
        patterns.iter().map(|p| Self::new(p.as_ref())).collect()
    }

    /// Tests whether a normalized relative path matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        if self.compiled.matches_with(path, MATCH_OPTIONS) {
            return true;
        }
        // `dir/**` should match anything below `dir`, including when the
        // glob crate disagrees on edge cases such as trailing separators.
        if let Some(prefix) = self.raw.strip_suffix("/**") {
            let normalized = prefix.trim_end_matches('/');
            if path.starts_with(normalized)
                && path
                    .as_bytes()
                    .get(normalized.len())
                    .is_some_and(|&b| b == b'/')
            {
                return true;
            }
        }
        false
    }

    /// Returns the pattern as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// True if any pattern of the list matches the path.
pub(crate) fn any_matches(patterns: &[GlobPattern], path: &str) -> bool {
    patterns.iter().any(|p| p.matches(path))
}
