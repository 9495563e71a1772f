//! Path and package-name helpers.

use std::path::Path;

/// Normalizes a project-relative path: forward slashes, no `./` prefix,
/// `.` segments dropped and `..` segments collapsed where possible.
///
/// # Example
///
/// ```ignore
/// assert_eq!(normalize_path(".\\src\\domain\\..\\infra\\db.ts"), "src/infra/db.ts");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split(['/', '\\']) {
        match seg {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// Returns `path` relative to `root` as a normalized string.
///
/// Returns `None` if `path` is not under `root`.
#[must_use]
pub fn relative_to(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(normalize_path(&rel.to_string_lossy()))
}

/// Checks whether a package name matches an allow-list entry.
///
/// Entries match exactly, as a `/` or `.` separated prefix, or as a
/// trailing-`*` prefix.
///
/// # Examples
///
/// ```ignore
/// assert!(package_matches("lodash", "lodash"));
/// assert!(package_matches("@nestjs/core", "@nestjs"));
/// assert!(package_matches("java.util.List", "java.util"));
/// assert!(package_matches("react-dom", "react*"));
/// assert!(!package_matches("lodash-es", "lodash"));
/// ```
#[must_use]
pub fn package_matches(package: &str, pattern: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix('*') {
        return package.starts_with(prefix);
    }
    if package == pattern {
        return true;
    }
    package
        .strip_prefix(pattern)
        .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('.'))
}

/// Returns the last `/` separated segment of a path.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Returns the directory part of a normalized path (`""` for top-level files).
#[must_use]
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}
