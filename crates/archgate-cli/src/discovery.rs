//! Source file discovery.
//!
//! Walks the project with `ignore` (so `.gitignore` is honoured), keeps files
//! some extractor handles, and drops paths matching `[analyzer].exclude`.

use anyhow::{Context, Result};
use archgate_core::utils::relative_to;
use archgate_core::{AnalyzerConfig, GlobPattern};
use archgate_graph::ExtractorSet;
use std::path::Path;

/// Project-relative paths of all analysable files, sorted.
pub fn discover_files(
    root: &Path,
    analyzer: &AnalyzerConfig,
    extractors: &ExtractorSet,
) -> Result<Vec<String>> {
    let exclude = GlobPattern::compile_all(&analyzer.exclude).context("Invalid [analyzer].exclude pattern")?;

    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .max_depth(Some(analyzer.max_depth))
        .hidden(true)
        .git_ignore(true)
        .require_git(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Some(rel) = relative_to(root, entry.path()) else {
            continue;
        };
        if extractors.for_path(&rel).is_none() {
            continue;
        }
        if exclude.iter().any(|p| p.matches(&rel)) {
            tracing::debug!("Excluded: {rel}");
            continue;
        }
        files.push(rel);
    }

    files.sort();
    tracing::debug!("Discovered {} files under {}", files.len(), root.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, path: &str) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, "").unwrap();
    }

    #[test]
    fn finds_supported_files_and_applies_excludes() {
        let tmp = tempfile::tempdir().unwrap();
        for f in [
            "src/app.ts",
            "src/view.tsx",
            "svc/main.py",
            "jvm/A.java",
            "jvm/B.kt",
            "README.md",
            "node_modules/lib/index.js",
            "src/generated/api.ts",
            ".archgate/cache.json",
        ] {
            touch(tmp.path(), f);
        }
        let analyzer = AnalyzerConfig {
            exclude: vec!["**/node_modules/**".into(), "src/generated/**".into()],
            ..AnalyzerConfig::default()
        };

        let files = discover_files(tmp.path(), &analyzer, &ExtractorSet::default()).unwrap();
        assert_eq!(
            files,
            vec!["jvm/A.java", "jvm/B.kt", "src/app.ts", "src/view.tsx", "svc/main.py"]
        );
    }

    #[test]
    fn honours_gitignore_and_depth() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(".gitignore"), "build/\n").unwrap();
        touch(tmp.path(), "build/out.js");
        touch(tmp.path(), "a.ts");
        touch(tmp.path(), "deep/er/b.ts");

        let analyzer = AnalyzerConfig {
            max_depth: 2,
            ..AnalyzerConfig::default()
        };
        let files = discover_files(tmp.path(), &analyzer, &ExtractorSet::default()).unwrap();
        assert_eq!(files, vec!["a.ts"]);
    }

    #[test]
    fn invalid_exclude_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let analyzer = AnalyzerConfig {
            exclude: vec!["src/[".into()],
            ..AnalyzerConfig::default()
        };
        assert!(discover_files(tmp.path(), &analyzer, &ExtractorSet::default()).is_err());
    }
}
