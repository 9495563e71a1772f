//! Import resolution: maps raw specifiers to project files or external packages.
//!
//! - Script (TS/JS) relative specifiers are probed against the scanned file set.
//! - Bare script specifiers go through tsconfig `paths` aliases, then become
//!   external packages.
//! - Dotted names (Python, Java, Kotlin) are resolved by longest-prefix match
//!   against a module index built from the scanned files.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use archgate_core::utils::{file_name, normalize_path, parent_dir};
use archgate_core::{Language, TypeScriptPaths};

/// Confidence of a relative (path-anchored) script import.
pub const RELATIVE_CONFIDENCE: f64 = 1.0;
/// Confidence of an import resolved through a tsconfig alias or `baseUrl`.
pub const ALIAS_CONFIDENCE: f64 = 0.95;
/// Confidence of a dotted-name match against the module index.
pub const DOTTED_CONFIDENCE: f64 = 0.9;

/// Probe order for extensionless script specifiers.
const SCRIPT_EXTENSIONS: &[&str] = &[
    ".ts", ".tsx", ".d.ts", ".js", ".jsx", ".mjs", ".cjs", ".mts", ".cts",
];

/// Prefixes stripped from paths to obtain module names, most specific first.
const SOURCE_ROOTS: &[&str] = &[
    "src/main/java/",
    "src/test/java/",
    "src/main/kotlin/",
    "src/test/kotlin/",
    "src/",
    "lib/",
];

/// Outcome of resolving one import specifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Lands on a scanned project file.
    Internal {
        /// Target file id.
        target: String,
        /// Resolution confidence (0.0 to 1.0).
        confidence: f64,
    },
    /// A third-party package.
    External(String),
    /// Looks like a project import but no scanned file matches. Neither an
    /// edge nor an external import.
    Unresolved,
}

/// A single compiled tsconfig `paths` entry.
#[derive(Debug, Clone)]
struct Alias {
    prefix: String,
    suffix: String,
    wildcard: bool,
    targets: Vec<String>,
}

impl Alias {
    fn parse(pattern: &str, targets: &[String]) -> Self {
        match pattern.split_once('*') {
            Some((prefix, suffix)) => Self {
                prefix: prefix.to_owned(),
                suffix: suffix.to_owned(),
                wildcard: true,
                targets: targets.to_vec(),
            },
            None => Self {
                prefix: pattern.to_owned(),
                suffix: String::new(),
                wildcard: false,
                targets: targets.to_vec(),
            },
        }
    }

    /// The text captured by `*`, if the specifier matches.
    fn capture<'s>(&self, specifier: &'s str) -> Option<&'s str> {
        if !self.wildcard {
            return (specifier == self.prefix).then_some("");
        }
        let rest = specifier.strip_prefix(self.prefix.as_str())?;
        rest.strip_suffix(self.suffix.as_str())
    }

    fn specificity(&self) -> usize {
        if self.wildcard {
            self.prefix.len()
        } else {
            usize::MAX
        }
    }
}

/// TypeScript `baseUrl` / `paths` settings, relative to the project root.
#[derive(Debug, Clone, Default)]
pub struct TsPathConfig {
    base_url: Option<String>,
    /// Sorted most specific first; ties keep lexicographic key order.
    aliases: Vec<Alias>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfigFile {
    #[serde(default)]
    compiler_options: TsCompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsCompilerOptions {
    base_url: Option<String>,
    #[serde(default)]
    paths: BTreeMap<String, Vec<String>>,
}

impl TsPathConfig {
    /// Builds the alias table from config-style settings.
    #[must_use]
    pub fn from_paths(paths: &TypeScriptPaths) -> Self {
        Self::new(paths.base_url.as_deref(), &paths.paths)
    }

    fn new(base_url: Option<&str>, paths: &BTreeMap<String, Vec<String>>) -> Self {
        let mut aliases: Vec<Alias> = paths
            .iter()
            .map(|(pattern, targets)| Alias::parse(pattern, targets))
            .collect();
        aliases.sort_by(|a, b| b.specificity().cmp(&a.specificity()));
        Self {
            base_url: base_url.map(normalize_path),
            aliases,
        }
    }

    /// Reads `tsconfig.json` from the project root.
    ///
    /// Returns `None` if the file is absent, unreadable or has neither
    /// `baseUrl` nor `paths`. Comments and trailing commas are tolerated.
    #[must_use]
    pub fn load(root: &Path) -> Option<Self> {
        let path = root.join("tsconfig.json");
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<TsConfigFile>(&strip_json_comments(&content)) {
            Ok(file) => {
                let opts = file.compiler_options;
                if opts.base_url.is_none() && opts.paths.is_empty() {
                    return None;
                }
                debug!("Loaded {} path aliases from {}", opts.paths.len(), path.display());
                Some(Self::new(opts.base_url.as_deref(), &opts.paths))
            }
            Err(e) => {
                warn!("Ignoring unparseable {}: {e}", path.display());
                None
            }
        }
    }

    fn join_base(&self, target: &str) -> String {
        match self.base_url.as_deref() {
            Some(base) if !base.is_empty() => normalize_path(&format!("{base}/{target}")),
            _ => normalize_path(target),
        }
    }

    /// Unprobed candidate paths for a bare specifier, in preference order.
    fn candidates(&self, specifier: &str) -> Vec<String> {
        let mut out = Vec::new();
        for alias in &self.aliases {
            if let Some(captured) = alias.capture(specifier) {
                out.extend(
                    alias
                        .targets
                        .iter()
                        .map(|t| self.join_base(&t.replacen('*', captured, 1))),
                );
            }
        }
        if self.base_url.is_some() {
            out.push(self.join_base(specifier));
        }
        out
    }
}

/// Removes `//` and `/* */` comments and trailing commas from JSON text.
#[must_use]
pub fn strip_json_comments(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    let mut in_string = false;
    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match (c, chars.get(i + 1)) {
            ('"', _) => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            (',', _) => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some('}' | ']')) {
                    out.push(c);
                }
                i += 1;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Package name of a bare script specifier: `@scope/name` or the first segment.
#[must_use]
pub fn package_name(specifier: &str) -> String {
    let specifier = specifier.strip_prefix("node:").unwrap_or(specifier);
    let mut segments = specifier.split('/');
    let first = segments.next().unwrap_or_default();
    if first.starts_with('@') {
        if let Some(second) = segments.next() {
            return format!("{first}/{second}");
        }
    }
    first.to_owned()
}

/// Strips a known source root (`src/main/java/`, `src/`, ...) from a path.
fn strip_source_root(path: &str) -> &str {
    for root in SOURCE_ROOTS {
        if let Some(rest) = path.strip_prefix(root) {
            return rest;
        }
        if let Some(idx) = path.find(&format!("/{root}")) {
            return &path[idx + 1 + root.len()..];
        }
    }
    path
}

fn strip_extension(path: &str) -> &str {
    path.rsplit_once('.')
        .filter(|(_, ext)| !ext.contains('/'))
        .map_or(path, |(stem, _)| stem)
}

/// Dotted Python module name of a `.py` path.
fn python_module_name(path: &str) -> String {
    let stem = strip_extension(strip_source_root(path));
    let stem = stem
        .strip_suffix("/__init__")
        .or_else(|| (stem == "__init__").then_some(""))
        .unwrap_or(stem);
    stem.replace('/', ".")
}

/// Dotted JVM name of a Java/Kotlin file: `package.Stem`, or the path when
/// no package is declared.
fn jvm_module_name(path: &str, package: Option<&str>) -> String {
    match package {
        Some(pkg) if !pkg.is_empty() => {
            format!("{pkg}.{}", strip_extension(file_name(path)))
        }
        _ => strip_extension(strip_source_root(path)).replace('/', "."),
    }
}

/// Dotted module names mapped to file ids.
#[derive(Debug, Default)]
struct ModuleIndex {
    modules: HashMap<String, String>,
    roots: HashSet<String>,
    root_depth: usize,
}

impl ModuleIndex {
    fn new(root_depth: usize) -> Self {
        Self {
            root_depth,
            ..Self::default()
        }
    }

    fn root_of<'n>(&self, name: &'n str) -> &'n str {
        let segments = name.split('.').count();
        let depth = self.root_depth.min(segments.saturating_sub(1)).max(1);
        match name.match_indices('.').nth(depth - 1) {
            Some((idx, _)) => &name[..idx],
            None => name,
        }
    }

    fn insert(&mut self, name: String, path: &str) {
        if name.is_empty() {
            return;
        }
        self.roots.insert(self.root_of(&name).to_owned());
        if let Some(existing) = self.modules.get(&name) {
            debug!("Module {name} provided by both {existing} and {path}; keeping {existing}");
            return;
        }
        self.modules.insert(name, path.to_owned());
    }

    fn longest_prefix(&self, name: &str) -> Option<&str> {
        let mut candidate = name;
        loop {
            if let Some(path) = self.modules.get(candidate) {
                return Some(path);
            }
            candidate = candidate.rsplit_once('.')?.0;
        }
    }

    fn is_project_name(&self, name: &str) -> bool {
        self.roots.contains(self.root_of(name))
    }
}

/// Resolves import specifiers against the scanned file set.
#[derive(Debug)]
pub struct ImportResolver {
    files: HashSet<String>,
    ts_paths: Option<TsPathConfig>,
    python: ModuleIndex,
    jvm: ModuleIndex,
}

impl ImportResolver {
    /// Creates a resolver over the given file ids.
    #[must_use]
    pub fn new(files: impl IntoIterator<Item = String>, ts_paths: Option<TsPathConfig>) -> Self {
        Self {
            files: files.into_iter().collect(),
            ts_paths,
            python: ModuleIndex::new(1),
            // Reverse-domain packages: `com.example`, not `com`.
            jvm: ModuleIndex::new(2),
        }
    }

    /// Adds a file to the dotted-name module index.
    pub fn index_module(&mut self, path: &str, language: Language, package: Option<&str>) {
        match language {
            Language::Python => self.python.insert(python_module_name(path), path),
            Language::Java | Language::Kotlin => {
                self.jvm.insert(jvm_module_name(path, package), path);
            }
            Language::TypeScript | Language::JavaScript => {}
        }
    }

    /// Resolves one specifier found in `from`.
    #[must_use]
    pub fn resolve(&self, from: &str, language: Language, specifier: &str) -> Resolution {
        let resolution = match language {
            Language::TypeScript | Language::JavaScript => self.resolve_script(from, specifier),
            Language::Python => self.resolve_python(from, specifier),
            Language::Java | Language::Kotlin => self.resolve_jvm(specifier),
        };
        match resolution {
            Resolution::Internal { ref target, .. } if target == from => Resolution::Unresolved,
            other => other,
        }
    }

    fn resolve_script(&self, from: &str, specifier: &str) -> Resolution {
        if specifier.starts_with('.') {
            let base = normalize_path(&format!("{}/{specifier}", parent_dir(from)));
            return self
                .probe(&base)
                .map_or(Resolution::Unresolved, |target| Resolution::Internal {
                    target,
                    confidence: RELATIVE_CONFIDENCE,
                });
        }
        if specifier.starts_with('/') || specifier.contains("://") {
            return Resolution::Unresolved;
        }
        if let Some(ts) = &self.ts_paths {
            for candidate in ts.candidates(specifier) {
                if let Some(target) = self.probe(&candidate) {
                    return Resolution::Internal {
                        target,
                        confidence: ALIAS_CONFIDENCE,
                    };
                }
            }
        }
        Resolution::External(package_name(specifier))
    }

    /// Extension and index probing of a normalized base path.
    fn probe(&self, base: &str) -> Option<String> {
        if base.starts_with("..") {
            return None;
        }
        if self.files.contains(base) {
            return Some(base.to_owned());
        }
        for ext in SCRIPT_EXTENSIONS {
            let candidate = format!("{base}{ext}");
            if self.files.contains(&candidate) {
                return Some(candidate);
            }
        }
        if let Some((stem, ext)) = base.rsplit_once('.') {
            let siblings: &[&str] = match ext {
                "js" => &["ts", "tsx"],
                "jsx" => &["tsx"],
                "mjs" => &["mts"],
                "cjs" => &["cts"],
                _ => &[],
            };
            for sibling in siblings {
                let candidate = format!("{stem}.{sibling}");
                if self.files.contains(&candidate) {
                    return Some(candidate);
                }
            }
        }
        let dir = base.trim_end_matches('/');
        for ext in SCRIPT_EXTENSIONS {
            let candidate = if dir.is_empty() {
                format!("index{ext}")
            } else {
                format!("{dir}/index{ext}")
            };
            if self.files.contains(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    fn resolve_python(&self, from: &str, specifier: &str) -> Resolution {
        let name = if specifier.starts_with('.') {
            match python_relative(from, specifier) {
                Some(name) => name,
                None => return Resolution::Unresolved,
            }
        } else {
            specifier.to_owned()
        };

        if let Some(target) = self.python.longest_prefix(&name) {
            return Resolution::Internal {
                target: target.to_owned(),
                confidence: DOTTED_CONFIDENCE,
            };
        }
        if specifier.starts_with('.') || self.python.is_project_name(&name) {
            return Resolution::Unresolved;
        }
        let top = name.split('.').next().unwrap_or(&name);
        Resolution::External(top.to_owned())
    }

    fn resolve_jvm(&self, specifier: &str) -> Resolution {
        if let Some(package) = specifier.strip_suffix(".*") {
            // Package-only import: no single target file.
            return if self.jvm.is_project_name(package) {
                Resolution::Unresolved
            } else {
                Resolution::External(package.to_owned())
            };
        }
        if let Some(target) = self.jvm.longest_prefix(specifier) {
            return Resolution::Internal {
                target: target.to_owned(),
                confidence: DOTTED_CONFIDENCE,
            };
        }
        if self.jvm.is_project_name(specifier) {
            return Resolution::Unresolved;
        }
        let package = specifier.rsplit_once('.').map_or(specifier, |(pkg, _)| pkg);
        Resolution::External(package.to_owned())
    }
}

/// Absolute dotted name of a relative Python import made from `from`.
fn python_relative(from: &str, specifier: &str) -> Option<String> {
    let dots = specifier.chars().take_while(|c| *c == '.').count();
    let rest = &specifier[dots..];

    let module = python_module_name(from);
    let is_package = file_name(from) == "__init__.py";
    let mut package: Vec<&str> = if module.is_empty() {
        Vec::new()
    } else {
        module.split('.').collect()
    };
    if !is_package {
        package.pop();
    }
    for _ in 1..dots {
        package.pop()?;
    }

    let mut name = package.join(".");
    if !rest.is_empty() {
        if !name.is_empty() {
            name.push('.');
        }
        name.push_str(rest);
    }
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(files: &[&str]) -> ImportResolver {
        ImportResolver::new(files.iter().map(|s| (*s).to_owned()), None)
    }

    fn internal(target: &str, confidence: f64) -> Resolution {
        Resolution::Internal {
            target: target.to_owned(),
            confidence,
        }
    }

    #[test]
    fn relative_extension_probing() {
        let r = resolver(&["src/domain/a.ts", "src/infra/b.ts", "src/ui/App.tsx"]);
        assert_eq!(
            r.resolve("src/domain/a.ts", Language::TypeScript, "../infra/b"),
            internal("src/infra/b.ts", 1.0)
        );
        assert_eq!(
            r.resolve("src/domain/a.ts", Language::TypeScript, "../ui/App"),
            internal("src/ui/App.tsx", 1.0)
        );
    }

    #[test]
    fn relative_index_and_js_sibling() {
        let r = resolver(&["src/a.ts", "src/lib/index.ts", "src/util.ts"]);
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "./lib"),
            internal("src/lib/index.ts", 1.0)
        );
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "./util.js"),
            internal("src/util.ts", 1.0)
        );
    }

    #[test]
    fn relative_module_extensions() {
        let r = resolver(&["src/a.ts", "src/esm.mts", "src/cjs.cts", "src/pkg/index.mts"]);
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "./esm"),
            internal("src/esm.mts", 1.0)
        );
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "./cjs"),
            internal("src/cjs.cts", 1.0)
        );
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "./esm.mjs"),
            internal("src/esm.mts", 1.0)
        );
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "./pkg"),
            internal("src/pkg/index.mts", 1.0)
        );
    }

    #[test]
    fn unresolved_relative_is_not_external() {
        let r = resolver(&["src/a.ts"]);
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "./missing"),
            Resolution::Unresolved
        );
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "../../../outside"),
            Resolution::Unresolved
        );
    }

    #[test]
    fn bare_specifiers_are_external_packages() {
        let r = resolver(&["src/a.ts"]);
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "lodash/fp"),
            Resolution::External("lodash".into())
        );
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "@nestjs/core/injector"),
            Resolution::External("@nestjs/core".into())
        );
        assert_eq!(
            r.resolve("src/a.ts", Language::JavaScript, "node:fs/promises"),
            Resolution::External("fs".into())
        );
    }

    #[test]
    fn tsconfig_aliases_most_specific_first() {
        let mut paths = BTreeMap::new();
        paths.insert("@app/*".to_owned(), vec!["src/app/*".to_owned()]);
        paths.insert("@app/core/*".to_owned(), vec!["src/core/*".to_owned()]);
        paths.insert(
            "@shared".to_owned(),
            vec!["src/missing.ts".to_owned(), "src/shared/index.ts".to_owned()],
        );
        let ts = TsPathConfig::from_paths(&TypeScriptPaths {
            base_url: Some(".".into()),
            paths,
        });
        let r = ImportResolver::new(
            ["src/a.ts", "src/app/core/x.ts", "src/core/x.ts", "src/shared/index.ts"]
                .iter()
                .map(|s| (*s).to_owned()),
            Some(ts),
        );
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "@app/core/x"),
            internal("src/core/x.ts", 0.95)
        );
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "@shared"),
            internal("src/shared/index.ts", 0.95)
        );
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "@app/nothing"),
            Resolution::External("@app/nothing".into())
        );
    }

    #[test]
    fn base_url_resolution() {
        let ts = TsPathConfig::from_paths(&TypeScriptPaths {
            base_url: Some("./src".into()),
            paths: BTreeMap::new(),
        });
        let r = ImportResolver::new(["src/a.ts", "src/utils/date.ts"].map(String::from), Some(ts));
        assert_eq!(
            r.resolve("src/a.ts", Language::TypeScript, "utils/date"),
            internal("src/utils/date.ts", 0.95)
        );
    }

    #[test]
    fn python_absolute_and_relative() {
        let mut r = resolver(&[
            "src/app/__init__.py",
            "src/app/models.py",
            "src/app/views.py",
            "src/app/infra/db.py",
        ]);
        for path in [
            "src/app/__init__.py",
            "src/app/models.py",
            "src/app/views.py",
            "src/app/infra/db.py",
        ] {
            r.index_module(path, Language::Python, None);
        }
        assert_eq!(
            r.resolve("src/app/views.py", Language::Python, "app.models"),
            internal("src/app/models.py", 0.9)
        );
        assert_eq!(
            r.resolve("src/app/views.py", Language::Python, "app.models.User"),
            internal("src/app/models.py", 0.9)
        );
        assert_eq!(
            r.resolve("src/app/views.py", Language::Python, ".models"),
            internal("src/app/models.py", 0.9)
        );
        assert_eq!(
            r.resolve("src/app/infra/db.py", Language::Python, "..views"),
            internal("src/app/views.py", 0.9)
        );
        assert_eq!(
            r.resolve("src/app/views.py", Language::Python, "requests.adapters"),
            Resolution::External("requests".into())
        );
        assert_eq!(
            r.resolve("src/app/views.py", Language::Python, "app.missing"),
            internal("src/app/__init__.py", 0.9)
        );
        assert_eq!(
            r.resolve("src/app/views.py", Language::Python, "....too.far"),
            Resolution::Unresolved
        );
    }

    #[test]
    fn jvm_resolution() {
        let mut r = resolver(&[
            "src/main/java/com/example/domain/User.java",
            "src/main/kotlin/com/example/infra/Repo.kt",
        ]);
        r.index_module(
            "src/main/java/com/example/domain/User.java",
            Language::Java,
            Some("com.example.domain"),
        );
        r.index_module("src/main/kotlin/com/example/infra/Repo.kt", Language::Kotlin, None);

        assert_eq!(
            r.resolve("x", Language::Kotlin, "com.example.domain.User"),
            internal("src/main/java/com/example/domain/User.java", 0.9)
        );
        assert_eq!(
            r.resolve("x", Language::Java, "com.example.infra.Repo.Companion"),
            internal("src/main/kotlin/com/example/infra/Repo.kt", 0.9)
        );
        assert_eq!(
            r.resolve("x", Language::Java, "com.example.domain.Missing"),
            Resolution::Unresolved
        );
        assert_eq!(
            r.resolve("x", Language::Java, "com.example.domain.*"),
            Resolution::Unresolved
        );
        assert_eq!(
            r.resolve("x", Language::Java, "java.util.List"),
            Resolution::External("java.util".into())
        );
        assert_eq!(
            r.resolve("x", Language::Kotlin, "kotlinx.coroutines.*"),
            Resolution::External("kotlinx.coroutines".into())
        );
    }

    #[test]
    fn self_import_is_dropped() {
        let mut r = resolver(&["app/__init__.py"]);
        r.index_module("app/__init__.py", Language::Python, None);
        assert_eq!(
            r.resolve("app/__init__.py", Language::Python, "app"),
            Resolution::Unresolved
        );
    }

    #[test]
    fn strips_json_comments_and_trailing_commas() {
        let raw = r#"{
  // compiler options
  "compilerOptions": {
    "baseUrl": ".", /* inline */
    "paths": { "@a/*": ["src/a/*"], },
    "outDir": "dist//x"
  },
}"#;
        let stripped = strip_json_comments(raw);
        let parsed: serde_json::Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(parsed["compilerOptions"]["outDir"], "dist//x");
        assert_eq!(parsed["compilerOptions"]["paths"]["@a/*"][0], "src/a/*");
    }

    #[test]
    fn package_name_forms() {
        assert_eq!(package_name("react"), "react");
        assert_eq!(package_name("react-dom/client"), "react-dom");
        assert_eq!(package_name("@scope/pkg/deep"), "@scope/pkg");
        assert_eq!(package_name("node:http"), "http");
    }

    #[test]
    fn module_names() {
        assert_eq!(python_module_name("src/app/models.py"), "app.models");
        assert_eq!(python_module_name("app/__init__.py"), "app");
        assert_eq!(python_module_name("tools/gen.py"), "tools.gen");
        assert_eq!(
            jvm_module_name("src/main/java/com/x/A.java", None),
            "com.x.A"
        );
        assert_eq!(jvm_module_name("whatever/A.kt", Some("com.y")), "com.y.A");
    }
}
