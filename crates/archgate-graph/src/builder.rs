//! Graph construction: extraction, resolution and classification.
//!
//! The build runs in two phases. Extraction is a pure per-file step
//! (read, hash, parse, scan for call tokens) and may run on a bounded rayon
//! pool. Resolution and edge materialisation then run on a single thread in
//! input order, so the resulting graph is identical whatever the parallelism.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use archgate_core::utils::normalize_path;
use archgate_core::{
    ConfigError, ContextResolver, DependencyEdge, DetectedCapability, ExternalImport, Language,
    LayerResolver, ProjectConfig, ProjectGraph, SourceFile,
};

use crate::cache::ScanCache;
use crate::capability::CapabilityDetector;
use crate::extractor::{ExtractorSet, FileAnalysis};
use crate::resolver::{ImportResolver, Resolution, TsPathConfig};

/// Errors that abort a graph build.
///
/// Per-file problems never do; they are logged and the file is skipped.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Layer or context mappings are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The extraction thread pool could not be created.
    #[error("failed to start extraction pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Output of the extraction phase for one file.
struct Scanned {
    path: String,
    language: Language,
    extractor_id: &'static str,
    analysis: FileAnalysis,
    hash: Option<String>,
    fresh: bool,
    call_capabilities: Vec<DetectedCapability>,
}

/// Builds a [`ProjectGraph`] from a list of project files.
///
/// # Example
///
/// ```ignore
/// let config = ProjectConfig::from_file(Path::new("archgate.toml"))?;
/// let mut builder = GraphBuilder::new(".", &config)?;
/// let graph = builder.build(&["src/domain/user.ts".into(), "src/infra/db.ts".into()])?;
/// ```
#[derive(Debug)]
pub struct GraphBuilder {
    root: PathBuf,
    layers: LayerResolver,
    contexts: ContextResolver,
    capabilities: CapabilityDetector,
    extractors: ExtractorSet,
    ts_paths: Option<TsPathConfig>,
    parallelism: Option<usize>,
    cache: Option<ScanCache>,
}

impl GraphBuilder {
    /// Creates a builder for the project at `root`.
    ///
    /// TypeScript aliases come from the config's `[typescript]` section, or
    /// from `tsconfig.json` at the root when that section is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer or context mapping glob is invalid.
    pub fn new(root: impl Into<PathBuf>, config: &ProjectConfig) -> Result<Self, BuildError> {
        let root = root.into();
        let ts_paths = match &config.typescript {
            Some(paths) => Some(TsPathConfig::from_paths(paths)),
            None => TsPathConfig::load(&root),
        };
        Ok(Self {
            layers: LayerResolver::from_config(config)?,
            contexts: ContextResolver::from_config(config)?,
            capabilities: CapabilityDetector::new(config.capabilities.as_deref()),
            extractors: ExtractorSet::default(),
            ts_paths,
            parallelism: config.analyzer.parallelism,
            cache: None,
            root,
        })
    }

    /// Enables the scan cache.
    #[must_use]
    pub fn with_cache(mut self, cache: ScanCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replaces the extractor set.
    #[must_use]
    pub fn with_extractors(mut self, extractors: ExtractorSet) -> Self {
        self.extractors = extractors;
        self
    }

    /// Overrides the extraction parallelism (`None` or `1` is sequential).
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: Option<usize>) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The context resolver, needed by rules for public-surface checks.
    #[must_use]
    pub fn contexts(&self) -> &ContextResolver {
        &self.contexts
    }

    /// The scan cache, if enabled.
    pub fn cache_mut(&mut self) -> Option<&mut ScanCache> {
        self.cache.as_mut()
    }

    /// Builds the graph over `files` (project-relative paths).
    ///
    /// Files with no registered extractor are ignored; unreadable or
    /// unparseable files are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error only if the extraction pool cannot be created.
    pub fn build(&mut self, files: &[String]) -> Result<ProjectGraph, BuildError> {
        let mut seen = HashSet::new();
        let files: Vec<String> = files
            .iter()
            .map(|f| normalize_path(f))
            .filter(|f| seen.insert(f.clone()))
            .collect();

        let scanned = self.scan_all(&files)?;

        if let Some(cache) = self.cache.as_mut() {
            for s in scanned.iter().filter(|s| s.fresh) {
                if let Some(hash) = &s.hash {
                    cache.insert(s.path.clone(), hash.clone(), s.analysis.clone());
                }
            }
            let keep: HashSet<&str> = scanned.iter().map(|s| s.path.as_str()).collect();
            cache.retain_files(&keep);
        }

        let graph = self.assemble(scanned);
        info!(
            "Built dependency graph: {} files, {} edges",
            graph.file_count(),
            graph.edges.len()
        );
        Ok(graph)
    }

    fn scan_all(&self, files: &[String]) -> Result<Vec<Scanned>, BuildError> {
        let results: Vec<Option<Scanned>> = match self.parallelism {
            Some(threads) if threads > 1 => {
                debug!("Extracting {} files on {threads} threads", files.len());
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| files.par_iter().map(|f| self.scan_file(f)).collect())
            }
            _ => files.iter().map(|f| self.scan_file(f)).collect(),
        };
        Ok(results.into_iter().flatten().collect())
    }

    fn scan_file(&self, path: &str) -> Option<Scanned> {
        let Some(language) = Language::from_path(path) else {
            debug!("Ignoring {path}: unsupported language");
            return None;
        };
        let Some(extractor) = self.extractors.for_path(path) else {
            debug!("Ignoring {path}: no extractor registered");
            return None;
        };

        let bytes = match fs::read(self.root.join(path)) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping {path}: {e}");
                return None;
            }
        };
        let source = match String::from_utf8(bytes) {
            Ok(source) => source,
            Err(e) => {
                warn!("Skipping {path}: not valid UTF-8 ({e})");
                return None;
            }
        };

        let hash = self
            .cache
            .as_ref()
            .map(|_| ScanCache::content_hash(source.as_bytes()));
        let cached = self
            .cache
            .as_ref()
            .zip(hash.as_deref())
            .and_then(|(cache, hash)| cache.get(path, hash));

        let (analysis, fresh) = match cached {
            Some(hit) => (hit.clone(), false),
            None => match extractor.analyze(&source) {
                Ok(analysis) => (analysis, true),
                Err(e) => {
                    warn!("Skipping {path}: {e}");
                    return None;
                }
            },
        };

        Some(Scanned {
            path: path.to_owned(),
            language,
            extractor_id: extractor.language_id(),
            analysis,
            hash,
            fresh,
            call_capabilities: self.capabilities.detect_calls(&source),
        })
    }

    /// Single-writer reduction: classification, resolution and edges.
    fn assemble(&self, scanned: Vec<Scanned>) -> ProjectGraph {
        let mut resolver =
            ImportResolver::new(scanned.iter().map(|s| s.path.clone()), self.ts_paths.clone());
        for s in &scanned {
            resolver.index_module(&s.path, s.language, s.analysis.package.as_deref());
        }

        let mut graph = ProjectGraph::new();
        let mut edges = Vec::new();

        for s in scanned {
            let mut file = SourceFile::new(s.path.clone(), s.language);
            file.layer = self.layers.resolve(&s.path).map(str::to_owned);
            file.context = self.contexts.resolve(&s.path).map(str::to_owned);

            for site in &s.analysis.imports {
                file.raw_imports.push(site.specifier.clone());
                file.capabilities
                    .extend(self.capabilities.detect_import(&site.specifier, site.line()));

                match resolver.resolve(&s.path, s.language, &site.specifier) {
                    Resolution::Internal { target, confidence } => {
                        edges.push(
                            DependencyEdge::import(s.path.clone(), target, s.extractor_id)
                                .with_confidence(confidence)
                                .with_range(site.range),
                        );
                    }
                    Resolution::External(package) => {
                        if !file.external_imports.iter().any(|e| e.package == package) {
                            file.external_imports.push(ExternalImport::new(package, site.range));
                        }
                    }
                    Resolution::Unresolved => {
                        debug!("{}: unresolved import '{}'", s.path, site.specifier);
                    }
                }
            }

            file.capabilities.extend(s.call_capabilities);
            file.capabilities.sort_by_key(|c| c.line);
            graph.insert_file(file);
        }

        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[[layers]]
name = "domain"
paths = ["src/domain/**"]

[[layers]]
name = "infra"
paths = ["src/infra/**"]

[[context-mappings]]
name = "billing"
include = ["src/domain/billing/**"]
public = ["src/domain/billing/index.ts"]
"#;

    fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        dir
    }

    fn paths(files: &[(&str, &str)]) -> Vec<String> {
        files.iter().map(|(p, _)| (*p).to_owned()).collect()
    }

    #[test]
    fn builds_edges_layers_and_externals() {
        let files = [
            (
                "src/domain/a.ts",
                "import { b } from '../infra/b';\nimport _ from 'lodash';\nimport './missing';\n",
            ),
            ("src/infra/b.ts", "import axios from 'axios';\nexport const b = 1;\n"),
            ("src/domain/billing/index.ts", "export {};\n"),
        ];
        let dir = project(&files);
        let config = ProjectConfig::parse(CONFIG).unwrap();
        let mut builder = GraphBuilder::new(dir.path(), &config).unwrap();
        let graph = builder.build(&paths(&files)).unwrap();

        assert_eq!(graph.file_count(), 3);
        assert_eq!(graph.edges.len(), 1);
        let edge = &graph.edges[0];
        assert_eq!(edge.from, "src/domain/a.ts");
        assert_eq!(edge.to, "src/infra/b.ts");
        assert_eq!(edge.source, "typescript");
        assert_eq!(edge.range.map(|r| r.start.line), Some(1));

        let a = graph.file("src/domain/a.ts").unwrap();
        assert_eq!(a.layer.as_deref(), Some("domain"));
        assert_eq!(a.raw_imports, vec!["../infra/b", "lodash", "./missing"]);
        assert_eq!(a.external_packages(), vec!["lodash"]);
        assert_eq!(a.external_imports[0].range.map(|r| r.start.line), Some(2));

        let b = graph.file("src/infra/b.ts").unwrap();
        assert_eq!(b.capabilities.len(), 1);
        assert_eq!(b.capabilities[0].name, "network");
        assert_eq!(b.capabilities[0].line, Some(1));

        let billing = graph.file("src/domain/billing/index.ts").unwrap();
        assert_eq!(billing.context.as_deref(), Some("billing"));
    }

    #[test]
    fn unreadable_file_is_skipped() {
        let files = [("src/domain/a.ts", "export const a = 1;\n")];
        let dir = project(&files);
        fs::write(dir.path().join("src/domain/bad.ts"), [0xff, 0xfe, 0x00]).unwrap();

        let config = ProjectConfig::parse(CONFIG).unwrap();
        let mut builder = GraphBuilder::new(dir.path(), &config).unwrap();
        let graph = builder
            .build(&[
                "src/domain/a.ts".into(),
                "src/domain/bad.ts".into(),
                "src/domain/gone.ts".into(),
                "README.md".into(),
            ])
            .unwrap();
        assert_eq!(graph.file_count(), 1);
    }

    #[test]
    fn duplicate_imports_make_duplicate_edges() {
        let files = [
            ("src/a.ts", "import { x } from './b';\nconst y = require('./b');\n"),
            ("src/b.ts", "export const x = 1;\n"),
        ];
        let dir = project(&files);
        let config = ProjectConfig::parse(CONFIG).unwrap();
        let graph = GraphBuilder::new(dir.path(), &config)
            .unwrap()
            .build(&paths(&files))
            .unwrap();
        assert_eq!(graph.edges.len(), 2);
    }
}
