//! The shared run: config → discovery → graph → rules.

use anyhow::{bail, Context, Result};
use archgate_core::{CheckResult, ProjectConfig, ProjectGraph, RuleContext};
use archgate_graph::{ExtractorSet, GraphBuilder, ScanCache};
use archgate_rules::RuleEngine;
use std::path::PathBuf;

use crate::discovery::discover_files;
use crate::project::{ConfigSource, ProjectLocation};

/// Scan cache location relative to the project root.
pub const CACHE_FILE: &str = ".archgate/cache.json";

/// Everything one run produced.
pub struct Analysis {
    /// Project root the run was anchored at.
    pub root: PathBuf,
    /// The dependency graph.
    pub graph: ProjectGraph,
    /// Rule results.
    pub result: CheckResult,
}

/// Loads and validates the configuration from a resolved source.
pub fn load_config(source: &ConfigSource) -> Result<ProjectConfig> {
    let Some(path) = source.path() else {
        bail!("No archgate.toml found. Create one in the project root or pass --config.");
    };
    let config = ProjectConfig::from_file(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    config.validate().context("Config validation failed")?;
    Ok(config)
}

/// Runs discovery, graph build and rule evaluation for one project.
pub fn analyze(location: &ProjectLocation) -> Result<Analysis> {
    let root = location.root.as_path();
    let config = load_config(&location.config)?;
    let engine = RuleEngine::from_config(&config.rules).context("Failed to build rules")?;

    let extractors = ExtractorSet::default();
    let files = discover_files(root, &config.analyzer, &extractors)?;
    tracing::info!("Analyzing {} files with {} rules", files.len(), engine.len());

    let mut builder = GraphBuilder::new(root, &config)
        .context("Failed to set up graph builder")?
        .with_extractors(extractors)
        .with_parallelism(config.analyzer.parallelism);
    if config.analyzer.cache {
        builder = builder.with_cache(ScanCache::load(root.join(CACHE_FILE)));
    }

    let graph = builder.build(&files).context("Failed to build dependency graph")?;
    if let Some(cache) = builder.cache_mut() {
        if let Err(e) = cache.save() {
            tracing::warn!("Failed to save scan cache: {e}");
        }
    }

    let result = engine.check_rules(&RuleContext::new(&graph, builder.contexts()));
    Ok(Analysis {
        root: root.to_path_buf(),
        graph,
        result,
    })
}
