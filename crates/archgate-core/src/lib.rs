//! # archgate-core
//!
//! Core framework for architecture enforcement over a cross-language
//! dependency graph.
//!
//! This crate holds the data shared by every stage of the pipeline:
//!
//! - [`ProjectGraph`], [`SourceFile`] and [`DependencyEdge`], the graph model
//! - [`ProjectConfig`] and its TOML sections (layers, mappings, capabilities, rules)
//! - [`LayerResolver`] and [`ContextResolver`] for priority-ordered glob classification
//! - [`Rule`] trait and [`RuleContext`] for structural rules
//! - [`Violation`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use archgate_core::{ProjectConfig, LayerResolver};
//!
//! let config = ProjectConfig::from_file("archgate.toml".as_ref())?;
//! let layers = LayerResolver::from_config(&config)?;
//! assert_eq!(layers.resolve("src/domain/user.ts"), Some("domain"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod graph;
mod mapping;
mod pattern;
mod rule;
mod types;

/// Utility modules shared by the graph builder and rule implementations.
pub mod utils;

pub use config::{
    AnalyzerConfig, CapabilityDef, ConfigError, ContextMapping, ContextRule, LayerDef,
    LayerMapping, ProjectConfig, RuleCheck, RuleConfig, TypeScriptPaths,
};
pub use context::RuleContext;
pub use graph::{
    DependencyEdge, DetectedCapability, EdgeKind, ExternalImport, Language, ProjectGraph, SourceFile,
};
pub use mapping::{ContextResolver, LayerResolver};
pub use pattern::{GlobPattern, PatternError};
pub use rule::{Rule, RuleBox, RuleError, RuleKind};
pub use types::{CheckResult, Metadata, Position, Severity, SourceRange, Violation, ViolationDiagnostic};
