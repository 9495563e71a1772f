//! # archgate-graph
//!
//! Cross-language dependency graph builder.
//!
//! Turns a list of project files into an [`archgate_core::ProjectGraph`]:
//!
//! - [`LanguageExtractor`] trait for pluggable import extraction, with
//!   tree-sitter backed [`TypeScriptExtractor`] and [`KotlinExtractor`] and
//!   regex backed [`PythonExtractor`] and [`JavaExtractor`]
//! - [`ImportResolver`] for relative probing, tsconfig aliases and dotted
//!   module lookup
//! - [`CapabilityDetector`] for `network` / `filesystem` / ... tagging
//! - [`ScanCache`] for content-hash keyed reuse of extraction results
//! - [`GraphBuilder`] tying it together

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builder;
pub mod cache;
pub mod capability;
pub mod extractor;
pub mod java;
pub mod kotlin;
pub mod python;
pub mod resolver;
pub mod typescript;

pub use builder::{BuildError, GraphBuilder};
pub use cache::{CacheError, ScanCache};
pub use capability::{builtin_capabilities, CapabilityDetector};
pub use extractor::{ExtractError, ExtractorSet, FileAnalysis, ImportSite, LanguageExtractor};
pub use java::JavaExtractor;
pub use kotlin::KotlinExtractor;
pub use python::PythonExtractor;
pub use resolver::{ImportResolver, Resolution, TsPathConfig};
pub use typescript::TypeScriptExtractor;
