//! # archgate-rules
//!
//! Built-in structural rules and the engine that runs them.
//!
//! Every rule works on the whole-project [`RuleContext`]: files already carry
//! their layer, context and detected capabilities, and edges are resolved
//! imports between project files.
//!
//! ## Available Rules
//!
//! | Kind | Flags |
//! |------|-------|
//! | `forbidden-layer-import` | edges from layer `from` to layer `to` |
//! | `allowed-layer-import` | edges from layer `from` to a mapped layer outside `allowed` |
//! | `file-pattern-layer` | files matching `pattern` outside `required-layer` |
//! | `max-dependencies` | files with more than `max` outgoing edges |
//! | `cyclic-dependency` | every file of an import cycle |
//! | `external-dependency` | external packages outside `allowed` |
//! | `allowed-capability` | capability occurrences outside `allowed` |
//! | `forbidden-capability` | capability occurrences listed in `forbidden` |
//! | `context-visibility` | cross-context edges to internal files or undeclared contexts |
//! | `natural-language` | nothing (accepted, not evaluated) |
//!
//! ## Usage
//!
//! ```ignore
//! use archgate_core::{ContextResolver, ProjectConfig, RuleContext};
//! use archgate_rules::RuleEngine;
//!
//! let engine = RuleEngine::from_config(&config.rules)?;
//! let contexts = ContextResolver::from_config(&config)?;
//! let result = engine.check_rules(&RuleContext::new(&graph, &contexts));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod capability;
mod context_visibility;
mod cycles;
mod engine;
mod external;
mod factory;
mod file_pattern;
mod layer_import;
mod max_dependencies;
mod meta;
mod natural_language;

pub use capability::{AllowedCapability, ForbiddenCapability};
pub use context_visibility::ContextVisibility;
pub use cycles::{strongly_connected_components, CyclicDependency};
pub use engine::RuleEngine;
pub use external::ExternalDependency;
pub use factory::{create_rule, create_rules, EngineError};
pub use file_pattern::FilePatternLayer;
pub use layer_import::{AllowedLayerImport, ForbiddenLayerImport};
pub use max_dependencies::MaxDependencies;
pub use meta::RuleMeta;
pub use natural_language::NaturalLanguage;

/// Re-export core types for convenience.
pub use archgate_core::{CheckResult, Rule, RuleContext, RuleKind, Severity, Violation};
