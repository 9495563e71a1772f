//! # archgate-baseline
//!
//! Tracks accepted violations across runs so a project can adopt rules
//! incrementally.
//!
//! - [`fingerprint`] identifies "the same" violation between runs
//! - [`Metrics`] and [`GraphStats`] summarise a run for the history
//! - [`BaselineStore`] loads, updates, compares and atomically saves
//!   `.archgate/baseline.json`
//!
//! ## Example
//!
//! ```ignore
//! use archgate_baseline::{BaselineStore, GraphStats, DEFAULT_MAX_HISTORY};
//!
//! let mut store = BaselineStore::for_project(root);
//! let diff = store.compare_violations(&result.violations);
//! if diff.has_new_errors() || diff.ratchet_failed() {
//!     std::process::exit(1);
//! }
//! store.update_baseline(&result.violations, Some(&GraphStats::from_graph(&graph)), DEFAULT_MAX_HISTORY);
//! store.save()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod fingerprint;
mod metrics;
mod store;

pub use fingerprint::{fingerprint, FINGERPRINT_LEN};
pub use metrics::{GraphStats, Metrics};
pub use store::{
    Baseline, BaselineError, BaselineStore, BaselineViolation, ViolationDiff, BASELINE_FILE,
    BASELINE_VERSION, DEFAULT_MAX_HISTORY,
};
