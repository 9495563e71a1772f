//! The persisted baseline and the ratchet comparison.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use archgate_core::{Severity, Violation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::fingerprint::fingerprint;
use crate::metrics::{GraphStats, Metrics};

/// Current on-disk format version.
pub const BASELINE_VERSION: u32 = 1;

/// Default number of metrics snapshots kept in the history.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Baseline location relative to the project root.
pub const BASELINE_FILE: &str = ".archgate/baseline.json";

/// Errors writing the baseline.
#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    /// Failed to create the directory or the temporary file.
    #[error("failed to write baseline {path}: {source}")]
    Io {
        /// Baseline path.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },
    /// Failed to serialize the baseline.
    #[error("failed to serialize baseline: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Failed to move the temporary file into place.
    #[error("failed to replace baseline: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// A violation accepted into the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineViolation {
    /// The violation as it was reported.
    #[serde(flatten)]
    pub violation: Violation,
    /// See [`fingerprint`](crate::fingerprint()).
    pub fingerprint: String,
    /// When the violation was first accepted.
    pub first_seen: DateTime<Utc>,
}

/// The persisted set of accepted violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    /// Format version.
    pub version: u32,
    /// Accepted violations.
    pub violations: Vec<BaselineViolation>,
    /// Metrics of the accepted violations.
    pub metrics: Metrics,
    /// Earlier metrics, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics_history: Vec<Metrics>,
    /// When the baseline was first created.
    pub created_at: DateTime<Utc>,
    /// When the baseline was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Baseline {
    /// How many accepted violations carry each fingerprint.
    fn fingerprint_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for v in &self.violations {
            *counts.entry(v.fingerprint.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

/// Current violations compared with the baseline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViolationDiff {
    /// Not in the baseline.
    pub new: Vec<Violation>,
    /// Already in the baseline.
    pub unchanged: Vec<Violation>,
    /// In the baseline but no longer reported.
    pub resolved: Vec<BaselineViolation>,
}

impl ViolationDiff {
    /// True if any new violation is an error.
    #[must_use]
    pub fn has_new_errors(&self) -> bool {
        self.new.iter().any(|v| v.severity == Severity::Error)
    }

    /// True if baseline entries were fixed without updating the baseline.
    #[must_use]
    pub fn ratchet_failed(&self) -> bool {
        !self.resolved.is_empty()
    }
}

/// Loads, mutates and saves one project's baseline.
#[derive(Debug)]
pub struct BaselineStore {
    path: PathBuf,
    baseline: Option<Baseline>,
}

impl BaselineStore {
    /// A store with no baseline that will be written to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            baseline: None,
        }
    }

    /// Loads `<root>/.archgate/baseline.json`.
    #[must_use]
    pub fn for_project(root: &Path) -> Self {
        Self::load(root.join(BASELINE_FILE))
    }

    /// Loads the baseline at `path`.
    ///
    /// A missing, unreadable, corrupt or version-mismatched file yields a
    /// store without a baseline.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No baseline at {}", path.display());
                return Self::new(path);
            }
            Err(e) => {
                warn!("Failed to read baseline {}: {e}; ignoring it", path.display());
                return Self::new(path);
            }
        };
        let baseline = match serde_json::from_str::<Baseline>(&content) {
            Ok(b) if b.version == BASELINE_VERSION => Some(b),
            Ok(b) => {
                warn!(
                    "Ignoring baseline {} with version {} (expected {BASELINE_VERSION})",
                    path.display(),
                    b.version
                );
                None
            }
            Err(e) => {
                warn!("Ignoring corrupt baseline {}: {e}", path.display());
                None
            }
        };
        Self { path, baseline }
    }

    /// Baseline file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded or last written baseline.
    #[must_use]
    pub fn baseline(&self) -> Option<&Baseline> {
        self.baseline.as_ref()
    }

    /// Replaces any baseline with a fresh one accepting `violations`.
    pub fn create_baseline(&mut self, violations: &[Violation], stats: Option<&GraphStats>) -> &Baseline {
        let now = Utc::now();
        let baseline = Baseline {
            version: BASELINE_VERSION,
            violations: violations
                .iter()
                .map(|v| BaselineViolation {
                    fingerprint: fingerprint(v),
                    violation: v.clone(),
                    first_seen: now,
                })
                .collect(),
            metrics: Metrics::compute(violations, stats),
            metrics_history: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        info!("Created baseline with {} violations", baseline.violations.len());
        self.baseline.insert(baseline)
    }

    /// Accepts exactly `violations`, keeping `first_seen` of retained entries.
    ///
    /// The previous metrics are appended to the history, which keeps the most
    /// recent `max_history` entries. Creates the baseline if there is none.
    pub fn update_baseline(
        &mut self,
        violations: &[Violation],
        stats: Option<&GraphStats>,
        max_history: usize,
    ) -> &Baseline {
        let Some(mut previous) = self.baseline.take() else {
            return self.create_baseline(violations, stats);
        };

        let now = Utc::now();
        let mut first_seen: HashMap<&str, VecDeque<DateTime<Utc>>> = HashMap::new();
        for v in &previous.violations {
            first_seen
                .entry(v.fingerprint.as_str())
                .or_default()
                .push_back(v.first_seen);
        }

        let mut retained = 0;
        let updated: Vec<BaselineViolation> = violations
            .iter()
            .map(|v| {
                let fp = fingerprint(v);
                let seen = first_seen.get_mut(fp.as_str()).and_then(VecDeque::pop_front);
                if seen.is_some() {
                    retained += 1;
                }
                BaselineViolation {
                    first_seen: seen.unwrap_or(now),
                    fingerprint: fp,
                    violation: v.clone(),
                }
            })
            .collect();
        debug!(
            "Baseline update: {retained} retained, {} added, {} dropped",
            updated.len() - retained,
            previous.violations.len().saturating_sub(retained)
        );

        let mut history = std::mem::take(&mut previous.metrics_history);
        history.push(previous.metrics);
        if history.len() > max_history {
            history.drain(..history.len() - max_history);
        }

        let baseline = Baseline {
            version: BASELINE_VERSION,
            metrics: Metrics::compute(violations, stats),
            violations: updated,
            metrics_history: history,
            created_at: previous.created_at,
            updated_at: now,
        };
        info!("Updated baseline: {} violations", baseline.violations.len());
        self.baseline.insert(baseline)
    }

    /// Splits current violations into new and unchanged, and lists the
    /// baseline entries that are no longer reported.
    ///
    /// Fingerprints are matched as a multiset: when several violations share
    /// a fingerprint, only as many as the baseline holds count as unchanged.
    #[must_use]
    pub fn compare_violations(&self, violations: &[Violation]) -> ViolationDiff {
        let Some(baseline) = &self.baseline else {
            return ViolationDiff {
                new: violations.to_vec(),
                ..ViolationDiff::default()
            };
        };

        let mut remaining = baseline.fingerprint_counts();
        let mut diff = ViolationDiff::default();
        for v in violations {
            match remaining.get_mut(fingerprint(v).as_str()) {
                Some(left) if *left > 0 => {
                    *left -= 1;
                    diff.unchanged.push(v.clone());
                }
                _ => diff.new.push(v.clone()),
            }
        }
        for b in &baseline.violations {
            if let Some(left) = remaining.get_mut(b.fingerprint.as_str()) {
                if *left > 0 {
                    *left -= 1;
                    diff.resolved.push(b.clone());
                }
            }
        }
        diff
    }

    /// Writes the baseline atomically: a temporary file in the same
    /// directory is renamed over the target. Does nothing without a baseline.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or moved into place.
    pub fn save(&self) -> Result<(), BaselineError> {
        let Some(baseline) = &self.baseline else {
            debug!("No baseline to save");
            return Ok(());
        };
        let io_err = |source| BaselineError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(io_err)?;

        let content = serde_json::to_vec_pretty(baseline)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(&content).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path)?;

        debug!("Saved baseline to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgate_core::SourceRange;

    fn v(file: &str, line: usize) -> Violation {
        Violation::new("forbidden-layer-import", Severity::Error, file, "m")
            .with_range(SourceRange::line(line))
    }

    #[test]
    fn ratchet_round_trip() {
        let v1 = v("src/a.ts", 1);
        let v2 = v("src/b.ts", 2);
        let mut store = BaselineStore::new("unused.json");
        store.update_baseline(&[v1.clone()], None, DEFAULT_MAX_HISTORY);
        store.update_baseline(&[v1.clone(), v2.clone()], None, DEFAULT_MAX_HISTORY);

        let diff = store.compare_violations(&[v1.clone()]);
        assert!(diff.new.is_empty());
        assert_eq!(diff.unchanged, vec![v1]);
        assert_eq!(diff.resolved.len(), 1);
        assert_eq!(diff.resolved[0].violation, v2);
        assert!(diff.ratchet_failed());
        assert!(!diff.has_new_errors());
    }

    #[test]
    fn update_keeps_first_seen_and_created_at() {
        let v1 = v("src/a.ts", 1);
        let mut store = BaselineStore::new("unused.json");
        let created = store.create_baseline(&[v1.clone()], None).clone();

        let mut reworded = v1.clone();
        reworded.message = "reworded".into();
        let updated = store.update_baseline(&[reworded, v("src/c.ts", 5)], None, DEFAULT_MAX_HISTORY);

        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.violations[0].first_seen, created.violations[0].first_seen);
        assert!(updated.violations[1].first_seen >= created.updated_at);
        assert_eq!(updated.metrics_history, vec![created.metrics]);
    }

    #[test]
    fn history_keeps_most_recent_entries() {
        let mut store = BaselineStore::new("unused.json");
        let mut violations = Vec::new();
        for i in 1..=55 {
            violations.push(v("src/a.ts", i));
            store.update_baseline(&violations, None, DEFAULT_MAX_HISTORY);
        }
        let history = &store.baseline().unwrap().metrics_history;
        assert_eq!(history.len(), 50);
        assert_eq!(history.first().unwrap().total, 5);
        assert_eq!(history.last().unwrap().total, 54);
    }

    fn unlocated(file: &str, message: &str) -> Violation {
        Violation::new("external-dependency", Severity::Error, file, message)
    }

    #[test]
    fn shared_fingerprints_are_counted() {
        let lodash = unlocated("src/a.ts", "lodash");
        let left_pad = unlocated("src/a.ts", "left-pad");
        assert_eq!(fingerprint(&lodash), fingerprint(&left_pad));

        let mut store = BaselineStore::new("unused.json");
        store.create_baseline(&[lodash.clone()], None);

        let diff = store.compare_violations(&[lodash.clone(), left_pad.clone()]);
        assert_eq!(diff.unchanged, vec![lodash.clone()]);
        assert_eq!(diff.new, vec![left_pad.clone()]);
        assert!(diff.has_new_errors());

        store.update_baseline(&[lodash.clone(), left_pad.clone()], None, DEFAULT_MAX_HISTORY);
        let diff = store.compare_violations(&[lodash]);
        assert!(diff.new.is_empty());
        assert_eq!(diff.resolved.len(), 1);
        assert!(diff.ratchet_failed());
    }

    #[test]
    fn shared_fingerprints_keep_first_seen_per_occurrence() {
        let first = unlocated("src/a.ts", "one");
        let mut store = BaselineStore::new("unused.json");
        let created = store.create_baseline(&[first.clone()], None).clone();

        let updated = store.update_baseline(&[first.clone(), first], None, DEFAULT_MAX_HISTORY);
        assert_eq!(updated.violations[0].first_seen, created.violations[0].first_seen);
        assert!(updated.violations[1].first_seen >= created.updated_at);
    }

    #[test]
    fn compare_without_baseline_is_all_new() {
        let store = BaselineStore::new("unused.json");
        let diff = store.compare_violations(&[v("src/a.ts", 1)]);
        assert_eq!(diff.new.len(), 1);
        assert!(diff.has_new_errors());
        assert!(!diff.ratchet_failed());
    }
}
