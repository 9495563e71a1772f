//! Run summaries stored in the baseline and its history.

use archgate_core::{ProjectGraph, Severity, Violation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Size and coupling of a dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    /// Number of files.
    pub total_files: usize,
    /// Number of edges.
    pub total_edges: usize,
    /// Edges per file (0 for an empty graph).
    pub average_dependencies_per_file: f64,
    /// Files without a layer.
    pub unmapped_files: usize,
}

impl GraphStats {
    /// Derives stats from a graph.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_graph(graph: &ProjectGraph) -> Self {
        let total_files = graph.file_count();
        let total_edges = graph.edges.len();
        Self {
            total_files,
            total_edges,
            average_dependencies_per_file: if total_files == 0 {
                0.0
            } else {
                total_edges as f64 / total_files as f64
            },
            unmapped_files: graph.unmapped_count(),
        }
    }
}

/// Tallies of one set of violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// All violations.
    pub total: usize,
    /// Error violations.
    pub errors: usize,
    /// Warning violations.
    pub warnings: usize,
    /// Info violations.
    pub info: usize,
    /// Distinct files with at least one violation.
    pub files_affected: usize,
    /// `total / files_affected`, 0 when no file is affected.
    pub violation_density: f64,
    /// Average outgoing edges per file, when graph stats were given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupling_score: Option<f64>,
    /// 0 to 100, when graph stats were given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<u32>,
    /// When the metrics were computed.
    pub captured_at: DateTime<Utc>,
}

impl Metrics {
    /// Computes metrics for a set of violations.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute<'a>(
        violations: impl IntoIterator<Item = &'a Violation>,
        stats: Option<&GraphStats>,
    ) -> Self {
        let (mut errors, mut warnings, mut info) = (0, 0, 0);
        let mut files = HashSet::new();
        for v in violations {
            match v.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Info => info += 1,
            }
            files.insert(v.file.as_str());
        }
        let total = errors + warnings + info;
        let files_affected = files.len();

        Self {
            total,
            errors,
            warnings,
            info,
            files_affected,
            violation_density: if files_affected == 0 {
                0.0
            } else {
                total as f64 / files_affected as f64
            },
            coupling_score: stats.map(|s| s.average_dependencies_per_file),
            health_score: stats.map(|s| health_score(errors, warnings, info, s)),
            captured_at: Utc::now(),
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn health_score(errors: usize, warnings: usize, info: usize, stats: &GraphStats) -> u32 {
    let coupling_penalty = (stats.average_dependencies_per_file - 10.0).max(0.0) * 2.0;
    let unmapped_penalty = if stats.total_files == 0 {
        0.0
    } else {
        stats.unmapped_files as f64 / stats.total_files as f64 * 20.0
    };
    let score = 100.0
        - 5.0 * errors as f64
        - 2.0 * warnings as f64
        - 0.5 * info as f64
        - coupling_penalty
        - unmapped_penalty;
    // clamped to 0..=100 before the cast
    score.clamp(0.0, 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgate_core::{DependencyEdge, Language, SourceFile};

    fn v(file: &str, severity: Severity) -> Violation {
        Violation::new("r", severity, file, "m")
    }

    #[test]
    fn tallies_and_density() {
        let violations = [
            v("a.ts", Severity::Error),
            v("a.ts", Severity::Warning),
            v("b.ts", Severity::Info),
        ];
        let m = Metrics::compute(&violations, None);
        assert_eq!((m.total, m.errors, m.warnings, m.info), (3, 1, 1, 1));
        assert_eq!(m.files_affected, 2);
        assert!((m.violation_density - 1.5).abs() < f64::EPSILON);
        assert!(m.coupling_score.is_none());
        assert!(m.health_score.is_none());
    }

    #[test]
    fn empty_set_has_zero_density() {
        let m = Metrics::compute(&[], None);
        assert_eq!(m.total, 0);
        assert!(m.violation_density.abs() < f64::EPSILON);
    }

    #[test]
    fn health_score_penalties() {
        let stats = GraphStats {
            total_files: 10,
            total_edges: 120,
            average_dependencies_per_file: 12.0,
            unmapped_files: 5,
        };
        let violations = [v("a.ts", Severity::Error), v("b.ts", Severity::Warning), v("c.ts", Severity::Info)];
        // 100 - 5 - 2 - 0.5 - (12 - 10) * 2 - 0.5 * 20 = 78.5
        let m = Metrics::compute(&violations, Some(&stats));
        assert_eq!(m.health_score, Some(79));
        assert_eq!(m.coupling_score, Some(12.0));
    }

    #[test]
    fn health_score_is_clamped() {
        let stats = GraphStats {
            total_files: 1,
            total_edges: 0,
            average_dependencies_per_file: 0.0,
            unmapped_files: 0,
        };
        let violations: Vec<Violation> = (0..30).map(|_| v("a.ts", Severity::Error)).collect();
        assert_eq!(Metrics::compute(&violations, Some(&stats)).health_score, Some(0));
        assert_eq!(Metrics::compute(&[], Some(&stats)).health_score, Some(100));
    }

    #[test]
    fn stats_from_graph() {
        let mut g = ProjectGraph::new();
        g.insert_file(SourceFile::new("a.ts", Language::TypeScript).with_layer("domain"));
        g.insert_file(SourceFile::new("b.ts", Language::TypeScript));
        g.add_edge(DependencyEdge::import("a.ts", "b.ts", "typescript"));
        let stats = GraphStats::from_graph(&g);
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_edges, 1);
        assert!((stats.average_dependencies_per_file - 0.5).abs() < f64::EPSILON);
        assert_eq!(stats.unmapped_files, 1);
        assert_eq!(GraphStats::from_graph(&ProjectGraph::new()).average_dependencies_per_file, 0.0);
    }
}
