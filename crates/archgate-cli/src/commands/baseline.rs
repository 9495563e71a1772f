//! Baseline command implementation.

use anyhow::{Context, Result};
use archgate_baseline::{BaselineStore, GraphStats};
use std::process::ExitCode;

use crate::pipeline::analyze;
use crate::project::ProjectLocation;

/// Runs the pipeline and records its violations as the new baseline.
///
/// The baseline always covers the whole project, whichever directory was given.
pub fn run(location: &ProjectLocation, max_history: usize) -> Result<ExitCode> {
    let analysis = analyze(location)?;
    let stats = GraphStats::from_graph(&analysis.graph);

    let mut store = BaselineStore::for_project(&analysis.root);
    let existed = store.baseline().is_some();
    let baseline = store.update_baseline(&analysis.result.violations, Some(&stats), max_history);

    let health = baseline
        .metrics
        .health_score
        .map_or_else(String::new, |h| format!(", health score {h}"));
    println!(
        "{} baseline with {} violation(s){health}",
        if existed { "Updated" } else { "Created" },
        baseline.violations.len(),
    );

    store
        .save()
        .with_context(|| format!("Failed to save {}", store.path().display()))?;
    println!("Wrote {}", store.path().display());
    Ok(ExitCode::SUCCESS)
}
