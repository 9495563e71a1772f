//! Runs rules against a shared context.
//!
//! Evaluation is fail-open: a rule that returns an error or panics is logged
//! and reported in [`CheckResult::failed_rules`], and the remaining rules
//! still run.

use std::panic::{catch_unwind, AssertUnwindSafe};

use archgate_core::{CheckResult, RuleBox, RuleConfig, RuleContext};
use tracing::{debug, info, warn};

use crate::factory::{create_rules, EngineError};

/// An ordered set of rules.
#[derive(Default)]
pub struct RuleEngine {
    rules: Vec<RuleBox>,
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rules.iter().map(|r| r.id()).collect::<Vec<_>>())
            .finish()
    }
}

impl RuleEngine {
    /// Creates an engine over already-built rules.
    #[must_use]
    pub fn new(rules: Vec<RuleBox>) -> Self {
        Self { rules }
    }

    /// Builds the engine from `[[rules]]` configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any rule cannot be constructed.
    pub fn from_config(configs: &[RuleConfig]) -> Result<Self, EngineError> {
        Ok(Self::new(create_rules(configs)?))
    }

    /// Adds a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// The rules, in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if the engine has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every rule and collects violations sorted by file, then line.
    #[must_use]
    pub fn check_rules(&self, ctx: &RuleContext<'_>) -> CheckResult {
        let mut result = CheckResult::new();
        result.files_checked = ctx.graph.file_count();

        for rule in &self.rules {
            debug!("Running rule: {}", rule.id());
            match catch_unwind(AssertUnwindSafe(|| rule.check(ctx))) {
                Ok(Ok(violations)) => {
                    debug!("Rule {} found {} violations", rule.id(), violations.len());
                    result.violations.extend(violations);
                }
                Ok(Err(e)) => {
                    warn!("Rule {} failed, skipping: {e}", rule.id());
                    result.failed_rules.push(rule.id().to_owned());
                }
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_owned())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_owned());
                    warn!("Rule {} panicked, skipping: {reason}", rule.id());
                    result.failed_rules.push(rule.id().to_owned());
                }
            }
        }

        result
            .violations
            .sort_by(|a, b| a.file.cmp(&b.file).then(a.effective_line().cmp(&b.effective_line())));

        info!(
            "Checked {} rules: {} violations in {} files",
            self.rules.len(),
            result.violations.len(),
            result.files_checked
        );
        result
    }
}
