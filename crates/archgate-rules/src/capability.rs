//! Capability rules: `allowed-capability` and `forbidden-capability`.
//!
//! Both report one violation per offending capability occurrence, at the
//! line where it was detected.

use archgate_core::{
    DetectedCapability, Rule, RuleContext, RuleError, RuleKind, Severity, SourceFile, Violation,
};

use crate::meta::RuleMeta;

/// Only the listed capabilities may appear in checked files.
#[derive(Debug, Clone)]
pub struct AllowedCapability {
    meta: RuleMeta,
    allowed: Vec<String>,
    layer: Option<String>,
}

impl AllowedCapability {
    /// Creates the rule for all files.
    #[must_use]
    pub fn new<S: Into<String>>(allowed: impl IntoIterator<Item = S>) -> Self {
        Self {
            meta: RuleMeta::for_kind(RuleKind::AllowedCapability),
            allowed: allowed.into_iter().map(Into::into).collect(),
            layer: None,
        }
    }

    /// Restricts the rule to files of one layer.
    #[must_use]
    pub fn in_layer(mut self, layer: Option<String>) -> Self {
        self.layer = layer;
        self
    }

    /// Replaces the rule identity.
    #[must_use]
    pub fn with_meta(mut self, meta: RuleMeta) -> Self {
        self.meta = meta;
        self
    }
}

impl Rule for AllowedCapability {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn kind(&self) -> RuleKind {
        RuleKind::AllowedCapability
    }

    fn severity(&self) -> Severity {
        self.meta.severity
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        Ok(occurrences(ctx, self.layer.as_deref(), |c| {
            !self.allowed.iter().any(|a| *a == c.name)
        })
        .into_iter()
        .map(|(file, cap)| {
            capability_violation(
                &self.meta,
                file,
                cap,
                format!("Capability '{}' is not allowed here", cap.name),
            )
        })
        .collect())
    }
}

/// The listed capabilities must not appear in checked files.
#[derive(Debug, Clone)]
pub struct ForbiddenCapability {
    meta: RuleMeta,
    forbidden: Vec<String>,
    layer: Option<String>,
}

impl ForbiddenCapability {
    /// Creates the rule for all files.
    #[must_use]
    pub fn new<S: Into<String>>(forbidden: impl IntoIterator<Item = S>) -> Self {
        Self {
            meta: RuleMeta::for_kind(RuleKind::ForbiddenCapability),
            forbidden: forbidden.into_iter().map(Into::into).collect(),
            layer: None,
        }
    }

    /// Restricts the rule to files of one layer.
    #[must_use]
    pub fn in_layer(mut self, layer: Option<String>) -> Self {
        self.layer = layer;
        self
    }

    /// Replaces the rule identity.
    #[must_use]
    pub fn with_meta(mut self, meta: RuleMeta) -> Self {
        self.meta = meta;
        self
    }
}

impl Rule for ForbiddenCapability {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn kind(&self) -> RuleKind {
        RuleKind::ForbiddenCapability
    }

    fn severity(&self) -> Severity {
        self.meta.severity
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        Ok(occurrences(ctx, self.layer.as_deref(), |c| {
            self.forbidden.iter().any(|f| *f == c.name)
        })
        .into_iter()
        .map(|(file, cap)| {
            capability_violation(
                &self.meta,
                file,
                cap,
                format!("Capability '{}' is forbidden here", cap.name),
            )
        })
        .collect())
    }
}

fn occurrences<'a>(
    ctx: &RuleContext<'a>,
    layer: Option<&str>,
    offends: impl Fn(&DetectedCapability) -> bool,
) -> Vec<(&'a SourceFile, &'a DetectedCapability)> {
    ctx.files()
        .filter(|f| layer.is_none() || f.layer.as_deref() == layer)
        .flat_map(|f| f.capabilities.iter().map(move |c| (f, c)))
        .filter(|(_, c)| offends(c))
        .collect()
}

fn capability_violation(
    meta: &RuleMeta,
    file: &SourceFile,
    cap: &DetectedCapability,
    message: String,
) -> Violation {
    let mut v = meta
        .violation(&file.path, message)
        .with_metadata("capability", cap.name.as_str())
        .with_metadata("evidence", cap.evidence.as_str());
    if let Some(line) = cap.line {
        v = v.with_line(line);
    }
    if let Some(layer) = &file.layer {
        v = v.with_metadata("layer", layer.as_str());
    }
    v
}
