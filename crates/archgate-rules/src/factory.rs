//! Builds rule instances from `[[rules]]` configuration.

use archgate_core::{PatternError, RuleBox, RuleCheck, RuleConfig};
use tracing::{debug, warn};

use crate::{
    AllowedCapability, AllowedLayerImport, ContextVisibility, CyclicDependency,
    ExternalDependency, FilePatternLayer, ForbiddenCapability, ForbiddenLayerImport,
    MaxDependencies, NaturalLanguage, RuleMeta,
};

/// Errors constructing rules from configuration.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A rule's glob pattern does not compile.
    #[error("rule `{rule_id}`: {source}")]
    InvalidPattern {
        /// Rule whose pattern failed.
        rule_id: String,
        /// The pattern error.
        source: PatternError,
    },
}

/// Creates the rule described by one configuration entry.
///
/// # Errors
///
/// Returns an error if the entry cannot be turned into a rule.
pub fn create_rule(config: &RuleConfig) -> Result<RuleBox, EngineError> {
    let meta = RuleMeta::from_config(config);
    let rule: RuleBox = match &config.check {
        RuleCheck::ForbiddenLayerImport { from, to } => {
            Box::new(ForbiddenLayerImport::new(from, to).with_meta(meta))
        }
        RuleCheck::AllowedLayerImport { from, allowed } => {
            Box::new(AllowedLayerImport::new(from, allowed).with_meta(meta))
        }
        RuleCheck::FilePatternLayer {
            pattern,
            required_layer,
        } => {
            let rule = FilePatternLayer::new(pattern, required_layer).map_err(|source| {
                EngineError::InvalidPattern {
                    rule_id: meta.id.clone(),
                    source,
                }
            })?;
            Box::new(rule.with_meta(meta))
        }
        RuleCheck::MaxDependencies { max, layer } => {
            Box::new(MaxDependencies::new(*max).in_layer(layer.clone()).with_meta(meta))
        }
        RuleCheck::CyclicDependency => Box::new(CyclicDependency::new().with_meta(meta)),
        RuleCheck::ExternalDependency { allowed, layer } => Box::new(
            ExternalDependency::new(allowed)
                .in_layer(layer.clone())
                .with_meta(meta),
        ),
        RuleCheck::AllowedCapability { allowed, layer } => Box::new(
            AllowedCapability::new(allowed)
                .in_layer(layer.clone())
                .with_meta(meta),
        ),
        RuleCheck::ForbiddenCapability { forbidden, layer } => Box::new(
            ForbiddenCapability::new(forbidden)
                .in_layer(layer.clone())
                .with_meta(meta),
        ),
        RuleCheck::ContextVisibility { contexts } => {
            Box::new(ContextVisibility::new(contexts).with_meta(meta))
        }
        RuleCheck::NaturalLanguage { text } => {
            warn!(
                "Rule '{}' is a natural-language rule; it is recorded but not evaluated",
                meta.id
            );
            Box::new(NaturalLanguage::new(text.as_str()).with_meta(meta))
        }
    };
    debug!("Created rule '{}' ({})", rule.id(), rule.kind());
    Ok(rule)
}

/// Creates every configured rule, in configuration order.
///
/// # Errors
///
/// Returns the first construction error; no partial rule set is returned.
pub fn create_rules(configs: &[RuleConfig]) -> Result<Vec<RuleBox>, EngineError> {
    configs.iter().map(create_rule).collect()
}
