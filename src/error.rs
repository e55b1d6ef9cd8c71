//! Error types for rule construction and policy loading
//!
//! Evaluation itself never fails; everything here is raised while a rule set
//! is being built.

use thiserror::Error;

/// Result alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while building topic permissions or compiling a policy
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Topic pattern violates the filter grammar
    #[error("invalid topic pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    /// QoS value outside 0..=2
    #[error("invalid QoS level {0} (expected 0, 1 or 2)")]
    InvalidQos(u8),

    /// A configured rule could not be compiled
    #[error("failed to compile rule '{rule}': {source}")]
    InvalidRule {
        rule: String,
        #[source]
        source: Box<ConfigError>,
    },

    /// Principal match condition is not a valid regex
    #[error("invalid regex for principal '{principal}': {source}")]
    InvalidRegex {
        principal: String,
        #[source]
        source: regex::Error,
    },
}

impl ConfigError {
    pub(crate) fn pattern(pattern: &str, reason: &'static str) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        }
    }

    pub(crate) fn in_rule(self, rule: impl Into<String>) -> Self {
        Self::InvalidRule {
            rule: rule.into(),
            source: Box::new(self),
        }
    }
}
