//! Error types for Project Ember.

use crate::EntityId;
use thiserror::Error;

/// Errors raised while binding or configuring an AI controller.
///
/// None of these are fatal: a controller that fails to bind stays inert and
/// every later update is a no-op.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AiError {
    /// The owner cannot be driven by this controller's policy
    #[error("{policy} policy cannot drive {entity} of kind {kind}")]
    IncompatibleOwner {
        /// Owner entity
        entity: EntityId,
        /// Kind reported by the owner
        kind: String,
        /// Policy name
        policy: &'static str,
    },

    /// A tuning value is out of its valid domain
    #[error("invalid AI configuration: {field} {reason}")]
    InvalidConfig {
        /// Offending field
        field: &'static str,
        /// Why the value is rejected
        reason: String,
    },
}

impl AiError {
    /// Shorthand for [`AiError::InvalidConfig`].
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for AI operations.
pub type AiResult<T> = Result<T, AiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AiError::invalid("think_interval", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid AI configuration: think_interval must be positive"
        );

        let err = AiError::IncompatibleOwner {
            entity: EntityId::from_raw(3),
            kind: "npc".to_string(),
            policy: "monster",
        };
        assert_eq!(err.to_string(), "monster policy cannot drive #3 of kind npc");
    }
}
