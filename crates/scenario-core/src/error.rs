//! Error types for the `scenario-core` crate.
//!
//! All fallible operations in this crate return [`ScenarioError`]. Only
//! [`ScenarioError::Validation`] is meant for the end user; every other
//! variant signals a caller that broke the interaction sequence.

use scenario_types::{InterventionId, ScenarioOrdinal};

/// Errors that can occur while editing scenarios.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    /// An argument was outside the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The user tried to save an incomplete intervention.
    #[error("{0}")]
    Validation(String),

    /// The operation does not fit the current state (deleted intervention,
    /// editor already open, editor closed).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A scenario with this ordinal does not exist.
    #[error("scenario not found: {0}")]
    ScenarioNotFound(ScenarioOrdinal),

    /// The scenario exists but has no such intervention.
    #[error("intervention {intervention} not found on scenario {scenario}")]
    InterventionNotFound {
        /// The scenario that was searched.
        scenario: ScenarioOrdinal,
        /// The missing intervention.
        intervention: InterventionId,
    },

    /// Ordinal allocation ran past `u32::MAX`.
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(&'static str),
}

impl ScenarioError {
    /// Message shown when saving without a selected intervention kind.
    pub const PRODUCT_NOT_SELECTED: &'static str = "product not selected";

    /// Whether the error should be shown to the end user as-is.
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether the error is one of the not-found variants.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ScenarioNotFound(_) | Self::InterventionNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_validation_is_user_facing() {
        assert!(ScenarioError::Validation(String::from("x")).is_user_facing());
        assert!(!ScenarioError::InvalidState(String::from("x")).is_user_facing());
        assert!(!ScenarioError::InvalidArgument(String::from("x")).is_user_facing());
        assert!(!ScenarioError::ScenarioNotFound(ScenarioOrdinal(1)).is_user_facing());
    }

    #[test]
    fn validation_displays_bare_message() {
        let err = ScenarioError::Validation(String::from(ScenarioError::PRODUCT_NOT_SELECTED));
        assert_eq!(err.to_string(), "product not selected");
    }
}
