//! Enumeration types shared between the core and its collaborators.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The kind of policy action an intervention represents.
///
/// Serialized in lowercase to match the values offered by the intervention
/// type selector (`tax`, `subsidy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum InterventionKind {
    /// A tax levied from the intervention year onward.
    Tax,
    /// A subsidy paid from the intervention year onward.
    Subsidy,
}

impl InterventionKind {
    /// Every kind, in selector order.
    pub const ALL: [Self; 2] = [Self::Tax, Self::Subsidy];

    /// The selector value for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tax => "tax",
            Self::Subsidy => "subsidy",
        }
    }

    /// Unit label shown next to the magnitude value.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Tax | Self::Subsidy => "%",
        }
    }

    /// Inclusive upper bound for this kind's magnitude.
    ///
    /// Both kinds are percentages today.
    pub const fn magnitude_ceiling(self) -> Decimal {
        match self {
            Self::Tax | Self::Subsidy => Decimal::ONE_HUNDRED,
        }
    }

    /// Parse a selector value where the empty string means "nothing selected".
    ///
    /// # Errors
    ///
    /// Returns [`UnknownInterventionKind`] for a non-empty value that names
    /// no kind.
    pub fn parse_selection(value: &str) -> Result<Option<Self>, UnknownInterventionKind> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl core::fmt::Display for InterventionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterventionKind {
    type Err = UnknownInterventionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownInterventionKind(s.to_owned()))
    }
}

/// A selector value that does not name any [`InterventionKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown intervention kind: {0:?}")]
pub struct UnknownInterventionKind(pub String);

/// What the editor does with a freshly placed intervention when the
/// dialogue is cancelled before its first save.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CancelPolicy {
    /// Leave the marker on the timeline with its default values.
    #[default]
    Keep,
    /// Remove the marker again.
    Rollback,
}
