//! Type-safe identifiers for scenarios and interventions.
//!
//! Interventions are identified by a UUID v7 wrapper so that two markers
//! placed at the same year on the same timeline stay distinguishable.
//! Scenarios are identified by their ordinal, the small positive integer the
//! manager hands out in creation order and never reuses.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identity of a single intervention placed on a timeline.
    InterventionId
}

/// Ordinal of a scenario (its timeline), starting at 1.
///
/// Serialized as a bare integer because the document format carries it in
/// the `scenarioCount` field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct ScenarioOrdinal(pub u32);

impl ScenarioOrdinal {
    /// The ordinal handed to the first scenario of a session.
    pub const FIRST: Self = Self(1);

    /// Return the raw ordinal value.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The ordinal after this one, or `None` on overflow.
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl core::fmt::Display for ScenarioOrdinal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ScenarioOrdinal {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
