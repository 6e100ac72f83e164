//! The serialized scenario document and the handles that point into it.
//!
//! Field names in this module are fixed by the persistence format:
//!
//! ```json
//! [
//!   {
//!     "scenarioCount": 1,
//!     "scenarioName": "baseline",
//!     "interventions": [{ "year": 5, "tax_value": 12 }]
//!   }
//! ]
//! ```
//!
//! `tax_value` is written for every intervention kind and always travels as
//! a JSON number.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{InterventionId, ScenarioOrdinal};

/// Wire form of a single intervention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SerializedIntervention {
    /// Year offset from the start of the timeline.
    pub year: u32,
    /// Magnitude of the intervention (a percentage for taxes).
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub tax_value: Decimal,
}

/// Wire form of one scenario timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SerializedTimeline {
    /// Ordinal of the scenario.
    pub scenario_count: ScenarioOrdinal,
    /// User-assigned scenario name, empty by default.
    #[serde(default)]
    pub scenario_name: String,
    /// Interventions in the order they were placed.
    #[serde(default)]
    pub interventions: Vec<SerializedIntervention>,
}

/// The full serialized scenario set, in timeline order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct ScenarioDocument(pub Vec<SerializedTimeline>);

impl ScenarioDocument {
    /// Number of scenarios in the document.
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document holds no scenarios.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the serialized timelines in order.
    pub fn iter(&self) -> core::slice::Iter<'_, SerializedTimeline> {
        self.0.iter()
    }
}

impl From<Vec<SerializedTimeline>> for ScenarioDocument {
    fn from(timelines: Vec<SerializedTimeline>) -> Self {
        Self(timelines)
    }
}

impl<'a> IntoIterator for &'a ScenarioDocument {
    type Item = &'a SerializedTimeline;
    type IntoIter = core::slice::Iter<'a, SerializedTimeline>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Points at one intervention on one scenario's timeline.
///
/// The ordinal is the non-owning back-reference from an intervention to its
/// timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InterventionHandle {
    /// The owning scenario.
    pub scenario: ScenarioOrdinal,
    /// The intervention within that scenario.
    pub intervention: InterventionId,
}
