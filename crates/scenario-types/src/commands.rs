//! Typed commands produced by the UI and the events they yield.
//!
//! Every user gesture the scenario board understands is one
//! [`BoardCommand`]. Applying a command yields one [`BoardEvent`] that the
//! server fans out to connected clients. No UI component writes into
//! another's fields directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::enums::InterventionKind;
use crate::ids::ScenarioOrdinal;
use crate::structs::{InterventionHandle, ScenarioDocument, SerializedIntervention};

/// A single pending-value edit coming from the intervention dialogue.
///
/// Serialized with a `field` tag, e.g. `{"field":"magnitude","value":12}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "field", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FieldUpdate {
    /// The intervention type selector. `None` is the empty selection,
    /// which the selector sends as `null`, `""` or no value at all.
    Kind {
        /// Selected kind, if any.
        #[serde(default, deserialize_with = "selection")]
        value: Option<InterventionKind>,
    },
    /// The year slider.
    Year {
        /// Year offset from the timeline start.
        value: u32,
    },
    /// The magnitude slider.
    Magnitude {
        /// Raw slider value; clamped on commit.
        #[serde(with = "rust_decimal::serde::float")]
        #[ts(type = "number")]
        value: Decimal,
    },
}

fn selection<'de, D>(deserializer: D) -> Result<Option<InterventionKind>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?.map_or(Ok(None), |raw| {
        InterventionKind::parse_selection(&raw).map_err(serde::de::Error::custom)
    })
}

/// A command applied to the scenario board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "command", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BoardCommand {
    /// Add a new scenario timeline.
    CreateScenario,
    /// Remove a scenario timeline and everything on it.
    DeleteScenario {
        /// The scenario to remove.
        scenario: ScenarioOrdinal,
    },
    /// Change a scenario's display name.
    RenameScenario {
        /// The scenario to rename.
        scenario: ScenarioOrdinal,
        /// The new name.
        name: String,
    },
    /// A click on a timeline: place an intervention and open the editor.
    OpenNew {
        /// The clicked timeline.
        scenario: ScenarioOrdinal,
        /// Horizontal click position relative to the timeline's left edge.
        x: f64,
    },
    /// A click anywhere on the board, in viewport pixels. Resolves to
    /// `OpenExisting` on a marker or `OpenNew` on a bare timeline bar.
    Click {
        /// Horizontal viewport position.
        x: f64,
        /// Vertical viewport position.
        y: f64,
    },
    /// A click on an existing intervention marker.
    OpenExisting {
        /// The clicked intervention.
        target: InterventionHandle,
    },
    /// A dialogue control changed.
    UpdateField {
        /// The new pending value.
        update: FieldUpdate,
    },
    /// The dialogue's "Save" action.
    Commit,
    /// The dialogue was dismissed.
    Cancel,
    /// The dialogue's "Delete" action.
    Delete,
}

/// What the dialogue collaborator presents while the editor is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DialogueForm {
    /// The intervention being edited.
    pub target: InterventionHandle,
    /// Whether the intervention was placed by the click that opened the
    /// editor and has not been saved yet.
    pub is_new: bool,
    /// Pending kind; `None` renders as the empty selection.
    pub kind: Option<InterventionKind>,
    /// Pending magnitude.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub magnitude: Decimal,
    /// Upper bound of the magnitude slider.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub magnitude_max: Decimal,
    /// Unit label shown beside the magnitude.
    pub unit: String,
    /// Pending year.
    pub year: u32,
    /// Upper bound of the year slider (the timeline span).
    pub year_max: u32,
}

/// The observable result of applying a [`BoardCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "event", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BoardEvent {
    /// A scenario timeline was created.
    ScenarioCreated {
        /// Ordinal of the new scenario.
        scenario: ScenarioOrdinal,
    },
    /// A scenario timeline was deleted.
    ScenarioDeleted {
        /// Ordinal of the removed scenario.
        scenario: ScenarioOrdinal,
        /// Number of interventions dropped with it.
        interventions_removed: usize,
    },
    /// A scenario was renamed.
    ScenarioRenamed {
        /// The renamed scenario.
        scenario: ScenarioOrdinal,
        /// Its new name.
        name: String,
    },
    /// The editor opened on an intervention.
    EditorOpened {
        /// The form to present.
        form: DialogueForm,
    },
    /// A pending value changed.
    FieldUpdated {
        /// The form with the new pending value.
        form: DialogueForm,
    },
    /// Pending values were written to the intervention.
    InterventionCommitted {
        /// The saved intervention.
        target: InterventionHandle,
        /// Its serialized form after the save.
        intervention: SerializedIntervention,
    },
    /// The editor closed without saving.
    EditorCancelled {
        /// The intervention that was being edited.
        target: InterventionHandle,
        /// Whether a freshly placed intervention was removed again.
        rolled_back: bool,
    },
    /// The intervention was removed from its timeline.
    InterventionDeleted {
        /// The removed intervention.
        target: InterventionHandle,
    },
    /// All scenarios were replaced from a stored document.
    DocumentRestored {
        /// The restored document.
        document: ScenarioDocument,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn field_update_wire_shape() {
        let update: Result<FieldUpdate, _> =
            serde_json::from_str(r#"{"field":"magnitude","value":12}"#);
        assert_eq!(update.ok(), Some(FieldUpdate::Magnitude { value: dec!(12) }));

        let cleared: Result<FieldUpdate, _> =
            serde_json::from_str(r#"{"field":"kind","value":null}"#);
        assert_eq!(cleared.ok(), Some(FieldUpdate::Kind { value: None }));
    }

    #[test]
    fn kind_update_accepts_selector_strings() {
        let parse = |json: &str| serde_json::from_str::<FieldUpdate>(json).ok();
        assert_eq!(
            parse(r#"{"field":"kind","value":""}"#),
            Some(FieldUpdate::Kind { value: None })
        );
        assert_eq!(
            parse(r#"{"field":"kind"}"#),
            Some(FieldUpdate::Kind { value: None })
        );
        assert_eq!(
            parse(r#"{"field":"kind","value":"Subsidy"}"#),
            Some(FieldUpdate::Kind {
                value: Some(InterventionKind::Subsidy)
            })
        );
        let unknown = serde_json::from_str::<FieldUpdate>(r#"{"field":"kind","value":"tariff"}"#);
        assert!(unknown.is_err_and(|e| e.to_string().contains("unknown intervention kind")));
    }

    #[test]
    fn command_wire_shape() {
        let json = r#"{"command":"open_new","scenario":1,"x":350.0}"#;
        let command: Result<BoardCommand, _> = serde_json::from_str(json);
        assert_eq!(
            command.ok(),
            Some(BoardCommand::OpenNew {
                scenario: ScenarioOrdinal(1),
                x: 350.0,
            })
        );

        let click: Result<BoardCommand, _> =
            serde_json::from_str(r#"{"command":"click","x":500.0,"y":570.0}"#);
        assert_eq!(click.ok(), Some(BoardCommand::Click { x: 500.0, y: 570.0 }));

        let commit: Result<BoardCommand, _> = serde_json::from_str(r#"{"command":"commit"}"#);
        assert_eq!(commit.ok(), Some(BoardCommand::Commit));
    }

    #[test]
    fn event_is_tagged() {
        let event = BoardEvent::ScenarioCreated {
            scenario: ScenarioOrdinal(2),
        };
        let value = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(
            value,
            serde_json::json!({ "event": "scenario_created", "scenario": 2 })
        );
    }
}
