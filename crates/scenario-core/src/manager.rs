//! The registry of scenario timelines.
//!
//! [`ScenarioManager`] owns every [`Timeline`] in creation order and hands
//! out scenario ordinals starting at 1. Ordinals are never reused: deleting
//! scenario 2 of 3 and creating another yields ordinal 4.
//!
//! The manager is also the only place interventions are addressed from
//! outside their timeline, through an [`InterventionHandle`]. Deleted
//! scenarios and interventions are remembered so a stale handle reports
//! [`ScenarioError::InvalidState`] instead of a plain not-found.

use std::collections::BTreeSet;

use scenario_types::{
    InterventionHandle, InterventionId, InterventionKind, ScenarioDocument, ScenarioOrdinal,
};

use crate::config::{LayoutConfig, ScenarioConfig, StudioConfig};
use crate::error::ScenarioError;
use crate::intervention::Intervention;
use crate::timeline::Timeline;

/// Owns all scenario timelines.
#[derive(Debug, Clone)]
pub struct ScenarioManager {
    scenario: ScenarioConfig,
    layout: LayoutConfig,
    restore_kind: InterventionKind,
    next_ordinal: ScenarioOrdinal,
    timelines: Vec<Timeline>,
    /// Ordinals of deleted scenarios; at most one entry per ordinal ever
    /// handed out.
    retired_scenarios: BTreeSet<ScenarioOrdinal>,
    /// Interventions deleted from scenarios that are still live. A
    /// scenario's entries are dropped once the scenario itself is retired,
    /// so this holds no more than the deletes made on live timelines.
    retired: BTreeSet<(ScenarioOrdinal, InterventionId)>,
}

impl ScenarioManager {
    /// Create an empty manager.
    ///
    /// `restore_kind` is the kind given to interventions rebuilt from a
    /// document, which does not record kinds.
    pub const fn new(
        scenario: ScenarioConfig,
        layout: LayoutConfig,
        restore_kind: InterventionKind,
    ) -> Self {
        Self {
            scenario,
            layout,
            restore_kind,
            next_ordinal: ScenarioOrdinal::FIRST,
            timelines: Vec::new(),
            retired_scenarios: BTreeSet::new(),
            retired: BTreeSet::new(),
        }
    }

    /// Create an empty manager from the loaded configuration.
    pub const fn from_config(config: &StudioConfig) -> Self {
        Self::new(config.scenario, config.layout, config.editor.default_kind)
    }

    /// The scenario defaults this manager was built with.
    pub const fn scenario_config(&self) -> &ScenarioConfig {
        &self.scenario
    }

    /// The ordinal the next created scenario will receive.
    pub const fn next_ordinal(&self) -> ScenarioOrdinal {
        self.next_ordinal
    }

    /// All timelines in creation order.
    pub fn timelines(&self) -> &[Timeline] {
        &self.timelines
    }

    /// Number of live scenarios.
    pub const fn len(&self) -> usize {
        self.timelines.len()
    }

    /// Whether there are no live scenarios.
    pub const fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Create a new scenario timeline with the configured span.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ArithmeticOverflow`] once `u32::MAX`
    /// ordinals have been handed out.
    pub fn create_scenario(&mut self) -> Result<&Timeline, ScenarioError> {
        let ordinal = self.next_ordinal;
        let next = ordinal
            .checked_next()
            .ok_or(ScenarioError::ArithmeticOverflow("scenario ordinal"))?;
        let timeline = Timeline::new(ordinal, self.scenario.span_years, self.layout)?;
        self.next_ordinal = next;
        self.timelines.push(timeline);
        tracing::debug!(scenario = %ordinal, span = self.scenario.span_years, "scenario created");

        self.timelines.last().ok_or_else(|| {
            ScenarioError::InvalidState(String::from("timeline missing after append"))
        })
    }

    /// Delete a scenario and every intervention on it.
    ///
    /// The ordinal is not reclaimed. Handles to the dropped interventions
    /// become stale.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ScenarioNotFound`] if no live scenario has
    /// this ordinal.
    pub fn delete_scenario(&mut self, ordinal: ScenarioOrdinal) -> Result<Timeline, ScenarioError> {
        let position = self
            .timelines
            .iter()
            .position(|t| t.ordinal() == ordinal)
            .ok_or(ScenarioError::ScenarioNotFound(ordinal))?;
        let removed = self.timelines.remove(position);
        self.retire_scenario(ordinal);
        tracing::debug!(
            scenario = %ordinal,
            interventions = removed.len(),
            "scenario deleted"
        );
        Ok(removed)
    }

    /// Look up a scenario timeline.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ScenarioNotFound`] for an unknown ordinal.
    pub fn timeline(&self, ordinal: ScenarioOrdinal) -> Result<&Timeline, ScenarioError> {
        self.timelines
            .iter()
            .find(|t| t.ordinal() == ordinal)
            .ok_or(ScenarioError::ScenarioNotFound(ordinal))
    }

    /// Look up a scenario timeline for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ScenarioNotFound`] for an unknown ordinal.
    pub fn timeline_mut(&mut self, ordinal: ScenarioOrdinal) -> Result<&mut Timeline, ScenarioError> {
        self.timelines
            .iter_mut()
            .find(|t| t.ordinal() == ordinal)
            .ok_or(ScenarioError::ScenarioNotFound(ordinal))
    }

    /// Set a scenario's display name.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ScenarioNotFound`] for an unknown ordinal.
    pub fn rename_scenario(
        &mut self,
        ordinal: ScenarioOrdinal,
        name: impl Into<String>,
    ) -> Result<(), ScenarioError> {
        self.timeline_mut(ordinal)?.rename(name);
        Ok(())
    }

    /// Place an intervention on a scenario at pixel offset `x`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ScenarioNotFound`] for an unknown ordinal,
    /// or [`ScenarioError::InvalidArgument`] for a non-finite `x`.
    pub fn add_intervention(
        &mut self,
        ordinal: ScenarioOrdinal,
        x: f64,
        kind: InterventionKind,
    ) -> Result<InterventionHandle, ScenarioError> {
        self.timeline_mut(ordinal)?
            .add_intervention(x, kind)
            .map(Intervention::handle)
    }

    /// Whether the handle points at a deleted intervention or into a
    /// deleted scenario.
    pub fn is_retired(&self, handle: InterventionHandle) -> bool {
        self.retired_scenarios.contains(&handle.scenario)
            || self.retired.contains(&(handle.scenario, handle.intervention))
    }

    fn retire_scenario(&mut self, ordinal: ScenarioOrdinal) {
        self.retired_scenarios.insert(ordinal);
        self.retired.retain(|(scenario, _)| *scenario != ordinal);
    }

    /// Resolve a handle to its intervention.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidState`] if the intervention was
    /// deleted, or a not-found variant if the handle never existed.
    pub fn intervention(&self, handle: InterventionHandle) -> Result<&Intervention, ScenarioError> {
        self.ensure_live(handle)?;
        self.timeline(handle.scenario)?
            .intervention(handle.intervention)
            .ok_or(ScenarioError::InterventionNotFound {
                scenario: handle.scenario,
                intervention: handle.intervention,
            })
    }

    /// Resolve a handle to its intervention for mutation.
    ///
    /// # Errors
    ///
    /// Same as [`ScenarioManager::intervention`].
    pub fn intervention_mut(
        &mut self,
        handle: InterventionHandle,
    ) -> Result<&mut Intervention, ScenarioError> {
        self.ensure_live(handle)?;
        self.timeline_mut(handle.scenario)?
            .intervention_mut(handle.intervention)
            .ok_or(ScenarioError::InterventionNotFound {
                scenario: handle.scenario,
                intervention: handle.intervention,
            })
    }

    /// Delete an intervention from its owning timeline.
    ///
    /// The timeline itself is unaffected. Any later use of the handle fails
    /// with [`ScenarioError::InvalidState`].
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidState`] if it was already deleted, or
    /// a not-found variant if the handle never existed.
    pub fn delete_intervention(
        &mut self,
        handle: InterventionHandle,
    ) -> Result<Intervention, ScenarioError> {
        self.ensure_live(handle)?;
        let removed = self
            .timeline_mut(handle.scenario)?
            .remove_intervention(handle.intervention)?;
        self.retired.insert((handle.scenario, removed.id()));
        Ok(removed)
    }

    /// Serialize every scenario, in timeline order.
    pub fn serialize(&self) -> ScenarioDocument {
        ScenarioDocument(self.timelines.iter().map(Timeline::serialize).collect())
    }

    /// Replace all scenarios with the contents of a stored document.
    ///
    /// Ordinals from the document are kept. The next ordinal continues past
    /// both the document's largest ordinal and every ordinal this manager
    /// has already handed out. Nothing changes if the document is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidArgument`] if an ordinal is zero or
    /// appears twice.
    pub fn restore(&mut self, document: &ScenarioDocument) -> Result<(), ScenarioError> {
        let mut seen = BTreeSet::new();
        let mut timelines = Vec::with_capacity(document.len());
        for serialized in document {
            if !seen.insert(serialized.scenario_count) {
                return Err(ScenarioError::InvalidArgument(format!(
                    "duplicate scenario ordinal {} in document",
                    serialized.scenario_count
                )));
            }
            timelines.push(Timeline::from_serialized(
                serialized,
                self.scenario.span_years,
                self.restore_kind,
                self.layout,
            )?);
        }

        let next = match seen.last() {
            Some(max) => max
                .checked_next()
                .ok_or(ScenarioError::ArithmeticOverflow("scenario ordinal"))?
                .max(self.next_ordinal),
            None => self.next_ordinal,
        };

        let old = std::mem::replace(&mut self.timelines, timelines);
        for timeline in &old {
            let ordinal = timeline.ordinal();
            if seen.contains(&ordinal) {
                self.retired
                    .extend(timeline.intervention_ids().map(|id| (ordinal, id)));
            } else {
                self.retire_scenario(ordinal);
            }
        }
        for ordinal in &seen {
            self.retired_scenarios.remove(ordinal);
        }
        self.next_ordinal = next;
        tracing::debug!(
            scenarios = self.timelines.len(),
            next_ordinal = %self.next_ordinal,
            "scenarios restored"
        );
        Ok(())
    }

    fn ensure_live(&self, handle: InterventionHandle) -> Result<(), ScenarioError> {
        if self.retired_scenarios.contains(&handle.scenario) {
            return Err(ScenarioError::InvalidState(format!(
                "scenario {} has been deleted",
                handle.scenario
            )));
        }
        if self.retired.contains(&(handle.scenario, handle.intervention)) {
            return Err(ScenarioError::InvalidState(format!(
                "intervention {} has been deleted",
                handle.intervention
            )));
        }
        Ok(())
    }
}

impl Default for ScenarioManager {
    fn default() -> Self {
        Self::from_config(&StudioConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use scenario_types::{SerializedIntervention, SerializedTimeline};

    fn ordinals(manager: &ScenarioManager) -> Vec<u32> {
        manager.timelines().iter().map(|t| t.ordinal().get()).collect()
    }

    #[test]
    fn ordinals_start_at_one_and_increase() {
        let mut manager = ScenarioManager::default();
        for expected in 1..=3 {
            let ordinal = manager.create_scenario().map(Timeline::ordinal);
            assert_eq!(ordinal, Ok(ScenarioOrdinal(expected)));
        }
        assert_eq!(ordinals(&manager), vec![1, 2, 3]);
    }

    #[test]
    fn deleted_ordinals_are_never_reused() {
        let mut manager = ScenarioManager::default();
        for _ in 0..3 {
            manager.create_scenario().unwrap();
        }
        assert!(manager.delete_scenario(ScenarioOrdinal(2)).is_ok());
        let fourth = manager.create_scenario().map(Timeline::ordinal);

        assert_eq!(fourth, Ok(ScenarioOrdinal(4)));
        assert_eq!(ordinals(&manager), vec![1, 3, 4]);
    }

    #[test]
    fn delete_unknown_scenario_is_not_found() {
        let mut manager = ScenarioManager::default();
        assert!(matches!(
            manager.delete_scenario(ScenarioOrdinal(9)),
            Err(ScenarioError::ScenarioNotFound(ScenarioOrdinal(9)))
        ));
    }

    #[test]
    fn serialize_follows_creation_order_minus_deletions() {
        let mut manager = ScenarioManager::default();
        for _ in 0..3 {
            manager.create_scenario().unwrap();
        }
        manager.rename_scenario(ScenarioOrdinal(3), "green").unwrap();
        manager.delete_scenario(ScenarioOrdinal(1)).unwrap();

        let document = manager.serialize();
        let names: Vec<(u32, &str)> = document
            .iter()
            .map(|t| (t.scenario_count.get(), t.scenario_name.as_str()))
            .collect();
        assert_eq!(names, vec![(2, ""), (3, "green")]);
    }

    #[test]
    fn deleted_intervention_handle_is_invalid_state() {
        let mut manager = ScenarioManager::default();
        let ordinal = manager.create_scenario().map(Timeline::ordinal).unwrap();
        let handle = manager
            .add_intervention(ordinal, 350.0, InterventionKind::Tax)
            .unwrap();

        assert!(manager.delete_intervention(handle).is_ok());
        assert!(matches!(
            manager.delete_intervention(handle),
            Err(ScenarioError::InvalidState(_))
        ));
        assert!(matches!(
            manager.intervention_mut(handle),
            Err(ScenarioError::InvalidState(_))
        ));
        assert!(manager.timeline(ordinal).unwrap().is_empty());
    }

    #[test]
    fn scenario_deletion_retires_its_interventions() {
        let mut manager = ScenarioManager::default();
        let ordinal = manager.create_scenario().map(Timeline::ordinal).unwrap();
        let handle = manager
            .add_intervention(ordinal, 70.0, InterventionKind::Subsidy)
            .unwrap();

        let removed = manager.delete_scenario(ordinal).unwrap();
        assert_eq!(removed.len(), 1);
        assert!(manager.is_retired(handle));
        assert!(matches!(
            manager.intervention(handle),
            Err(ScenarioError::InvalidState(_))
        ));
    }

    #[test]
    fn retired_interventions_are_dropped_with_their_scenario() {
        let mut manager = ScenarioManager::default();
        let kept = manager.create_scenario().map(Timeline::ordinal).unwrap();
        let doomed = manager.create_scenario().map(Timeline::ordinal).unwrap();
        let kept_handle = manager.add_intervention(kept, 70.0, InterventionKind::Tax).unwrap();
        manager.delete_intervention(kept_handle).unwrap();
        let handles: Vec<InterventionHandle> = (0..10)
            .map(|_| manager.add_intervention(doomed, 70.0, InterventionKind::Tax).unwrap())
            .collect();
        for handle in &handles {
            manager.delete_intervention(*handle).unwrap();
        }
        assert_eq!(manager.retired.len(), 11);

        manager.delete_scenario(doomed).unwrap();
        assert_eq!(manager.retired.len(), 1);
        assert!(handles.iter().all(|h| manager.is_retired(*h)));
        assert!(manager.is_retired(kept_handle));
    }

    #[test]
    fn restore_retires_every_previous_handle() {
        let mut manager = ScenarioManager::default();
        let first = manager.create_scenario().map(Timeline::ordinal).unwrap();
        let second = manager.create_scenario().map(Timeline::ordinal).unwrap();
        let reused = manager.add_intervention(first, 70.0, InterventionKind::Tax).unwrap();
        let dropped = manager.add_intervention(second, 70.0, InterventionKind::Tax).unwrap();

        let document = ScenarioDocument(vec![SerializedTimeline {
            scenario_count: first,
            scenario_name: String::new(),
            interventions: vec![SerializedIntervention {
                year: 1,
                tax_value: dec!(0),
            }],
        }]);
        manager.restore(&document).unwrap();

        for stale in [reused, dropped] {
            assert!(matches!(
                manager.intervention(stale),
                Err(ScenarioError::InvalidState(_))
            ));
        }
        let fresh = manager.timeline(first).unwrap().interventions().first().map(Intervention::handle);
        assert!(manager.intervention(fresh.unwrap()).is_ok());
    }

    #[test]
    fn unknown_handle_is_not_found() {
        let mut manager = ScenarioManager::default();
        let ordinal = manager.create_scenario().map(Timeline::ordinal).unwrap();
        let handle = InterventionHandle {
            scenario: ordinal,
            intervention: InterventionId::new(),
        };
        assert!(manager.intervention(handle).is_err_and(|e| e.is_not_found()));
    }

    #[test]
    fn restore_keeps_ordinals_and_continues_numbering() {
        let document = ScenarioDocument(vec![
            SerializedTimeline {
                scenario_count: ScenarioOrdinal(2),
                scenario_name: String::from("a"),
                interventions: vec![SerializedIntervention {
                    year: 5,
                    tax_value: dec!(12),
                }],
            },
            SerializedTimeline {
                scenario_count: ScenarioOrdinal(7),
                scenario_name: String::from("b"),
                interventions: Vec::new(),
            },
        ]);

        let mut manager = ScenarioManager::default();
        manager.restore(&document).unwrap();

        assert_eq!(manager.serialize(), document);
        assert_eq!(manager.next_ordinal(), ScenarioOrdinal(8));
        let created = manager.create_scenario().map(Timeline::ordinal);
        assert_eq!(created, Ok(ScenarioOrdinal(8)));
    }

    #[test]
    fn restore_never_rewinds_ordinals() {
        let mut manager = ScenarioManager::default();
        for _ in 0..5 {
            manager.create_scenario().unwrap();
        }
        let document = ScenarioDocument(vec![SerializedTimeline {
            scenario_count: ScenarioOrdinal(1),
            scenario_name: String::new(),
            interventions: Vec::new(),
        }]);
        manager.restore(&document).unwrap();
        assert_eq!(manager.next_ordinal(), ScenarioOrdinal(6));
    }

    #[test]
    fn restore_rejects_duplicates_without_changes() {
        let mut manager = ScenarioManager::default();
        manager.create_scenario().unwrap();
        let before = manager.serialize();

        let timeline = SerializedTimeline {
            scenario_count: ScenarioOrdinal(3),
            scenario_name: String::new(),
            interventions: Vec::new(),
        };
        let document = ScenarioDocument(vec![timeline.clone(), timeline]);

        assert!(matches!(
            manager.restore(&document),
            Err(ScenarioError::InvalidArgument(_))
        ));
        assert_eq!(manager.serialize(), before);
    }

    #[test]
    fn restore_rejects_zero_ordinal() {
        let document = ScenarioDocument(vec![SerializedTimeline {
            scenario_count: ScenarioOrdinal(0),
            scenario_name: String::new(),
            interventions: Vec::new(),
        }]);
        let mut manager = ScenarioManager::default();
        assert!(matches!(
            manager.restore(&document),
            Err(ScenarioError::InvalidArgument(_))
        ));
    }
}
