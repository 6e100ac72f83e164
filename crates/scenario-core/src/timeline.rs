//! One scenario's timeline and the interventions placed on it.
//!
//! Interventions are kept in the order they were placed, not sorted by year.
//! Two clicks on the same year produce two separate entries. Removal takes
//! the entry out of the sequence entirely; the list never holds tombstones.

use scenario_types::{InterventionId, InterventionKind, ScenarioOrdinal, SerializedTimeline};

use crate::config::LayoutConfig;
use crate::error::ScenarioError;
use crate::intervention::Intervention;
use crate::mapper::year_from_pixel;

/// A scenario timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    ordinal: ScenarioOrdinal,
    name: String,
    span: u32,
    layout: LayoutConfig,
    interventions: Vec<Intervention>,
}

impl Timeline {
    /// Create an empty timeline.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidArgument`] if `ordinal` is zero or
    /// `span` is zero.
    pub fn new(
        ordinal: ScenarioOrdinal,
        span: u32,
        layout: LayoutConfig,
    ) -> Result<Self, ScenarioError> {
        if ordinal.get() == 0 {
            return Err(ScenarioError::InvalidArgument(String::from(
                "scenario ordinals start at 1",
            )));
        }
        if span == 0 {
            return Err(ScenarioError::InvalidArgument(String::from(
                "timeline span must be at least one year",
            )));
        }
        Ok(Self {
            ordinal,
            name: String::new(),
            span,
            layout,
            interventions: Vec::new(),
        })
    }

    /// Rebuild a timeline from its serialized form.
    ///
    /// Restored interventions take `kind` because the document does not
    /// record kinds. Serializing the result yields `serialized` again for
    /// any document whose values were already in range.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidArgument`] under the same conditions
    /// as [`Timeline::new`].
    pub fn from_serialized(
        serialized: &SerializedTimeline,
        span: u32,
        kind: InterventionKind,
        layout: LayoutConfig,
    ) -> Result<Self, ScenarioError> {
        let mut timeline = Self::new(serialized.scenario_count, span, layout)?;
        timeline.name.clone_from(&serialized.scenario_name);
        timeline.interventions = serialized
            .interventions
            .iter()
            .map(|i| Intervention::from_serialized(i, kind, serialized.scenario_count, span))
            .collect();
        Ok(timeline)
    }

    /// Ordinal of this scenario.
    pub const fn ordinal(&self) -> ScenarioOrdinal {
        self.ordinal
    }

    /// Display name, empty by default.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of years the timeline covers.
    pub const fn span(&self) -> u32 {
        self.span
    }

    /// Pixel geometry this timeline was created with.
    pub const fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Vertical position of the timeline bar in viewport pixels.
    ///
    /// Strictly decreasing in the ordinal, so each new timeline stacks
    /// above the previous one without overlapping it.
    pub fn vertical_slot(&self) -> i64 {
        let stride = i64::from(self.layout.padding)
            .saturating_add(i64::from(self.layout.timeline_height));
        i64::from(self.layout.viewport_height)
            .saturating_sub(i64::from(self.ordinal.get()).saturating_mul(stride))
    }

    /// Interventions in placement order.
    pub fn interventions(&self) -> &[Intervention] {
        &self.interventions
    }

    /// Number of interventions on the timeline.
    pub const fn len(&self) -> usize {
        self.interventions.len()
    }

    /// Whether the timeline has no interventions.
    pub const fn is_empty(&self) -> bool {
        self.interventions.is_empty()
    }

    /// Look up an intervention by identity.
    pub fn intervention(&self, id: InterventionId) -> Option<&Intervention> {
        self.interventions.iter().find(|i| i.id() == id)
    }

    /// Look up an intervention by identity for mutation.
    pub fn intervention_mut(&mut self, id: InterventionId) -> Option<&mut Intervention> {
        self.interventions.iter_mut().find(|i| i.id() == id)
    }

    /// Place a new intervention at horizontal offset `x` (pixels from the
    /// left edge of the bar).
    ///
    /// The year comes from the coordinate mapper using this timeline's width
    /// and span. The new intervention starts with magnitude zero and is
    /// appended after every existing one.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidArgument`] if `x` is not finite.
    pub fn add_intervention(
        &mut self,
        x: f64,
        kind: InterventionKind,
    ) -> Result<&Intervention, ScenarioError> {
        let year = year_from_pixel(x, self.layout.width_pixels(), self.span)?;
        let intervention = Intervention::new(kind, year, self.ordinal, self.span);
        tracing::debug!(
            scenario = %self.ordinal,
            intervention = %intervention.id(),
            x,
            year,
            ?kind,
            "intervention placed"
        );
        self.interventions.push(intervention);

        self.interventions.last().ok_or_else(|| {
            ScenarioError::InvalidState(String::from("intervention missing after append"))
        })
    }

    /// Remove an intervention by identity and return it.
    ///
    /// Siblings keep their relative order and values. Callers outside the
    /// crate delete through [`ScenarioManager::delete_intervention`], which
    /// also retires the handle.
    ///
    /// [`ScenarioManager::delete_intervention`]: crate::manager::ScenarioManager::delete_intervention
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InterventionNotFound`] if no intervention
    /// with that identity is on this timeline.
    pub(crate) fn remove_intervention(
        &mut self,
        id: InterventionId,
    ) -> Result<Intervention, ScenarioError> {
        let position = self
            .interventions
            .iter()
            .position(|i| i.id() == id)
            .ok_or(ScenarioError::InterventionNotFound {
                scenario: self.ordinal,
                intervention: id,
            })?;
        let removed = self.interventions.remove(position);
        tracing::debug!(scenario = %self.ordinal, intervention = %id, "intervention removed");
        Ok(removed)
    }

    /// Set the display name.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Serialize to the wire form, interventions in placement order.
    pub fn serialize(&self) -> SerializedTimeline {
        SerializedTimeline {
            scenario_count: self.ordinal,
            scenario_name: self.name.clone(),
            interventions: self.interventions.iter().map(Intervention::serialize).collect(),
        }
    }

    /// Identities of every intervention, in placement order.
    pub(crate) fn intervention_ids(&self) -> impl Iterator<Item = InterventionId> + '_ {
        self.interventions.iter().map(Intervention::id)
    }
}
