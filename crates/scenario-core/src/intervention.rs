//! A single dated policy action on a scenario timeline.
//!
//! An [`Intervention`] is owned by exactly one [`Timeline`](crate::Timeline)
//! and records that timeline's ordinal and span as a non-owning
//! back-reference. The span is fixed for the life of the timeline, so the
//! intervention can keep its year clamped without reaching back into its
//! owner.

use rust_decimal::Decimal;

use scenario_types::{
    InterventionHandle, InterventionId, InterventionKind, ScenarioOrdinal, SerializedIntervention,
};

use crate::mapper::clamp_year;

/// A dated policy action with a magnitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intervention {
    id: InterventionId,
    kind: InterventionKind,
    year: u32,
    magnitude: Decimal,
    timeline: ScenarioOrdinal,
    span: u32,
}

impl Intervention {
    /// Create an intervention on the timeline `timeline` covering `span`
    /// years.
    ///
    /// The year is clamped into `[0, span]` and the magnitude starts at zero.
    pub fn new(kind: InterventionKind, year: u32, timeline: ScenarioOrdinal, span: u32) -> Self {
        Self {
            id: InterventionId::new(),
            kind,
            year: clamp_year(year, span),
            magnitude: Decimal::ZERO,
            timeline,
            span,
        }
    }

    /// Rebuild an intervention from its serialized form.
    ///
    /// The document format does not record the kind, so restored
    /// interventions take the supplied `kind`. Year and magnitude go through
    /// the same clamping as live edits.
    pub fn from_serialized(
        serialized: &SerializedIntervention,
        kind: InterventionKind,
        timeline: ScenarioOrdinal,
        span: u32,
    ) -> Self {
        let mut intervention = Self::new(kind, serialized.year, timeline, span);
        intervention.set_magnitude(serialized.tax_value);
        intervention
    }

    /// Identity of this intervention.
    pub const fn id(&self) -> InterventionId {
        self.id
    }

    /// The kind of policy action.
    pub const fn kind(&self) -> InterventionKind {
        self.kind
    }

    /// Year offset from the start of the owning timeline.
    pub const fn year(&self) -> u32 {
        self.year
    }

    /// Current magnitude.
    pub const fn magnitude(&self) -> Decimal {
        self.magnitude
    }

    /// Ordinal of the owning timeline.
    pub const fn timeline(&self) -> ScenarioOrdinal {
        self.timeline
    }

    /// Span of the owning timeline, the largest valid year.
    pub const fn span(&self) -> u32 {
        self.span
    }

    /// Handle addressing this intervention through the scenario manager.
    pub const fn handle(&self) -> InterventionHandle {
        InterventionHandle {
            scenario: self.timeline,
            intervention: self.id,
        }
    }

    /// Change the kind of policy action.
    ///
    /// The current magnitude is re-clamped to the new kind's bounds.
    pub fn set_kind(&mut self, kind: InterventionKind) {
        self.kind = kind;
        self.magnitude = clamp_magnitude(kind, self.magnitude);
    }

    /// Set the magnitude, clamping it into `[0, ceiling]` for this kind.
    ///
    /// Out-of-range values are clamped rather than rejected so slider
    /// rounding never loses an edit. Returns the stored value.
    pub fn set_magnitude(&mut self, value: Decimal) -> Decimal {
        self.magnitude = clamp_magnitude(self.kind, value);
        self.magnitude
    }

    /// Set the year, clamping it into the owning timeline's span. Returns
    /// the stored value.
    pub fn set_year(&mut self, value: u32) -> u32 {
        self.year = clamp_year(value, self.span);
        self.year
    }

    /// Serialize to the wire form.
    pub const fn serialize(&self) -> SerializedIntervention {
        SerializedIntervention {
            year: self.year,
            tax_value: self.magnitude,
        }
    }
}

/// Clamp a magnitude into the bounds of `kind`.
pub fn clamp_magnitude(kind: InterventionKind, value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, kind.magnitude_ceiling())
}
