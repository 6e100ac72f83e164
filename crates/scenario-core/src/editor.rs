//! The modal intervention editor.
//!
//! The editor is a two-state machine:
//!
//! ```text
//!            open_for_new / open_for_edit
//!   Closed ------------------------------> Open(session)
//!     ^                                      |   ^
//!     |   commit / cancel / delete_target    |   | update_field
//!     +--------------------------------------+   +---
//! ```
//!
//! While open, dialogue edits only touch the [`EditorSession`]'s pending
//! values. Nothing reaches the intervention until [`commit`], which refuses
//! to run without a selected kind and leaves the editor open when it does.
//! At most one session exists at a time; opening a second one is rejected
//! with [`ScenarioError::InvalidState`] rather than silently replacing the
//! first.
//!
//! [`commit`]: InterventionEditor::commit

use rust_decimal::Decimal;

use scenario_types::{
    CancelPolicy, DialogueForm, FieldUpdate, InterventionHandle, InterventionKind,
    ScenarioOrdinal, SerializedIntervention,
};

use crate::config::{EditorConfig, ScenarioConfig, StudioConfig};
use crate::error::ScenarioError;
use crate::intervention::Intervention;
use crate::manager::ScenarioManager;
use crate::mapper::clamp_year;

/// Transient state of one open edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    target: InterventionHandle,
    is_new: bool,
    pending_kind: Option<InterventionKind>,
    pending_year: u32,
    pending_magnitude: Decimal,
}

impl EditorSession {
    const fn from_intervention(intervention: &Intervention, is_new: bool) -> Self {
        Self {
            target: intervention.handle(),
            is_new,
            pending_kind: Some(intervention.kind()),
            pending_year: intervention.year(),
            pending_magnitude: intervention.magnitude(),
        }
    }

    /// The intervention being edited.
    pub const fn target(&self) -> InterventionHandle {
        self.target
    }

    /// Whether the target was placed by the click that opened this session.
    pub const fn is_new(&self) -> bool {
        self.is_new
    }

    /// Pending kind, `None` when the selector is empty.
    pub const fn pending_kind(&self) -> Option<InterventionKind> {
        self.pending_kind
    }

    /// Pending year.
    pub const fn pending_year(&self) -> u32 {
        self.pending_year
    }

    /// Pending magnitude, as last reported by the slider.
    pub const fn pending_magnitude(&self) -> Decimal {
        self.pending_magnitude
    }
}

/// Editor state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorState {
    /// No dialogue is shown.
    #[default]
    Closed,
    /// A dialogue is shown for one intervention.
    Open(EditorSession),
}

/// Result of closing the editor without saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelOutcome {
    /// The intervention that was being edited.
    pub target: InterventionHandle,
    /// Whether a never-saved new intervention was removed.
    pub rolled_back: bool,
}

/// The intervention editor state machine.
#[derive(Debug, Clone, Default)]
pub struct InterventionEditor {
    scenario: ScenarioConfig,
    config: EditorConfig,
    state: EditorState,
}

impl InterventionEditor {
    /// Create a closed editor.
    ///
    /// `scenario` bounds the year slider; `config` chooses the kind of newly
    /// placed interventions and what cancelling does to them.
    pub const fn new(scenario: ScenarioConfig, config: EditorConfig) -> Self {
        Self {
            scenario,
            config,
            state: EditorState::Closed,
        }
    }

    /// Create a closed editor from the loaded configuration.
    pub const fn from_config(config: &StudioConfig) -> Self {
        Self::new(config.scenario, config.editor)
    }

    /// Current state.
    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    /// Whether a session is open.
    pub const fn is_open(&self) -> bool {
        matches!(self.state, EditorState::Open(_))
    }

    /// The open session, if any.
    pub const fn session(&self) -> Option<&EditorSession> {
        match &self.state {
            EditorState::Open(session) => Some(session),
            EditorState::Closed => None,
        }
    }

    /// Place a new intervention on `scenario` at pixel offset `x` and open
    /// the editor on it.
    ///
    /// The intervention joins the timeline immediately with the configured
    /// default kind and magnitude zero.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidState`] if a session is already open
    /// (no intervention is placed in that case), or the manager's error if
    /// the scenario is unknown or `x` is not finite.
    pub fn open_for_new(
        &mut self,
        manager: &mut ScenarioManager,
        scenario: ScenarioOrdinal,
        x: f64,
    ) -> Result<&EditorSession, ScenarioError> {
        self.ensure_closed()?;
        let handle = manager.add_intervention(scenario, x, self.config.default_kind)?;
        let session = EditorSession::from_intervention(manager.intervention(handle)?, true);
        tracing::debug!(target_intervention = %handle.intervention, %scenario, "editor opened for new intervention");
        self.open(session)
    }

    /// Open the editor on an existing intervention.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidState`] if a session is already open
    /// or the intervention was deleted, or a not-found variant if the handle
    /// never existed.
    pub fn open_for_edit(
        &mut self,
        manager: &ScenarioManager,
        target: InterventionHandle,
    ) -> Result<&EditorSession, ScenarioError> {
        self.ensure_closed()?;
        let session = EditorSession::from_intervention(manager.intervention(target)?, false);
        tracing::debug!(target_intervention = %target.intervention, scenario = %target.scenario, "editor opened");
        self.open(session)
    }

    /// Record a dialogue edit in the pending values.
    ///
    /// The intervention itself is untouched. Years are held to the
    /// configured span, the range of the year slider.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidState`] if the editor is closed.
    pub fn update_field(&mut self, update: FieldUpdate) -> Result<&EditorSession, ScenarioError> {
        let span = self.scenario.span_years;
        let session = self.session_mut()?;
        match update {
            FieldUpdate::Kind { value } => session.pending_kind = value,
            FieldUpdate::Year { value } => session.pending_year = clamp_year(value, span),
            FieldUpdate::Magnitude { value } => session.pending_magnitude = value,
        }
        self.session_ref()
    }

    /// Close the editor without saving.
    ///
    /// Under [`CancelPolicy::Rollback`] a new intervention that was never
    /// saved is removed again; under [`CancelPolicy::Keep`] it stays on the
    /// timeline with its default values.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidState`] if the editor is closed.
    pub fn cancel(&mut self, manager: &mut ScenarioManager) -> Result<CancelOutcome, ScenarioError> {
        let session = self.take_session()?;
        let rollback = session.is_new && self.config.cancel_policy == CancelPolicy::Rollback;
        let rolled_back = if rollback {
            match manager.delete_intervention(session.target) {
                Ok(_) => true,
                Err(err) => {
                    // The target went away under the session; nothing left
                    // to roll back.
                    tracing::warn!(error = %err, "rollback of new intervention failed");
                    false
                }
            }
        } else {
            false
        };
        tracing::debug!(target_intervention = %session.target.intervention, rolled_back, "editor cancelled");
        Ok(CancelOutcome {
            target: session.target,
            rolled_back,
        })
    }

    /// Write the pending values to the intervention and close.
    ///
    /// Kind is applied first so the magnitude is clamped to the new kind's
    /// bounds, then year, then magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Validation`] ("product not selected") when
    /// no kind is selected, and [`ScenarioError::InvalidState`] if the editor
    /// is closed or the target was deleted. The editor stays open and the
    /// intervention unchanged on every error.
    pub fn commit(
        &mut self,
        manager: &mut ScenarioManager,
    ) -> Result<(InterventionHandle, SerializedIntervention), ScenarioError> {
        let session = self.session_ref()?;
        let Some(kind) = session.pending_kind else {
            return Err(ScenarioError::Validation(String::from(
                ScenarioError::PRODUCT_NOT_SELECTED,
            )));
        };
        let target = session.target;
        let (year, magnitude) = (session.pending_year, session.pending_magnitude);

        let intervention = manager.intervention_mut(target)?;
        intervention.set_kind(kind);
        intervention.set_year(year);
        intervention.set_magnitude(magnitude);
        let saved = intervention.serialize();

        self.state = EditorState::Closed;
        tracing::debug!(
            target_intervention = %target.intervention,
            scenario = %target.scenario,
            year = saved.year,
            magnitude = %saved.tax_value,
            "intervention committed"
        );
        Ok((target, saved))
    }

    /// Delete the intervention being edited and close.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidState`] if the editor is closed or
    /// the target was already deleted; the editor stays open in that case.
    pub fn delete_target(
        &mut self,
        manager: &mut ScenarioManager,
    ) -> Result<InterventionHandle, ScenarioError> {
        let target = self.session_ref()?.target;
        manager.delete_intervention(target)?;
        self.state = EditorState::Closed;
        tracing::debug!(target_intervention = %target.intervention, "intervention deleted from editor");
        Ok(target)
    }

    /// Close the editor unconditionally, returning the discarded session.
    ///
    /// Used when the target's scenario is deleted out from under the
    /// session.
    pub fn force_close(&mut self) -> Option<EditorSession> {
        match core::mem::take(&mut self.state) {
            EditorState::Open(session) => Some(session),
            EditorState::Closed => None,
        }
    }

    /// The form the dialogue collaborator should present, or `None` when
    /// closed.
    pub fn form(&self) -> Option<DialogueForm> {
        let session = self.session()?;
        let kind = session.pending_kind.unwrap_or(self.config.default_kind);
        Some(DialogueForm {
            target: session.target,
            is_new: session.is_new,
            kind: session.pending_kind,
            magnitude: session.pending_magnitude,
            magnitude_max: kind.magnitude_ceiling(),
            unit: kind.unit().to_owned(),
            year: session.pending_year,
            year_max: self.scenario.span_years,
        })
    }

    fn open(&mut self, session: EditorSession) -> Result<&EditorSession, ScenarioError> {
        self.state = EditorState::Open(session);
        self.session_ref()
    }

    fn ensure_closed(&self) -> Result<(), ScenarioError> {
        match &self.state {
            EditorState::Closed => Ok(()),
            EditorState::Open(session) => Err(ScenarioError::InvalidState(format!(
                "editor already open for intervention {}",
                session.target.intervention
            ))),
        }
    }

    fn session_ref(&self) -> Result<&EditorSession, ScenarioError> {
        self.session().ok_or_else(closed_error)
    }

    fn session_mut(&mut self) -> Result<&mut EditorSession, ScenarioError> {
        match &mut self.state {
            EditorState::Open(session) => Ok(session),
            EditorState::Closed => Err(closed_error()),
        }
    }

    fn take_session(&mut self) -> Result<EditorSession, ScenarioError> {
        self.force_close().ok_or_else(closed_error)
    }
}

fn closed_error() -> ScenarioError {
    ScenarioError::InvalidState(String::from("editor is closed"))
}
