//! The scenario board: manager and editor behind one command entry point.
//!
//! Every UI gesture arrives as a [`BoardCommand`] and leaves as exactly one
//! [`BoardEvent`]. The board is the only place that touches both the
//! [`ScenarioManager`] and the [`InterventionEditor`], so cross-cutting
//! rules (deleting the scenario under an open editor) live here.

use scenario_types::{
    BoardCommand, BoardEvent, DialogueForm, ScenarioDocument, ScenarioOrdinal, TimelineLayout,
};

use crate::capability::{board_layout, Clickable};
use crate::config::StudioConfig;
use crate::editor::InterventionEditor;
use crate::error::ScenarioError;
use crate::manager::ScenarioManager;
use crate::timeline::Timeline;

/// Scenario manager plus the modal editor.
#[derive(Debug, Clone, Default)]
pub struct ScenarioBoard {
    manager: ScenarioManager,
    editor: InterventionEditor,
}

impl ScenarioBoard {
    /// Create an empty board from the loaded configuration.
    pub const fn from_config(config: &StudioConfig) -> Self {
        Self {
            manager: ScenarioManager::from_config(config),
            editor: InterventionEditor::from_config(config),
        }
    }

    /// The scenario manager.
    pub const fn manager(&self) -> &ScenarioManager {
        &self.manager
    }

    /// The intervention editor.
    pub const fn editor(&self) -> &InterventionEditor {
        &self.editor
    }

    /// Apply one command.
    ///
    /// # Errors
    ///
    /// Returns whatever the manager or editor rejected the command with.
    /// A failed command leaves the board unchanged.
    pub fn apply(&mut self, command: BoardCommand) -> Result<BoardEvent, ScenarioError> {
        let result = self.dispatch(command);
        match &result {
            Ok(event) => tracing::debug!(?event, "board command applied"),
            Err(err) if err.is_user_facing() => {
                tracing::info!(error = %err, "board command rejected");
            }
            Err(err) => tracing::warn!(error = %err, "board command failed"),
        }
        result
    }

    fn dispatch(&mut self, command: BoardCommand) -> Result<BoardEvent, ScenarioError> {
        match command {
            BoardCommand::CreateScenario => {
                let scenario = self.manager.create_scenario().map(Timeline::ordinal)?;
                Ok(BoardEvent::ScenarioCreated { scenario })
            }
            BoardCommand::DeleteScenario { scenario } => self.delete_scenario(scenario),
            BoardCommand::RenameScenario { scenario, name } => {
                self.manager.rename_scenario(scenario, name.clone())?;
                Ok(BoardEvent::ScenarioRenamed { scenario, name })
            }
            BoardCommand::OpenNew { scenario, x } => {
                self.editor.open_for_new(&mut self.manager, scenario, x)?;
                Ok(BoardEvent::EditorOpened {
                    form: self.current_form()?,
                })
            }
            BoardCommand::Click { x, y } => {
                let resolved = self.resolve_click(x, y)?;
                self.dispatch(resolved)
            }
            BoardCommand::OpenExisting { target } => {
                self.editor.open_for_edit(&self.manager, target)?;
                Ok(BoardEvent::EditorOpened {
                    form: self.current_form()?,
                })
            }
            BoardCommand::UpdateField { update } => {
                self.editor.update_field(update)?;
                Ok(BoardEvent::FieldUpdated {
                    form: self.current_form()?,
                })
            }
            BoardCommand::Commit => {
                let (target, intervention) = self.editor.commit(&mut self.manager)?;
                Ok(BoardEvent::InterventionCommitted {
                    target,
                    intervention,
                })
            }
            BoardCommand::Cancel => {
                let outcome = self.editor.cancel(&mut self.manager)?;
                Ok(BoardEvent::EditorCancelled {
                    target: outcome.target,
                    rolled_back: outcome.rolled_back,
                })
            }
            BoardCommand::Delete => {
                let target = self.editor.delete_target(&mut self.manager)?;
                Ok(BoardEvent::InterventionDeleted { target })
            }
        }
    }

    /// The command a viewport click stands for, checking timelines in
    /// board order.
    fn resolve_click(&self, x: f64, y: f64) -> Result<BoardCommand, ScenarioError> {
        for timeline in self.manager.timelines() {
            if let Some(command) = timeline.click(x, y)? {
                tracing::debug!(x, y, ?command, "click resolved");
                return Ok(command);
            }
        }
        Err(ScenarioError::InvalidArgument(format!(
            "no timeline or marker at ({x}, {y})"
        )))
    }

    fn delete_scenario(&mut self, scenario: ScenarioOrdinal) -> Result<BoardEvent, ScenarioError> {
        let removed = self.manager.delete_scenario(scenario)?;
        let discarded = self
            .editor
            .session()
            .is_some_and(|session| session.target().scenario == scenario)
            .then(|| self.editor.force_close())
            .flatten();
        if let Some(session) = discarded {
            tracing::warn!(
                %scenario,
                target_intervention = %session.target().intervention,
                "scenario deleted under open editor, session discarded"
            );
        }
        Ok(BoardEvent::ScenarioDeleted {
            scenario,
            interventions_removed: removed.len(),
        })
    }

    /// Replace every scenario with a stored document.
    ///
    /// Any open editor session is discarded, since its target no longer
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidArgument`] if the document is
    /// rejected; the board is unchanged in that case.
    pub fn restore(&mut self, document: &ScenarioDocument) -> Result<BoardEvent, ScenarioError> {
        self.manager.restore(document)?;
        if let Some(session) = self.editor.force_close() {
            tracing::warn!(
                target_intervention = %session.target().intervention,
                "document restored under open editor, session discarded"
            );
        }
        Ok(BoardEvent::DocumentRestored {
            document: self.manager.serialize(),
        })
    }

    /// Serialize every scenario.
    pub fn serialize(&self) -> ScenarioDocument {
        self.manager.serialize()
    }

    /// The dialogue form of the open session, if any.
    pub fn form(&self) -> Option<DialogueForm> {
        self.editor.form()
    }

    /// Render layout of every scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidArgument`] if the configured geometry
    /// is degenerate.
    pub fn layout(&self) -> Result<Vec<TimelineLayout>, ScenarioError> {
        board_layout(&self.manager)
    }

    fn current_form(&self) -> Result<DialogueForm, ScenarioError> {
        self.editor
            .form()
            .ok_or_else(|| ScenarioError::InvalidState(String::from("editor is closed")))
    }
}
