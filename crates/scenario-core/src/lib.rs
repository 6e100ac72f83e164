//! Scenario timelines, interventions, and the intervention editor.
//!
//! This crate owns every rule of the scenario board: how a click on a
//! timeline becomes a year, how interventions are placed, edited, and
//! removed, and how scenarios are created, deleted, and serialized.
//!
//! # Modules
//!
//! - [`mapper`] -- Pixel offset to year conversion.
//! - [`intervention`] -- A dated policy action with a clamped magnitude.
//! - [`timeline`] -- One scenario and its interventions in placement order.
//! - [`manager`] -- Every scenario, ordinal allocation, and stale handles.
//! - [`editor`] -- The modal editor state machine.
//! - [`board`] -- [`ScenarioBoard`], the single command entry point.
//! - [`capability`] -- [`Renderable`] and [`Clickable`] plus board layout.
//! - [`config`] -- Configuration loading from `scenario-config.yaml`.
//! - [`error`] -- [`ScenarioError`].
//!
//! [`Renderable`]: capability::Renderable
//! [`Clickable`]: capability::Clickable

pub mod board;
pub mod capability;
pub mod config;
pub mod editor;
pub mod error;
pub mod intervention;
pub mod manager;
pub mod mapper;
pub mod timeline;

pub use board::ScenarioBoard;
pub use capability::{Clickable, Marker, Renderable};
pub use config::{ConfigError, StudioConfig};
pub use editor::{CancelOutcome, EditorSession, EditorState, InterventionEditor};
pub use error::ScenarioError;
pub use intervention::Intervention;
pub use manager::ScenarioManager;
pub use timeline::Timeline;
