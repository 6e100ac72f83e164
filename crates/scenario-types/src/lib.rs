//! Shared type definitions for policy scenario timelines.
//!
//! This crate is the single source of truth for every type that crosses a
//! boundary: the serialized scenario document, the commands the UI sends,
//! the events the board emits, and the layout data the renderer consumes.
//! Types flow downstream to `TypeScript` via `ts-rs` for the browser client.
//!
//! # Modules
//!
//! - [`ids`] -- Intervention identifiers and scenario ordinals
//! - [`enums`] -- Intervention kinds and the cancel policy
//! - [`structs`] -- The serialized scenario document and intervention handles
//! - [`commands`] -- Board commands, dialogue form, and board events
//! - [`layout`] -- Rectangles for the rendering collaborator

pub mod commands;
pub mod enums;
pub mod ids;
pub mod layout;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use commands::{BoardCommand, BoardEvent, DialogueForm, FieldUpdate};
pub use enums::{CancelPolicy, InterventionKind, UnknownInterventionKind};
pub use ids::{InterventionId, ScenarioOrdinal};
pub use layout::{MarkerLayout, RenderSpec, TimelineLayout};
pub use structs::{InterventionHandle, ScenarioDocument, SerializedIntervention, SerializedTimeline};
