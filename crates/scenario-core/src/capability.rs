//! Rendering and pointer capabilities of scenario entities.
//!
//! The visual layer draws whatever implements [`Renderable`] and routes
//! pointer clicks to whatever implements [`Clickable`]. Timelines and
//! [`Marker`]s implement both. A click on a timeline resolves to the
//! [`BoardCommand`] it stands for: `OpenExisting` when it lands on a
//! marker, `OpenNew` with a bar-local x when it lands on the bare bar.

use scenario_types::{BoardCommand, InterventionHandle, MarkerLayout, RenderSpec, TimelineLayout};

use crate::error::ScenarioError;
use crate::intervention::Intervention;
use crate::manager::ScenarioManager;
use crate::mapper::pixel_from_year;
use crate::timeline::Timeline;

/// Something the rendering collaborator can place on screen.
pub trait Renderable {
    /// The rectangle this entity occupies, in viewport pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidArgument`] if the entity's geometry
    /// is degenerate.
    fn render(&self) -> Result<RenderSpec, ScenarioError>;
}

/// Something that reacts to a pointer click.
pub trait Clickable {
    /// What a click resolves to.
    type Target;

    /// The clickable area, in viewport pixels.
    ///
    /// # Errors
    ///
    /// Same as [`Renderable::render`].
    fn bounds(&self) -> Result<RenderSpec, ScenarioError>;

    /// Whether viewport point `(x, y)` lies within [`Clickable::bounds`].
    ///
    /// # Errors
    ///
    /// Same as [`Renderable::render`].
    fn hit(&self, x: f64, y: f64) -> Result<bool, ScenarioError> {
        Ok(self.bounds()?.contains(x, y))
    }

    /// Resolve a click at viewport point `(x, y)`; `None` when it misses.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidArgument`] if the point is not
    /// finite or the geometry is degenerate.
    fn click(&self, x: f64, y: f64) -> Result<Option<Self::Target>, ScenarioError>;
}

fn finite_point(x: f64, y: f64) -> Result<(), ScenarioError> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(ScenarioError::InvalidArgument(format!(
            "click position must be finite, got ({x}, {y})"
        )))
    }
}

impl Renderable for Timeline {
    fn render(&self) -> Result<RenderSpec, ScenarioError> {
        let layout = self.layout();
        // Viewport coordinates stay far below 2^53, so the i64 slot is exact.
        #[allow(clippy::cast_precision_loss)]
        let y = self.vertical_slot() as f64;
        Ok(RenderSpec {
            x: f64::from(layout.origin_x),
            y,
            width: layout.width_pixels(),
            height: f64::from(layout.timeline_height),
        })
    }
}

impl Clickable for Timeline {
    type Target = BoardCommand;

    fn bounds(&self) -> Result<RenderSpec, ScenarioError> {
        self.render()
    }

    fn click(&self, x: f64, y: f64) -> Result<Option<BoardCommand>, ScenarioError> {
        finite_point(x, y)?;
        // Later markers are drawn on top.
        for intervention in self.interventions().iter().rev() {
            if let Some(target) = Marker::new(self, intervention).click(x, y)? {
                return Ok(Some(BoardCommand::OpenExisting { target }));
            }
        }
        let bar = self.bounds()?;
        Ok(bar.contains(x, y).then_some(BoardCommand::OpenNew {
            scenario: self.ordinal(),
            x: x - bar.x,
        }))
    }
}

/// An intervention marker as drawn on its timeline.
///
/// The marker is centered on the left edge of its year, matching where the
/// click that placed it landed.
#[derive(Debug, Clone, Copy)]
pub struct Marker<'a> {
    timeline: &'a Timeline,
    intervention: &'a Intervention,
}

impl<'a> Marker<'a> {
    /// Pair an intervention with the timeline that owns it.
    pub const fn new(timeline: &'a Timeline, intervention: &'a Intervention) -> Self {
        Self {
            timeline,
            intervention,
        }
    }
}

impl Renderable for Marker<'_> {
    fn render(&self) -> Result<RenderSpec, ScenarioError> {
        let bar = self.timeline.render()?;
        let layout = self.timeline.layout();
        let offset = pixel_from_year(
            self.intervention.year(),
            layout.width_pixels(),
            self.timeline.span(),
        )?;
        let marker_width = f64::from(layout.marker_width);
        Ok(RenderSpec {
            x: bar.x + offset - marker_width / 2.0,
            y: bar.y,
            width: marker_width,
            height: bar.height,
        })
    }
}

impl Clickable for Marker<'_> {
    type Target = InterventionHandle;

    fn bounds(&self) -> Result<RenderSpec, ScenarioError> {
        self.render()
    }

    fn click(&self, x: f64, y: f64) -> Result<Option<InterventionHandle>, ScenarioError> {
        finite_point(x, y)?;
        Ok(self.hit(x, y)?.then_some(self.intervention.handle()))
    }
}

/// Layout of one timeline bar and all of its markers.
///
/// # Errors
///
/// Returns [`ScenarioError::InvalidArgument`] if the timeline geometry is
/// degenerate.
pub fn timeline_layout(timeline: &Timeline) -> Result<TimelineLayout, ScenarioError> {
    let markers = timeline
        .interventions()
        .iter()
        .map(|intervention| {
            Ok(MarkerLayout {
                intervention: intervention.id(),
                year: intervention.year(),
                rect: Marker::new(timeline, intervention).render()?,
            })
        })
        .collect::<Result<Vec<_>, ScenarioError>>()?;
    Ok(TimelineLayout {
        scenario: timeline.ordinal(),
        bar: timeline.render()?,
        markers,
    })
}

/// Layout of every scenario, in timeline order.
///
/// # Errors
///
/// Returns [`ScenarioError::InvalidArgument`] if any timeline geometry is
/// degenerate.
pub fn board_layout(manager: &ScenarioManager) -> Result<Vec<TimelineLayout>, ScenarioError> {
    manager.timelines().iter().map(timeline_layout).collect()
}
