//! The draggable azimuth arrow.
//!
//! A headless state machine: the map front end feeds it pointer events and
//! input changes, and applies the returned commands in order. Keeping the
//! transitions explicit guarantees that gesture suspension and click
//! suppression are always paired with their release.

use std::time::Duration;

use crate::{
    core::{
        azimuth::{Azimuth, Bearing},
        geo::GeoPoint,
    },
    prelude::*,
};

pub const SHAFT_LENGTH_METERS: f64 = 110.0;
pub const HEAD_LENGTH_METERS: f64 = 35.0;
pub const HEAD_WING_DEGREES: f64 = 150.0;

/// Pause before re-enabling map gestures, so the release is not read as a
/// pan or a double click.
pub const GESTURE_RESUME_DELAY: Duration = Duration::from_millis(50);

/// Shaft and two-wing head of the rendered arrow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowGeometry {
    pub origin: GeoPoint,
    pub tip: GeoPoint,
    pub left_wing: GeoPoint,
    pub right_wing: GeoPoint,
}

impl ArrowGeometry {
    #[must_use]
    pub fn new(site: GeoPoint, azimuth: Azimuth) -> Self {
        let bearing = azimuth.to_bearing();
        let tip = site.destination(bearing, SHAFT_LENGTH_METERS);
        let left_wing =
            tip.destination(Bearing(bearing.0 + HEAD_WING_DEGREES).normalized(), HEAD_LENGTH_METERS);
        let right_wing =
            tip.destination(Bearing(bearing.0 - HEAD_WING_DEGREES).normalized(), HEAD_LENGTH_METERS);
        Self { origin: site, tip, left_wing, right_wing }
    }

    #[must_use]
    pub const fn shaft(&self) -> [GeoPoint; 2] {
        [self.origin, self.tip]
    }

    #[must_use]
    pub const fn head(&self) -> [GeoPoint; 3] {
        [self.left_wing, self.tip, self.right_wing]
    }
}

/// Instruction for the map front end, to be applied in order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MapCommand {
    /// Disable panning, double-click zoom, and box zoom.
    SuspendGestures,
    /// Re-enable the suspended gestures after the delay.
    ResumeGesturesAfter(Duration),
    /// Write the azimuth into the input field.
    SetAzimuth(Azimuth),
    RedrawArrow(ArrowGeometry),
    /// Move the drag handle to the recomputed tip.
    SnapHandle(GeoPoint),
    /// Remove the arrow and its handle; they are recreated lazily on the
    /// next valid input.
    RemoveArrow,
}

/// What a map click should do after the controller has seen it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClickAction {
    /// The click is the tail of a drag release; ignore it.
    Suppress,
    /// A genuine click: place or move the site marker.
    PlaceMarker,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        anchor: GeoPoint,
        azimuth: Option<Azimuth>,
    },
}

#[derive(Debug, Default)]
pub struct ArrowController {
    state: DragState,
    suppress_next_click: bool,
}

impl ArrowController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Press on the drag handle. `anchor` is the site marker's location,
    /// the fixed origin of the arrow.
    pub fn pointer_down(&mut self, anchor: GeoPoint) -> Vec<MapCommand> {
        if !anchor.is_finite() {
            return self.reset();
        }
        self.state = DragState::Dragging { anchor, azimuth: None };
        self.suppress_next_click = true;
        vec![MapCommand::SuspendGestures]
    }

    pub fn pointer_move(&mut self, pointer: GeoPoint) -> Vec<MapCommand> {
        let DragState::Dragging { anchor, .. } = self.state else {
            return Vec::new();
        };
        if !pointer.is_finite() {
            return self.reset();
        }
        if pointer == anchor {
            // Back on the origin marker: the bearing is degenerate.
            return Vec::new();
        }
        let azimuth = anchor.bearing_to(pointer).to_azimuth();
        self.state = DragState::Dragging { anchor, azimuth: Some(azimuth) };
        vec![
            MapCommand::SetAzimuth(azimuth),
            MapCommand::RedrawArrow(ArrowGeometry::new(anchor, azimuth)),
        ]
    }

    /// Release: snap the handle back onto the recomputed tip so intermediate
    /// pointer positions leave no drift, then resume gestures.
    pub fn pointer_up(&mut self) -> Vec<MapCommand> {
        let DragState::Dragging { anchor, azimuth } = self.state else {
            return Vec::new();
        };
        self.state = DragState::Idle;
        let mut commands = Vec::new();
        if let Some(azimuth) = azimuth {
            let geometry = ArrowGeometry::new(anchor, azimuth);
            commands.push(MapCommand::SnapHandle(geometry.tip));
            commands.push(MapCommand::RedrawArrow(geometry));
        }
        commands.push(MapCommand::ResumeGesturesAfter(GESTURE_RESUME_DELAY));
        commands
    }

    /// The map fired a click; exactly one click after a drag is swallowed.
    pub fn map_click(&mut self) -> ClickAction {
        if std::mem::take(&mut self.suppress_next_click) {
            ClickAction::Suppress
        } else {
            ClickAction::PlaceMarker
        }
    }

    /// Mirror of the coordinate/azimuth inputs: redraw the arrow, or remove
    /// it when the inputs no longer describe a drawable one.
    pub fn update_inputs(&mut self, site: Option<GeoPoint>, azimuth: Azimuth) -> Vec<MapCommand> {
        match site {
            Some(site) if site.is_finite() && azimuth.is_finite() => {
                vec![MapCommand::RedrawArrow(ArrowGeometry::new(site, azimuth))]
            }
            _ => self.reset(),
        }
    }

    fn reset(&mut self) -> Vec<MapCommand> {
        if self.is_dragging() {
            warn!("resetting an active drag");
        }
        self.state = DragState::Idle;
        vec![MapCommand::RemoveArrow]
    }
}
