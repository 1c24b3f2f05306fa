//! Pointer interactions that can be armed on the map.
//!
//! Exactly one [`ActiveInteraction`] is attached at a time. Replacing it detaches the
//! previous family as a whole, so no stale draw, edit or select handler survives a mode
//! switch.

mod draw;
mod modify;
mod select;
mod snap;

pub use draw::{Draw, DrawOptions, DEFAULT_FINISH_TOLERANCE_PX};
pub use modify::{Modify, DEFAULT_MODIFY_TOLERANCE_PX};
pub use select::{Select, DEFAULT_HIT_TOLERANCE_PX};
pub use snap::{Snap, DEFAULT_SNAP_TOLERANCE_PX};

use crate::feature::FeatureId;
use crate::geometry::{Extent, MapPoint, ScreenPoint};
use crate::map::VectorSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Drag,
    Move,
    Up,
    Click,
    DoubleClick,
}

/// Raw pointer input in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: ScreenPoint,
}

impl PointerEvent {
    pub const fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: ScreenPoint::new(x, y),
        }
    }
}

/// Pointer input resolved against the view: map coordinate plus the scale needed to turn
/// pixel tolerances into map units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPointerEvent {
    pub kind: PointerKind,
    pub coordinate: MapPoint,
    pub resolution: f64,
    pub extent: Extent,
}

impl MapPointerEvent {
    pub fn tolerance(&self, pixels: f64) -> f64 {
        pixels * self.resolution
    }

    const fn with_coordinate(self, coordinate: MapPoint) -> Self {
        Self { coordinate, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    None,
    DrawEnd(FeatureId),
    DrawAborted,
    ModifyEnd(FeatureId),
    /// Hits ordered top-most first. Empty when the click missed every feature.
    Selected(Vec<FeatureId>),
}

/// A single attached interaction instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Draw,
    Snap,
    Modify,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionFamily {
    None,
    Draw,
    EditPair,
    Select,
}

#[derive(Debug, Clone, Default)]
pub enum ActiveInteraction {
    #[default]
    None,
    Draw(Draw),
    Edit {
        snap: Snap,
        modify: Modify,
    },
    Select(Select),
}

impl ActiveInteraction {
    pub const fn family(&self) -> InteractionFamily {
        match self {
            Self::None => InteractionFamily::None,
            Self::Draw(_) => InteractionFamily::Draw,
            Self::Edit { .. } => InteractionFamily::EditPair,
            Self::Select(_) => InteractionFamily::Select,
        }
    }

    /// The interaction instances this family keeps attached, in registration order.
    pub const fn kinds(&self) -> &'static [InteractionKind] {
        match self {
            Self::None => &[],
            Self::Draw(_) => &[InteractionKind::Draw],
            Self::Edit { .. } => &[InteractionKind::Snap, InteractionKind::Modify],
            Self::Select(_) => &[InteractionKind::Select],
        }
    }

    pub fn as_draw(&self) -> Option<&Draw> {
        match self {
            Self::Draw(draw) => Some(draw),
            _ => None,
        }
    }

    pub fn as_draw_mut(&mut self) -> Option<&mut Draw> {
        match self {
            Self::Draw(draw) => Some(draw),
            _ => None,
        }
    }

    pub fn as_select_mut(&mut self) -> Option<&mut Select> {
        match self {
            Self::Select(select) => Some(select),
            _ => None,
        }
    }

    pub(crate) fn attach(&self) {
        tracing::debug!(family = ?self.family(), kinds = ?self.kinds(), "attach interaction");
    }

    /// Drops any in-progress gesture. Detaching `None` does nothing.
    pub(crate) fn detach(&mut self) {
        match self {
            Self::None => return,
            Self::Draw(draw) => draw.abort_drawing(),
            Self::Edit { modify, .. } => modify.release(),
            Self::Select(select) => select.clear(),
        }
        tracing::debug!(family = ?self.family(), kinds = ?self.kinds(), "detach interaction");
    }

    pub fn handle(
        &mut self,
        event: MapPointerEvent,
        source: &mut VectorSource,
    ) -> InteractionOutcome {
        match self {
            Self::None => InteractionOutcome::None,
            Self::Draw(draw) => draw.handle(event, source),
            Self::Edit { snap, modify } => {
                let event = match event.kind {
                    PointerKind::Drag => event.with_coordinate(snap.snap(
                        event,
                        source,
                        modify.grabbed_feature(),
                    )),
                    _ => event,
                };
                modify.handle(event, source)
            }
            Self::Select(select) => select.handle(event, source),
        }
    }
}
