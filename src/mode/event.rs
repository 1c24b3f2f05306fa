use super::{DrawMode, GeometryKind};

/// Toolbar requests that change the armed interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    Draw { kind: GeometryKind, freehand: bool },
    Edit,
    Delete,
}

impl ModeEvent {
    pub const fn target(self) -> DrawMode {
        match self {
            Self::Draw { kind, .. } => match kind {
                GeometryKind::Point => DrawMode::Point,
                GeometryKind::LineString => DrawMode::LineString,
                GeometryKind::Polygon => DrawMode::Polygon,
            },
            Self::Edit => DrawMode::Edit,
            Self::Delete => DrawMode::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: DrawMode,
    pub event: ModeEvent,
    pub to: DrawMode,
}

impl ModeTransition {
    pub const fn new(from: DrawMode, event: ModeEvent, to: DrawMode) -> Self {
        Self { from, event, to }
    }
}
