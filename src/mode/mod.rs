//! Drawing-mode state: which interaction family is armed and who is told about it.

pub mod controller;
pub mod event;
pub mod machine;
pub mod publisher;

pub use crate::feature::GeometryKind;
pub use controller::{ModeController, ToleranceOptions};
pub use event::{ModeEvent, ModeTransition};
pub use machine::ModeMachine;
pub use publisher::{ModePublisher, ModeSubscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    Point,
    #[default]
    LineString,
    Polygon,
    Edit,
    Delete,
}

impl From<GeometryKind> for DrawMode {
    fn from(kind: GeometryKind) -> Self {
        match kind {
            GeometryKind::Point => Self::Point,
            GeometryKind::LineString => Self::LineString,
            GeometryKind::Polygon => Self::Polygon,
        }
    }
}

impl std::fmt::Display for DrawMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        };
        f.write_str(name)
    }
}
