use crate::feature::{FeatureId, VertexRef};
use crate::map::VectorSource;

use super::{InteractionOutcome, MapPointerEvent, PointerKind};

pub const DEFAULT_MODIFY_TOLERANCE_PX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Grab {
    feature: FeatureId,
    vertex: VertexRef,
    changed: bool,
}

/// Drags existing vertices. Pressing on an edge away from any vertex splits the edge and
/// drags the new vertex.
#[derive(Debug, Clone)]
pub struct Modify {
    tolerance_px: f64,
    grab: Option<Grab>,
}

impl Default for Modify {
    fn default() -> Self {
        Self::new(DEFAULT_MODIFY_TOLERANCE_PX)
    }
}

impl Modify {
    pub const fn new(tolerance_px: f64) -> Self {
        Self {
            tolerance_px,
            grab: None,
        }
    }

    pub fn grabbed_feature(&self) -> Option<FeatureId> {
        self.grab.map(|grab| grab.feature)
    }

    pub fn release(&mut self) {
        self.grab = None;
    }

    pub fn handle(
        &mut self,
        event: MapPointerEvent,
        source: &mut VectorSource,
    ) -> InteractionOutcome {
        match event.kind {
            PointerKind::Down => {
                self.grab = grab_at(event, self.tolerance_px, source);
                InteractionOutcome::None
            }
            PointerKind::Drag => {
                let Some(grab) = self.grab.as_mut() else {
                    return InteractionOutcome::None;
                };
                let position = event.extent.clamp(event.coordinate);
                let moved = source
                    .feature_mut(grab.feature)
                    .is_some_and(|feature| feature.geometry.set_vertex(grab.vertex, position));
                grab.changed |= moved;
                InteractionOutcome::None
            }
            PointerKind::Up => match self.grab.take() {
                Some(grab) if grab.changed => {
                    tracing::debug!(id = %grab.feature, "modify finished");
                    InteractionOutcome::ModifyEnd(grab.feature)
                }
                _ => InteractionOutcome::None,
            },
            _ => InteractionOutcome::None,
        }
    }
}

fn grab_at(event: MapPointerEvent, tolerance_px: f64, source: &mut VectorSource) -> Option<Grab> {
    let tolerance = event.tolerance(tolerance_px);
    let coordinate = event.coordinate;

    let vertex = source
        .features()
        .iter()
        .rev()
        .filter_map(|feature| {
            feature
                .geometry
                .nearest_vertex(coordinate)
                .map(|(vertex, _, distance)| (feature.id, vertex, distance))
        })
        .filter(|(_, _, distance)| *distance <= tolerance)
        .min_by(|a, b| a.2.total_cmp(&b.2));
    if let Some((feature, vertex, _)) = vertex {
        return Some(Grab {
            feature,
            vertex,
            changed: false,
        });
    }

    let (feature_id, segment, position) = source
        .features()
        .iter()
        .rev()
        .filter_map(|feature| {
            feature
                .geometry
                .nearest_segment_point(coordinate)
                .map(|(segment, position, distance)| (feature.id, segment, position, distance))
        })
        .filter(|(_, _, _, distance)| *distance <= tolerance)
        .min_by(|a, b| a.3.total_cmp(&b.3))
        .map(|(feature, segment, position, _)| (feature, segment, position))?;

    let vertex = source
        .feature_mut(feature_id)?
        .geometry
        .insert_vertex(segment, position)?;
    Some(Grab {
        feature: feature_id,
        vertex,
        changed: true,
    })
}
