use crate::feature::FeatureId;
use crate::geometry::MapPoint;
use crate::map::VectorSource;

use super::MapPointerEvent;

pub const DEFAULT_SNAP_TOLERANCE_PX: f64 = 10.0;

/// Pulls pointer coordinates onto nearby existing geometry. Vertices win over edges.
#[derive(Debug, Clone)]
pub struct Snap {
    tolerance_px: f64,
}

impl Default for Snap {
    fn default() -> Self {
        Self::new(DEFAULT_SNAP_TOLERANCE_PX)
    }
}

impl Snap {
    pub const fn new(tolerance_px: f64) -> Self {
        Self { tolerance_px }
    }

    pub const fn tolerance_px(&self) -> f64 {
        self.tolerance_px
    }

    /// Snapped coordinate for `event`, ignoring the feature currently being edited.
    pub fn snap(
        &self,
        event: MapPointerEvent,
        source: &VectorSource,
        exclude: Option<FeatureId>,
    ) -> MapPoint {
        let tolerance = event.tolerance(self.tolerance_px);
        let coordinate = event.coordinate;
        let candidates = source
            .features()
            .iter()
            .filter(|feature| Some(feature.id) != exclude);

        let vertex = candidates
            .clone()
            .filter_map(|feature| feature.geometry.nearest_vertex(coordinate))
            .filter(|(_, _, distance)| *distance <= tolerance)
            .min_by(|a, b| a.2.total_cmp(&b.2));
        if let Some((_, position, _)) = vertex {
            return position;
        }

        candidates
            .filter_map(|feature| feature.geometry.nearest_segment_point(coordinate))
            .filter(|(_, _, distance)| *distance <= tolerance)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map_or(coordinate, |(_, position, _)| position)
    }
}
