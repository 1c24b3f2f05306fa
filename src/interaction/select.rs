use crate::feature::FeatureId;
use crate::map::VectorSource;

use super::{InteractionOutcome, MapPointerEvent, PointerKind};

pub const DEFAULT_HIT_TOLERANCE_PX: f64 = 20.0;

/// Click selection with a pointer hit radius, so thin strokes stay easy to pick.
#[derive(Debug, Clone)]
pub struct Select {
    hit_tolerance_px: f64,
    selected: Vec<FeatureId>,
}

impl Default for Select {
    fn default() -> Self {
        Self::new(DEFAULT_HIT_TOLERANCE_PX)
    }
}

impl Select {
    pub const fn new(hit_tolerance_px: f64) -> Self {
        Self {
            hit_tolerance_px,
            selected: Vec::new(),
        }
    }

    pub const fn hit_tolerance_px(&self) -> f64 {
        self.hit_tolerance_px
    }

    pub fn selected(&self) -> &[FeatureId] {
        &self.selected
    }

    pub fn deselect(&mut self, id: FeatureId) {
        self.selected.retain(|selected| *selected != id);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn handle(&mut self, event: MapPointerEvent, source: &VectorSource) -> InteractionOutcome {
        if event.kind != PointerKind::Click {
            return InteractionOutcome::None;
        }
        let tolerance = event.tolerance(self.hit_tolerance_px);
        self.selected = source
            .features()
            .iter()
            .rev()
            .filter(|feature| feature.geometry.distance_to(event.coordinate) <= tolerance)
            .map(|feature| feature.id)
            .collect();
        InteractionOutcome::Selected(self.selected.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Geometry;
    use crate::geometry::{Extent, MapPoint};

    fn click(x: f64, y: f64, resolution: f64) -> MapPointerEvent {
        MapPointerEvent {
            kind: PointerKind::Click,
            coordinate: MapPoint::new(x, y),
            resolution,
            extent: Extent::new(0.0, 0.0, 800.0, 600.0),
        }
    }

    #[test]
    fn hits_are_ordered_top_most_first() {
        let mut source = VectorSource::new();
        let bottom = source.add_geometry(Geometry::LineString(vec![
            MapPoint::new(0.0, 100.0),
            MapPoint::new(200.0, 100.0),
        ]));
        let top = source.add_geometry(Geometry::Point(MapPoint::new(100.0, 105.0)));
        let mut select = Select::default();

        let outcome = select.handle(click(100.0, 110.0, 1.0), &source);
        assert_eq!(outcome, InteractionOutcome::Selected(vec![top, bottom]));
        assert_eq!(select.selected(), &[top, bottom]);
    }

    #[test]
    fn tolerance_scales_with_resolution() {
        let mut source = VectorSource::new();
        let id = source.add_geometry(Geometry::Point(MapPoint::new(0.0, 0.0)));
        let mut select = Select::default();

        assert_eq!(
            select.handle(click(30.0, 0.0, 1.0), &source),
            InteractionOutcome::Selected(Vec::new())
        );
        assert_eq!(
            select.handle(click(30.0, 0.0, 2.0), &source),
            InteractionOutcome::Selected(vec![id])
        );
    }

    #[test]
    fn non_click_input_is_ignored() {
        let source = VectorSource::new();
        let mut select = Select::default();
        let mut event = click(1.0, 1.0, 1.0);
        event.kind = PointerKind::Down;
        assert_eq!(select.handle(event, &source), InteractionOutcome::None);
    }
}
