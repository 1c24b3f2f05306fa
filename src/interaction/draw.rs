use crate::feature::{Geometry, GeometryKind};
use crate::geometry::MapPoint;
use crate::map::VectorSource;

use super::{InteractionOutcome, MapPointerEvent, PointerKind};

pub const DEFAULT_FINISH_TOLERANCE_PX: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOptions {
    pub kind: GeometryKind,
    pub freehand: bool,
    pub finish_tolerance_px: f64,
}

impl DrawOptions {
    pub const fn new(kind: GeometryKind, freehand: bool) -> Self {
        Self {
            kind,
            freehand,
            finish_tolerance_px: DEFAULT_FINISH_TOLERANCE_PX,
        }
    }

    pub const fn with_finish_tolerance(mut self, pixels: f64) -> Self {
        self.finish_tolerance_px = pixels;
        self
    }
}

/// Places new geometry into the vector source.
///
/// Click mode appends a vertex per click and completes on double-click or on a click that
/// lands back on the last vertex (or the first vertex of a polygon). Freehand mode traces
/// while the pointer is held and completes on release. Points ignore freehand and complete
/// on the first click.
#[derive(Debug, Clone)]
pub struct Draw {
    options: DrawOptions,
    sketch: Vec<MapPoint>,
    cursor: Option<MapPoint>,
    pointer_held: bool,
}

impl Draw {
    pub const fn new(options: DrawOptions) -> Self {
        Self {
            options,
            sketch: Vec::new(),
            cursor: None,
            pointer_held: false,
        }
    }

    pub const fn kind(&self) -> GeometryKind {
        self.options.kind
    }

    pub const fn freehand(&self) -> bool {
        self.options.freehand && !matches!(self.options.kind, GeometryKind::Point)
    }

    /// Vertices placed so far in the in-progress geometry.
    pub fn sketch(&self) -> &[MapPoint] {
        &self.sketch
    }

    pub const fn cursor(&self) -> Option<MapPoint> {
        self.cursor
    }

    pub fn is_drawing(&self) -> bool {
        !self.sketch.is_empty()
    }

    pub fn handle(
        &mut self,
        event: MapPointerEvent,
        source: &mut VectorSource,
    ) -> InteractionOutcome {
        let coordinate = event.extent.clamp(event.coordinate);
        if event.kind == PointerKind::Move {
            self.cursor = Some(coordinate);
            return InteractionOutcome::None;
        }

        if self.options.kind == GeometryKind::Point {
            if event.kind != PointerKind::Click {
                return InteractionOutcome::None;
            }
            let id = source.add_geometry(Geometry::Point(coordinate));
            tracing::debug!(%id, "point placed");
            return InteractionOutcome::DrawEnd(id);
        }

        if self.freehand() {
            self.handle_freehand(event.kind, coordinate, source)
        } else {
            let tolerance = event.tolerance(self.options.finish_tolerance_px);
            self.handle_click(event.kind, coordinate, tolerance, source)
        }
    }

    fn handle_freehand(
        &mut self,
        kind: PointerKind,
        coordinate: MapPoint,
        source: &mut VectorSource,
    ) -> InteractionOutcome {
        match kind {
            PointerKind::Down => {
                self.sketch.clear();
                self.sketch.push(coordinate);
                self.pointer_held = true;
                InteractionOutcome::None
            }
            PointerKind::Drag if self.pointer_held => {
                self.push_distinct(coordinate);
                InteractionOutcome::None
            }
            PointerKind::Up if self.pointer_held => {
                self.pointer_held = false;
                self.push_distinct(coordinate);
                match self.finish_drawing(source) {
                    InteractionOutcome::None => {
                        self.abort_drawing();
                        InteractionOutcome::DrawAborted
                    }
                    outcome => outcome,
                }
            }
            _ => InteractionOutcome::None,
        }
    }

    fn handle_click(
        &mut self,
        kind: PointerKind,
        coordinate: MapPoint,
        tolerance: f64,
        source: &mut VectorSource,
    ) -> InteractionOutcome {
        match kind {
            PointerKind::Click => {
                if self.is_finish_coordinate(coordinate, tolerance) {
                    return self.finish_drawing(source);
                }
                self.sketch.push(coordinate);
                InteractionOutcome::None
            }
            // A pointer double-click arrives as click, click, dblclick. When the second
            // click already finished the sketch, the trailing dblclick has nothing to do.
            PointerKind::DoubleClick if self.sketch.is_empty() => InteractionOutcome::None,
            PointerKind::DoubleClick => {
                let on_last = self
                    .sketch
                    .last()
                    .is_some_and(|last| last.distance(&coordinate) <= tolerance);
                if !on_last {
                    self.sketch.push(coordinate);
                }
                self.finish_drawing(source)
            }
            _ => InteractionOutcome::None,
        }
    }

    fn push_distinct(&mut self, coordinate: MapPoint) {
        if self.sketch.last() != Some(&coordinate) {
            self.sketch.push(coordinate);
        }
    }

    fn is_finish_coordinate(&self, coordinate: MapPoint, tolerance: f64) -> bool {
        let near = |vertex: Option<&MapPoint>| {
            vertex.is_some_and(|vertex| vertex.distance(&coordinate) <= tolerance)
        };
        match self.options.kind {
            GeometryKind::Polygon => near(self.sketch.first()) || near(self.sketch.last()),
            _ => near(self.sketch.last()),
        }
    }

    /// Completes the sketch into a feature. Returns `None` and keeps drawing when the sketch
    /// does not yet have enough vertices.
    pub fn finish_drawing(&mut self, source: &mut VectorSource) -> InteractionOutcome {
        if self.sketch.len() < self.options.kind.min_vertices() {
            return InteractionOutcome::None;
        }
        let vertices = std::mem::take(&mut self.sketch);
        let geometry = match self.options.kind {
            GeometryKind::Point => Geometry::Point(vertices[0]),
            GeometryKind::LineString => Geometry::LineString(vertices),
            GeometryKind::Polygon => Geometry::polygon_from_open_ring(vertices),
        };
        let type_name = geometry.type_name();
        let id = source.add_geometry(geometry);
        tracing::debug!(%id, geometry = type_name, "drawing finished");
        InteractionOutcome::DrawEnd(id)
    }

    /// Drops the last placed vertex. Removing the only vertex aborts the drawing.
    pub fn remove_last_point(&mut self) -> bool {
        if self.sketch.pop().is_none() {
            return false;
        }
        if self.sketch.is_empty() {
            self.pointer_held = false;
        }
        true
    }

    pub fn abort_drawing(&mut self) {
        self.sketch.clear();
        self.cursor = None;
        self.pointer_held = false;
    }
}
