//! Annotation features held by the vector source.

use serde_json::{Map, Value};

use crate::geometry::{closest_on_segment, MapPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(pub u64);

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shapes a draw interaction can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

impl GeometryKind {
    /// Vertices needed before the shape can be completed.
    pub const fn min_vertices(self) -> usize {
        match self {
            Self::Point => 1,
            Self::LineString => 2,
            Self::Polygon => 3,
        }
    }
}

/// Geometry of a single annotation, in projection units.
///
/// Polygon rings are stored closed: the last coordinate repeats the first.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(MapPoint),
    LineString(Vec<MapPoint>),
    Polygon(Vec<Vec<MapPoint>>),
}

/// Address of one vertex inside a geometry. `ring` is always 0 for points and lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexRef {
    pub ring: usize,
    pub index: usize,
}

/// Address of the segment starting at `index` inside `ring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRef {
    pub ring: usize,
    pub index: usize,
}

impl Geometry {
    /// Builds a polygon from an open vertex list, closing the ring.
    pub fn polygon_from_open_ring(mut vertices: Vec<MapPoint>) -> Self {
        if let Some(first) = vertices.first().copied() {
            if vertices.last() != Some(&first) || vertices.len() == 1 {
                vertices.push(first);
            }
        }
        Self::Polygon(vec![vertices])
    }

    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::LineString(_) => "LineString",
            Self::Polygon(_) => "Polygon",
        }
    }

    fn rings(&self) -> Vec<&[MapPoint]> {
        match self {
            Self::Point(point) => vec![std::slice::from_ref(point)],
            Self::LineString(points) => vec![points.as_slice()],
            Self::Polygon(rings) => rings.iter().map(Vec::as_slice).collect(),
        }
    }

    /// Every distinct vertex, with the duplicated closing vertex of polygon rings skipped.
    pub fn vertices(&self) -> Vec<(VertexRef, MapPoint)> {
        let closed = matches!(self, Self::Polygon(_));
        let mut out = Vec::new();
        for (ring_index, ring) in self.rings().into_iter().enumerate() {
            let count = if closed {
                ring.len().saturating_sub(1)
            } else {
                ring.len()
            };
            for (index, point) in ring.iter().take(count).enumerate() {
                out.push((
                    VertexRef {
                        ring: ring_index,
                        index,
                    },
                    *point,
                ));
            }
        }
        out
    }

    pub fn segments(&self) -> Vec<(SegmentRef, MapPoint, MapPoint)> {
        let mut out = Vec::new();
        for (ring_index, ring) in self.rings().into_iter().enumerate() {
            for (index, pair) in ring.windows(2).enumerate() {
                out.push((
                    SegmentRef {
                        ring: ring_index,
                        index,
                    },
                    pair[0],
                    pair[1],
                ));
            }
        }
        out
    }

    pub fn nearest_vertex(&self, point: MapPoint) -> Option<(VertexRef, MapPoint, f64)> {
        self.vertices()
            .into_iter()
            .map(|(vertex, position)| (vertex, position, position.distance(&point)))
            .min_by(|a, b| a.2.total_cmp(&b.2))
    }

    pub fn nearest_segment_point(&self, point: MapPoint) -> Option<(SegmentRef, MapPoint, f64)> {
        self.segments()
            .into_iter()
            .map(|(segment, start, end)| {
                let closest = closest_on_segment(point, start, end);
                (segment, closest, closest.distance(&point))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))
    }

    /// Even-odd containment against the outer ring minus any holes.
    pub fn contains(&self, point: MapPoint) -> bool {
        let Self::Polygon(rings) = self else {
            return false;
        };
        let inside_count = rings
            .iter()
            .filter(|ring| ring_contains(ring, point))
            .count();
        inside_count % 2 == 1
    }

    /// Distance from `point` to the drawn shape; zero inside a polygon.
    pub fn distance_to(&self, point: MapPoint) -> f64 {
        if self.contains(point) {
            return 0.0;
        }
        match self {
            Self::Point(position) => position.distance(&point),
            Self::LineString(points) if points.len() == 1 => points[0].distance(&point),
            _ => self
                .nearest_segment_point(point)
                .map(|(_, _, distance)| distance)
                .unwrap_or(f64::INFINITY),
        }
    }

    pub fn set_vertex(&mut self, vertex: VertexRef, position: MapPoint) -> bool {
        match self {
            Self::Point(point) => {
                if vertex.ring != 0 || vertex.index != 0 {
                    return false;
                }
                *point = position;
                true
            }
            Self::LineString(points) => {
                match points.get_mut(vertex.index).filter(|_| vertex.ring == 0) {
                    Some(slot) => {
                        *slot = position;
                        true
                    }
                    None => false,
                }
            }
            Self::Polygon(rings) => {
                let Some(ring) = rings.get_mut(vertex.ring) else {
                    return false;
                };
                let last = ring.len().saturating_sub(1);
                if vertex.index > last {
                    return false;
                }
                ring[vertex.index] = position;
                if vertex.index == 0 || vertex.index == last {
                    ring[0] = position;
                    ring[last] = position;
                }
                true
            }
        }
    }

    /// Splits a segment with a new vertex and returns its address.
    pub fn insert_vertex(&mut self, segment: SegmentRef, position: MapPoint) -> Option<VertexRef> {
        let ring = match self {
            Self::Point(_) => return None,
            Self::LineString(points) if segment.ring == 0 => points,
            Self::LineString(_) => return None,
            Self::Polygon(rings) => rings.get_mut(segment.ring)?,
        };
        if segment.index + 1 >= ring.len() {
            return None;
        }
        ring.insert(segment.index + 1, position);
        Some(VertexRef {
            ring: segment.ring,
            index: segment.index + 1,
        })
    }
}

fn ring_contains(ring: &[MapPoint], point: MapPoint) -> bool {
    let mut inside = false;
    let mut previous = match ring.last() {
        Some(last) => *last,
        None => return false,
    };
    for current in ring {
        if (current.y > point.y) != (previous.y > point.y) {
            let crossing_x =
                (previous.x - current.x) * (point.y - current.y) / (previous.y - current.y) + current.x;
            if point.x < crossing_x {
                inside = !inside;
            }
        }
        previous = *current;
    }
    inside
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(id: FeatureId, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            properties: Map::new(),
        }
    }
}
