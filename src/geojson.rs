//! GeoJSON feature collections for annotations.
//!
//! Coordinates are written in the image projection (pixel units, y up), not longitude and
//! latitude. Features without properties carry `"properties": null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::feature::{Feature as StoredFeature, Geometry as StoredGeometry};
use crate::geometry::MapPoint;

pub type Position = [f64; 2];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureCollectionTag {
    #[default]
    FeatureCollection,
}

/// A feature `id` may be either a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureIdentifier {
    Number(Number),
    String(String),
}

impl From<u64> for FeatureIdentifier {
    fn from(id: u64) -> Self {
        Self::Number(Number::from(id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureIdentifier>,
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: FeatureCollectionTag,
    pub features: Vec<Feature>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: FeatureCollectionTag::FeatureCollection,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

fn position(point: &MapPoint) -> Position {
    point.to_array()
}

fn positions(points: &[MapPoint]) -> Vec<Position> {
    points.iter().map(position).collect()
}

impl From<&StoredGeometry> for Geometry {
    fn from(geometry: &StoredGeometry) -> Self {
        match geometry {
            StoredGeometry::Point(point) => Self::Point(position(point)),
            StoredGeometry::LineString(points) => Self::LineString(positions(points)),
            StoredGeometry::Polygon(rings) => {
                Self::Polygon(rings.iter().map(|ring| positions(ring)).collect())
            }
        }
    }
}

impl From<&StoredFeature> for Feature {
    fn from(feature: &StoredFeature) -> Self {
        Self {
            kind: FeatureTag::Feature,
            id: Some(FeatureIdentifier::from(feature.id.0)),
            geometry: Geometry::from(&feature.geometry),
            properties: (!feature.properties.is_empty()).then(|| feature.properties.clone()),
        }
    }
}

/// Serializes features in store order.
pub fn write_features<'a>(features: impl IntoIterator<Item = &'a StoredFeature>) -> FeatureCollection {
    FeatureCollection::new(features.into_iter().map(Feature::from).collect())
}
