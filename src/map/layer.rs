use crate::geometry::Extent;
use crate::projection::ImageProjection;

use super::source::VectorSource;

/// Static raster covering the whole projection extent.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayer {
    uri: String,
    projection: ImageProjection,
}

impl ImageLayer {
    pub fn new(uri: impl Into<String>, projection: ImageProjection) -> Self {
        Self {
            uri: uri.into(),
            projection,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn projection(&self) -> &ImageProjection {
        &self.projection
    }

    pub fn image_extent(&self) -> Extent {
        self.projection.extent()
    }
}

/// Overlay holding the editable annotations.
#[derive(Debug, Clone, Default)]
pub struct VectorLayer {
    source: VectorSource,
}

impl VectorLayer {
    pub const fn new(source: VectorSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &VectorSource {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut VectorSource {
        &mut self.source
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Image,
    Vector,
}
