use crate::geometry::Extent;

pub const IMAGE_PROJECTION_CODE: &str = "image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionUnits {
    Pixels,
}

/// Synthetic, non-geographic projection in which one map unit is one source pixel.
///
/// Built once from the loaded raster and never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProjection {
    code: &'static str,
    units: ProjectionUnits,
    extent: Extent,
}

impl ImageProjection {
    pub fn from_pixel_size(width: u32, height: u32) -> Self {
        Self {
            code: IMAGE_PROJECTION_CODE,
            units: ProjectionUnits::Pixels,
            extent: Extent::new(0.0, 0.0, f64::from(width), f64::from(height)),
        }
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub const fn units(&self) -> ProjectionUnits {
        self.units
    }

    pub const fn extent(&self) -> Extent {
        self.extent
    }
}
