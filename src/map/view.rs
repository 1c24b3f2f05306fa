use crate::geometry::{Extent, MapPoint, ScreenPoint, ViewportSize};

const TILE_SIZE_PX: f64 = 256.0;
const MIN_ZOOM: f64 = 0.0;
const ZOOM_STEP: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub initial_zoom: f64,
    pub max_zoom: f64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            initial_zoom: 2.0,
            max_zoom: 8.0,
        }
    }
}

/// Pan/zoom state over a projection extent.
///
/// Resolution (map units per screen pixel) halves with every zoom level, starting from the
/// value that fits the longest side of the extent into one 256px tile at zoom 0.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    extent: Extent,
    center: MapPoint,
    zoom: f64,
    max_zoom: f64,
    max_resolution: f64,
    viewport: ViewportSize,
}

impl View {
    pub fn new(extent: Extent, options: ViewOptions, viewport: ViewportSize) -> Self {
        let longest_side = extent.width().max(extent.height());
        let max_zoom = options.max_zoom.max(MIN_ZOOM);
        Self {
            extent,
            center: extent.center(),
            zoom: options.initial_zoom.clamp(MIN_ZOOM, max_zoom),
            max_zoom,
            max_resolution: longest_side / TILE_SIZE_PX,
            viewport,
        }
    }

    pub const fn extent(&self) -> Extent {
        self.extent
    }

    pub const fn center(&self) -> MapPoint {
        self.center
    }

    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    pub const fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    pub const fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    pub fn resolution(&self) -> f64 {
        self.max_resolution / 2f64.powf(self.zoom)
    }

    pub fn zoom_to(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, self.max_zoom);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_to(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_to(self.zoom - ZOOM_STEP);
    }

    /// Moves the content along with a pointer drag of `delta_x`/`delta_y` screen pixels.
    pub fn pan_by(&mut self, delta_x: f64, delta_y: f64) {
        let resolution = self.resolution();
        self.center = MapPoint::new(
            self.center.x - delta_x * resolution,
            self.center.y + delta_y * resolution,
        );
    }

    pub fn screen_to_map(&self, point: ScreenPoint) -> MapPoint {
        let resolution = self.resolution();
        let half_width = f64::from(self.viewport.width) / 2.0;
        let half_height = f64::from(self.viewport.height) / 2.0;
        MapPoint::new(
            self.center.x + (point.x - half_width) * resolution,
            self.center.y - (point.y - half_height) * resolution,
        )
    }

    pub fn map_to_screen(&self, point: MapPoint) -> ScreenPoint {
        let resolution = self.resolution();
        let half_width = f64::from(self.viewport.width) / 2.0;
        let half_height = f64::from(self.viewport.height) / 2.0;
        ScreenPoint::new(
            (point.x - self.center.x) / resolution + half_width,
            (self.center.y - point.y) / resolution + half_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_800x600() -> View {
        View::new(
            Extent::new(0.0, 0.0, 800.0, 600.0),
            ViewOptions::default(),
            ViewportSize::new(1024, 768),
        )
    }

    #[test]
    fn starts_centered_on_extent_with_configured_zoom() {
        let view = view_800x600();
        assert_eq!(view.center(), MapPoint::new(400.0, 300.0));
        assert_eq!(view.zoom(), 2.0);
        assert_eq!(view.max_zoom(), 8.0);
        assert_eq!(view.resolution(), 800.0 / 256.0 / 4.0);
    }

    #[test]
    fn zoom_is_clamped_to_range() {
        let mut view = view_800x600();
        view.zoom_to(42.0);
        assert_eq!(view.zoom(), 8.0);
        view.zoom_in();
        assert_eq!(view.zoom(), 8.0);
        view.zoom_to(0.5);
        view.zoom_out();
        assert_eq!(view.zoom(), 0.0);
    }

    #[test]
    fn viewport_center_maps_to_view_center_and_y_points_up() {
        let view = view_800x600();
        assert_eq!(
            view.screen_to_map(ScreenPoint::new(512.0, 384.0)),
            MapPoint::new(400.0, 300.0)
        );
        let above = view.screen_to_map(ScreenPoint::new(512.0, 284.0));
        assert!(above.y > 300.0);
    }

    #[test]
    fn screen_and_map_conversions_invert_each_other() {
        let mut view = view_800x600();
        view.zoom_to(3.5);
        view.pan_by(40.0, -25.0);
        let map = MapPoint::new(123.0, 456.0);
        let back = view.screen_to_map(view.map_to_screen(map));
        assert!((back.x - map.x).abs() < 1e-9);
        assert!((back.y - map.y).abs() < 1e-9);
    }

    #[test]
    fn pan_moves_content_with_the_pointer() {
        let mut view = view_800x600();
        let anchor = MapPoint::new(400.0, 300.0);
        let before = view.map_to_screen(anchor);
        view.pan_by(10.0, 20.0);
        let after = view.map_to_screen(anchor);
        assert!((after.x - before.x - 10.0).abs() < 1e-9);
        assert!((after.y - before.y - 20.0).abs() < 1e-9);
    }
}
