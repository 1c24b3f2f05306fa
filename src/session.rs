//! Annotation session: one base image, one annotation store, one armed mode.

use thiserror::Error;

use crate::config::AppConfig;
use crate::feature::GeometryKind;
use crate::geojson::{self, FeatureCollection};
use crate::geometry::ViewportSize;
use crate::interaction::{InteractionOutcome, PointerEvent};
use crate::loader::{self, ImageInfo, LoadError};
use crate::map::Map;
use crate::mode::{DrawMode, ModeController, ModeSubscription};
use crate::projection::ImageProjection;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    ImageLoad(#[from] LoadError),
    #[error("importing annotations into the store is not supported")]
    ImportUnsupported,
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

type DrawCompleteListener = Box<dyn FnMut(&FeatureCollection)>;

pub struct AnnotationSession {
    map: Map,
    controller: ModeController,
    draw_listeners: Vec<DrawCompleteListener>,
}

impl std::fmt::Debug for AnnotationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationSession")
            .field("map", &self.map)
            .field("controller", &self.controller)
            .field("draw_listeners", &self.draw_listeners.len())
            .finish()
    }
}

impl AnnotationSession {
    /// Loads the image in the background and builds the canvas once its size is known.
    /// Fails if the image cannot be read or the load outlives the configured timeout.
    pub fn initialize(image_uri: &str, config: &AppConfig) -> SessionResult<Self> {
        let pending = loader::spawn_load(image_uri);
        let info = pending.wait(config.image_load_timeout()).map_err(|err| {
            tracing::warn!(uri = image_uri, %err, "image load failed");
            err
        })?;
        Ok(Self::from_image(image_uri, info, config))
    }

    /// Builds the canvas for an image whose size is already known.
    pub fn from_image(image_uri: impl Into<String>, info: ImageInfo, config: &AppConfig) -> Self {
        let image_uri = image_uri.into();
        let projection = ImageProjection::from_pixel_size(info.width, info.height);
        let mut map = Map::new(
            image_uri,
            projection,
            config.view_options(),
            config.viewport(),
        );
        let controller = ModeController::new(
            &mut map,
            GeometryKind::LineString,
            config.default_freehand,
            config.tolerances(),
        );
        tracing::info!(
            uri = map.image_layer().uri(),
            width = info.width,
            height = info.height,
            zoom = map.view().zoom(),
            "annotation session ready"
        );
        Self {
            map,
            controller,
            draw_listeners: Vec::new(),
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn mode(&self) -> DrawMode {
        self.controller.mode()
    }

    /// Mode notifications, starting with the current mode.
    pub fn subscribe_mode(&mut self) -> ModeSubscription {
        self.controller.subscribe()
    }

    pub fn set_draw_mode(&mut self, kind: GeometryKind, freehand: bool) {
        self.controller.set_draw_mode(&mut self.map, kind, freehand);
    }

    pub fn enter_edit_mode(&mut self) {
        self.controller.enter_edit_mode(&mut self.map);
    }

    pub fn enter_delete_mode(&mut self) {
        self.controller.enter_delete_mode(&mut self.map);
    }

    pub fn undo_last_point(&mut self) -> bool {
        self.controller.undo_last_point(&mut self.map)
    }

    /// Registers an observer that receives the whole collection after every completed draw.
    pub fn on_draw_complete(&mut self, listener: impl FnMut(&FeatureCollection) + 'static) {
        self.draw_listeners.push(Box::new(listener));
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> InteractionOutcome {
        let outcome = self.map.handle_pointer(event);
        match &outcome {
            InteractionOutcome::DrawEnd(id) => {
                let collection = self.serialize_annotations();
                match collection.to_json() {
                    Ok(json) => tracing::info!(%id, features = collection.len(), geojson = %json, "draw complete"),
                    Err(err) => tracing::warn!(%id, %err, "draw complete but serialization failed"),
                }
                for listener in &mut self.draw_listeners {
                    listener(&collection);
                }
            }
            InteractionOutcome::Selected(hits) => {
                self.controller.apply_selection(&mut self.map, hits);
            }
            InteractionOutcome::ModifyEnd(id) => {
                tracing::debug!(%id, "annotation modified");
            }
            InteractionOutcome::DrawAborted => {
                tracing::debug!("drawing discarded");
            }
            InteractionOutcome::None => {}
        }
        outcome
    }

    /// Snapshot of the store as GeoJSON, in image pixel coordinates.
    pub fn serialize_annotations(&self) -> FeatureCollection {
        geojson::write_features(self.map.source().features())
    }

    /// Loading serialized features back into the store has no defined mapping yet.
    pub fn import_annotations(&mut self, collection: &FeatureCollection) -> SessionResult<usize> {
        tracing::warn!(features = collection.len(), "annotation import requested but unsupported");
        Err(SessionError::ImportUnsupported)
    }

    pub fn zoom_in(&mut self) {
        self.map.view_mut().zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.map.view_mut().zoom_out();
    }

    pub fn pan_by(&mut self, delta_x: f64, delta_y: f64) {
        self.map.view_mut().pan_by(delta_x, delta_y);
    }

    pub fn set_viewport_size(&mut self, viewport: ViewportSize) {
        self.map.set_viewport_size(viewport);
    }

    /// Ends the session and hands back the final annotations.
    pub fn close(self) -> FeatureCollection {
        let collection = self.serialize_annotations();
        tracing::info!(
            uri = self.map.image_layer().uri(),
            features = collection.len(),
            "annotation session closed"
        );
        collection
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::geojson::Geometry as JsonGeometry;
    use crate::geometry::MapPoint;
    use crate::interaction::{InteractionFamily, PointerKind};
    use crate::loader::tests::write_png;

    fn session() -> AnnotationSession {
        AnnotationSession::from_image(
            "board.png",
            ImageInfo {
                width: 800,
                height: 600,
            },
            &AppConfig::default(),
        )
    }

    fn at(session: &mut AnnotationSession, kind: PointerKind, x: f64, y: f64) -> InteractionOutcome {
        let screen = session.map().view().map_to_screen(MapPoint::new(x, y));
        session.handle_pointer(PointerEvent::new(kind, screen.x, screen.y))
    }

    fn captured(session: &mut AnnotationSession) -> Rc<RefCell<Vec<FeatureCollection>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.on_draw_complete(move |collection| sink.borrow_mut().push(collection.clone()));
        seen
    }

    #[test]
    fn initialize_builds_canvas_from_image_size() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_png(dir.path(), "board.png", 800, 600);

        let mut session = AnnotationSession::initialize(&path.to_string_lossy(), &AppConfig::default())
            .expect("session should initialize");
        let view = session.map().view();
        assert_eq!(view.extent().to_array(), [0.0, 0.0, 800.0, 600.0]);
        assert_eq!(view.center(), MapPoint::new(400.0, 300.0));
        assert_eq!(view.zoom(), 2.0);
        assert_eq!(view.max_zoom(), 8.0);
        assert_eq!(session.mode(), DrawMode::LineString);
        let draw = session.map().interaction().as_draw().expect("draw armed");
        assert!(draw.freehand());
        assert_eq!(session.subscribe_mode().drain(), vec![DrawMode::LineString]);
    }

    #[test]
    fn initialize_reports_unreadable_image() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("gone.png");
        let err = AnnotationSession::initialize(&missing.to_string_lossy(), &AppConfig::default())
            .expect_err("missing image should fail");
        assert!(matches!(err, SessionError::ImageLoad(LoadError::Io { .. })));
    }

    #[test]
    fn completed_polygon_is_emitted_as_closed_ring() {
        let mut session = session();
        let seen = captured(&mut session);
        session.set_draw_mode(GeometryKind::Polygon, false);

        for (x, y) in [(100.0, 100.0), (300.0, 100.0), (300.0, 300.0), (100.0, 300.0)] {
            at(&mut session, PointerKind::Click, x, y);
        }
        let outcome = at(&mut session, PointerKind::DoubleClick, 100.0, 300.0);
        assert!(matches!(outcome, InteractionOutcome::DrawEnd(_)));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 1);
        let JsonGeometry::Polygon(rings) = &seen[0].features[0].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(rings[0].len(), 5);
        assert_eq!(rings[0][0], rings[0][4]);
        assert!(rings[0]
            .iter()
            .all(|[x, y]| (0.0..=800.0).contains(x) && (0.0..=600.0).contains(y)));
    }

    #[test]
    fn every_completed_draw_notifies_after_mode_switches() {
        let mut session = session();
        let seen = captured(&mut session);

        session.set_draw_mode(GeometryKind::Point, false);
        at(&mut session, PointerKind::Click, 50.0, 50.0);
        session.enter_edit_mode();
        session.set_draw_mode(GeometryKind::Point, false);
        at(&mut session, PointerKind::Click, 60.0, 60.0);

        let counts: Vec<usize> = seen.borrow().iter().map(FeatureCollection::len).collect();
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn pointer_double_click_stream_does_not_seed_next_drawing() {
        let mut session = session();
        session.set_draw_mode(GeometryKind::LineString, false);

        at(&mut session, PointerKind::Click, 100.0, 100.0);
        at(&mut session, PointerKind::Click, 300.0, 100.0);
        let finished = at(&mut session, PointerKind::Click, 300.0, 100.0);
        assert!(matches!(finished, InteractionOutcome::DrawEnd(_)));
        let trailing = at(&mut session, PointerKind::DoubleClick, 300.0, 100.0);
        assert_eq!(trailing, InteractionOutcome::None);
        let draw = session.map().interaction().as_draw().expect("draw armed");
        assert!(draw.sketch().is_empty());

        at(&mut session, PointerKind::Click, 500.0, 500.0);
        at(&mut session, PointerKind::DoubleClick, 600.0, 500.0);
        let collection = session.serialize_annotations();
        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.features[1].geometry,
            JsonGeometry::LineString(vec![[500.0, 500.0], [600.0, 500.0]])
        );
    }

    #[test]
    fn freehand_release_notifies_with_traced_line() {
        let mut session = session();
        let seen = captured(&mut session);
        assert!(session
            .map()
            .interaction()
            .as_draw()
            .expect("draw armed")
            .freehand());

        at(&mut session, PointerKind::Down, 100.0, 100.0);
        at(&mut session, PointerKind::Drag, 200.0, 100.0);
        at(&mut session, PointerKind::Drag, 200.0, 200.0);
        let outcome = at(&mut session, PointerKind::Up, 200.0, 200.0);
        assert!(matches!(outcome, InteractionOutcome::DrawEnd(_)));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].features[0].geometry,
            JsonGeometry::LineString(vec![[100.0, 100.0], [200.0, 100.0], [200.0, 200.0]])
        );
    }

    #[test]
    fn freehand_tap_without_drag_is_discarded_silently() {
        let mut session = session();
        let seen = captured(&mut session);

        at(&mut session, PointerKind::Down, 100.0, 100.0);
        let outcome = at(&mut session, PointerKind::Up, 100.0, 100.0);
        assert_eq!(outcome, InteractionOutcome::DrawAborted);
        assert!(seen.borrow().is_empty());
        assert!(session.serialize_annotations().is_empty());
    }

    #[test]
    fn delete_click_near_stroke_removes_feature() {
        let mut session = session();
        session.set_draw_mode(GeometryKind::LineString, false);
        at(&mut session, PointerKind::Click, 100.0, 200.0);
        at(&mut session, PointerKind::DoubleClick, 500.0, 200.0);
        session.set_draw_mode(GeometryKind::Point, false);
        at(&mut session, PointerKind::Click, 700.0, 500.0);
        assert_eq!(session.serialize_annotations().len(), 2);

        session.enter_delete_mode();
        // 15 screen pixels off the stroke: inside the 20px hit radius.
        let screen = session.map().view().map_to_screen(MapPoint::new(300.0, 200.0));
        session.handle_pointer(PointerEvent::new(PointerKind::Click, screen.x, screen.y + 15.0));

        let remaining = session.serialize_annotations();
        assert_eq!(remaining.len(), 1);
        assert!(matches!(remaining.features[0].geometry, JsonGeometry::Point(_)));
    }

    #[test]
    fn delete_click_on_empty_canvas_is_a_no_op() {
        let mut session = session();
        session.set_draw_mode(GeometryKind::Point, false);
        at(&mut session, PointerKind::Click, 10.0, 10.0);
        session.enter_delete_mode();

        let outcome = at(&mut session, PointerKind::Click, 600.0, 400.0);
        assert_eq!(outcome, InteractionOutcome::Selected(Vec::new()));
        assert_eq!(session.serialize_annotations().len(), 1);
    }

    #[test]
    fn undo_before_any_point_changes_nothing() {
        let mut session = session();
        session.set_draw_mode(GeometryKind::Polygon, false);
        assert!(!session.undo_last_point());
        assert!(session.serialize_annotations().is_empty());
        let draw = session.map().interaction().as_draw().expect("draw armed");
        assert!(draw.sketch().is_empty());
    }

    #[test]
    fn undo_drops_last_vertex_of_in_progress_line() {
        let mut session = session();
        session.set_draw_mode(GeometryKind::LineString, false);
        at(&mut session, PointerKind::Click, 100.0, 100.0);
        at(&mut session, PointerKind::Click, 200.0, 100.0);
        assert!(session.undo_last_point());
        at(&mut session, PointerKind::DoubleClick, 100.0, 400.0);

        let collection = session.serialize_annotations();
        assert_eq!(
            collection.features[0].geometry,
            JsonGeometry::LineString(vec![[100.0, 100.0], [100.0, 400.0]])
        );
    }

    #[test]
    fn serialized_geometry_round_trips_through_json() {
        let mut session = session();
        session.set_draw_mode(GeometryKind::LineString, false);
        at(&mut session, PointerKind::Click, 120.0, 80.0);
        at(&mut session, PointerKind::DoubleClick, 640.0, 520.0);

        let text = session
            .serialize_annotations()
            .to_json()
            .expect("serializable");
        let parsed = FeatureCollection::from_json(&text).expect("parses back");
        assert_eq!(parsed.len(), 1);
        let JsonGeometry::LineString(points) = &parsed.features[0].geometry else {
            panic!("expected line");
        };
        let expected = [[120.0, 80.0], [640.0, 520.0]];
        for (point, expected) in points.iter().zip(expected) {
            assert!((point[0] - expected[0]).abs() < 1e-9);
            assert!((point[1] - expected[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn edit_mode_drags_vertex_onto_neighbouring_geometry() {
        let mut session = session();
        session.set_draw_mode(GeometryKind::Point, false);
        at(&mut session, PointerKind::Click, 400.0, 300.0);
        session.set_draw_mode(GeometryKind::LineString, false);
        at(&mut session, PointerKind::Click, 100.0, 100.0);
        at(&mut session, PointerKind::DoubleClick, 200.0, 100.0);

        session.enter_edit_mode();
        assert_eq!(session.map().interaction_family(), InteractionFamily::EditPair);
        at(&mut session, PointerKind::Down, 200.0, 100.0);
        // Within the snap radius of the point feature.
        at(&mut session, PointerKind::Drag, 403.0, 302.0);
        let outcome = at(&mut session, PointerKind::Up, 403.0, 302.0);
        assert!(matches!(outcome, InteractionOutcome::ModifyEnd(_)));

        let collection = session.serialize_annotations();
        let line = collection
            .features
            .iter()
            .find_map(|feature| match &feature.geometry {
                JsonGeometry::LineString(points) => Some(points.clone()),
                _ => None,
            })
            .expect("line still stored");
        assert_eq!(line, vec![[100.0, 100.0], [400.0, 300.0]]);
    }

    #[test]
    fn exactly_one_family_is_attached_after_any_switch() {
        let mut session = session();
        session.enter_delete_mode();
        session.enter_delete_mode();
        session.enter_edit_mode();
        session.set_draw_mode(GeometryKind::Polygon, true);
        session.enter_delete_mode();
        assert_eq!(session.map().interaction_family(), InteractionFamily::Select);
        assert_eq!(session.map().attached_interactions().len(), 1);
    }

    #[test]
    fn import_is_declared_but_unsupported() {
        let mut session = session();
        let err = session
            .import_annotations(&FeatureCollection::default())
            .expect_err("import should be rejected");
        assert!(matches!(err, SessionError::ImportUnsupported));
    }

    #[test]
    fn close_returns_final_annotations() {
        let mut session = session();
        session.set_draw_mode(GeometryKind::Point, false);
        at(&mut session, PointerKind::Click, 1.0, 1.0);
        assert_eq!(session.close().len(), 1);
    }
}
