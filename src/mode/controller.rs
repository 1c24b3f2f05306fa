use crate::feature::{Feature, FeatureId};
use crate::interaction::{
    ActiveInteraction, Draw, DrawOptions, Modify, Select, Snap, DEFAULT_FINISH_TOLERANCE_PX,
    DEFAULT_HIT_TOLERANCE_PX, DEFAULT_MODIFY_TOLERANCE_PX, DEFAULT_SNAP_TOLERANCE_PX,
};
use crate::map::Map;

use super::{
    DrawMode, GeometryKind, ModeEvent, ModeMachine, ModePublisher, ModeSubscription,
    ModeTransition,
};

/// Pointer tolerances, in screen pixels, handed to the interactions this controller builds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceOptions {
    pub hit_px: f64,
    pub snap_px: f64,
    pub modify_px: f64,
    pub finish_px: f64,
}

impl Default for ToleranceOptions {
    fn default() -> Self {
        Self {
            hit_px: DEFAULT_HIT_TOLERANCE_PX,
            snap_px: DEFAULT_SNAP_TOLERANCE_PX,
            modify_px: DEFAULT_MODIFY_TOLERANCE_PX,
            finish_px: DEFAULT_FINISH_TOLERANCE_PX,
        }
    }
}

/// Owns the current drawing mode and keeps the map's armed interaction in step with it.
#[derive(Debug)]
pub struct ModeController {
    machine: ModeMachine,
    publisher: ModePublisher,
    tolerances: ToleranceOptions,
}

impl ModeController {
    /// Arms the startup draw mode. Its value is the publisher's initial notification, so it
    /// is not published a second time.
    pub fn new(
        map: &mut Map,
        kind: GeometryKind,
        freehand: bool,
        tolerances: ToleranceOptions,
    ) -> Self {
        let initial = DrawMode::from(kind);
        let controller = Self {
            machine: ModeMachine::new(initial),
            publisher: ModePublisher::new(initial),
            tolerances,
        };
        map.replace_interaction(controller.draw_interaction(kind, freehand));
        controller
    }

    pub fn mode(&self) -> DrawMode {
        self.machine.mode()
    }

    pub fn history(&self) -> &[ModeTransition] {
        self.machine.history()
    }

    pub fn subscribe(&mut self) -> ModeSubscription {
        self.publisher.subscribe()
    }

    pub fn set_draw_mode(&mut self, map: &mut Map, kind: GeometryKind, freehand: bool) {
        let interaction = self.draw_interaction(kind, freehand);
        self.apply(map, ModeEvent::Draw { kind, freehand }, interaction);
    }

    pub fn enter_edit_mode(&mut self, map: &mut Map) {
        let interaction = ActiveInteraction::Edit {
            snap: Snap::new(self.tolerances.snap_px),
            modify: Modify::new(self.tolerances.modify_px),
        };
        self.apply(map, ModeEvent::Edit, interaction);
    }

    pub fn enter_delete_mode(&mut self, map: &mut Map) {
        let interaction = ActiveInteraction::Select(Select::new(self.tolerances.hit_px));
        self.apply(map, ModeEvent::Delete, interaction);
    }

    /// Removes the newest vertex of the in-progress drawing. Returns `false` when no draw
    /// interaction is armed or nothing has been placed yet.
    pub fn undo_last_point(&self, map: &mut Map) -> bool {
        map.interaction_mut()
            .as_draw_mut()
            .is_some_and(Draw::remove_last_point)
    }

    /// Delete-mode reaction to a selection: removes the first hit only.
    pub fn apply_selection(&self, map: &mut Map, hits: &[FeatureId]) -> Option<Feature> {
        let first = *hits.first()?;
        let removed = map.source_mut().remove_feature(first)?;
        if let Some(select) = map.interaction_mut().as_select_mut() {
            select.deselect(first);
        }
        tracing::info!(id = %first, remaining = map.source().len(), "annotation deleted");
        Some(removed)
    }

    fn draw_interaction(&self, kind: GeometryKind, freehand: bool) -> ActiveInteraction {
        ActiveInteraction::Draw(Draw::new(
            DrawOptions::new(kind, freehand).with_finish_tolerance(self.tolerances.finish_px),
        ))
    }

    fn apply(&mut self, map: &mut Map, event: ModeEvent, interaction: ActiveInteraction) {
        map.replace_interaction(interaction);
        let mode = self.machine.transition(event);
        self.publisher.publish(mode);
    }
}
