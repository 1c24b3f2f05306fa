//! The interactive canvas: a static image layer, the annotation layer above it, a view
//! and the single interaction currently armed.

mod layer;
mod source;
mod view;

pub use layer::{ImageLayer, LayerKind, VectorLayer};
pub use source::VectorSource;
pub use view::{View, ViewOptions};

use crate::geometry::ViewportSize;
use crate::interaction::{
    ActiveInteraction, InteractionFamily, InteractionKind, InteractionOutcome, MapPointerEvent,
    PointerEvent,
};
use crate::projection::ImageProjection;

#[derive(Debug)]
pub struct Map {
    image_layer: ImageLayer,
    vector_layer: VectorLayer,
    view: View,
    interaction: ActiveInteraction,
}

impl Map {
    pub fn new(
        image_uri: impl Into<String>,
        projection: ImageProjection,
        view_options: ViewOptions,
        viewport: ViewportSize,
    ) -> Self {
        let view = View::new(projection.extent(), view_options, viewport);
        Self {
            image_layer: ImageLayer::new(image_uri, projection),
            vector_layer: VectorLayer::new(VectorSource::new()),
            view,
            interaction: ActiveInteraction::None,
        }
    }

    /// Layers in draw order, bottom first.
    pub const fn layers(&self) -> [LayerKind; 2] {
        [LayerKind::Image, LayerKind::Vector]
    }

    pub fn image_layer(&self) -> &ImageLayer {
        &self.image_layer
    }

    pub fn projection(&self) -> &ImageProjection {
        self.image_layer.projection()
    }

    pub fn source(&self) -> &VectorSource {
        self.vector_layer.source()
    }

    pub fn source_mut(&mut self) -> &mut VectorSource {
        self.vector_layer.source_mut()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn set_viewport_size(&mut self, viewport: ViewportSize) {
        self.view.set_viewport(viewport);
    }

    pub fn interaction(&self) -> &ActiveInteraction {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut ActiveInteraction {
        &mut self.interaction
    }

    pub fn interaction_family(&self) -> InteractionFamily {
        self.interaction.family()
    }

    pub fn attached_interactions(&self) -> &'static [InteractionKind] {
        self.interaction.kinds()
    }

    /// Detaches whatever is armed and attaches `next` in its place.
    pub fn replace_interaction(&mut self, next: ActiveInteraction) {
        let mut previous = std::mem::replace(&mut self.interaction, next);
        previous.detach();
        self.interaction.attach();
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> InteractionOutcome {
        let map_event = MapPointerEvent {
            kind: event.kind,
            coordinate: self.view.screen_to_map(event.position),
            resolution: self.view.resolution(),
            extent: self.projection().extent(),
        };
        tracing::trace!(kind = ?event.kind, coordinate = ?map_event.coordinate, "pointer event");
        self.interaction
            .handle(map_event, self.vector_layer.source_mut())
    }
}
