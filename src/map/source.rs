use crate::feature::{Feature, FeatureId, Geometry};

/// Ordered store of annotation features in projection coordinates.
///
/// Insertion order is draw order: later features render on top.
#[derive(Debug, Clone)]
pub struct VectorSource {
    features: Vec<Feature>,
    next_id: u64,
}

impl Default for VectorSource {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorSource {
    pub const fn new() -> Self {
        Self {
            features: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> FeatureId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        FeatureId(id)
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> FeatureId {
        let id = self.allocate_id();
        self.features.push(Feature::new(id, geometry));
        id
    }

    pub fn remove_feature(&mut self, id: FeatureId) -> Option<Feature> {
        let index = self.features.iter().position(|feature| feature.id == id)?;
        Some(self.features.remove(index))
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.id == id)
    }

    pub fn feature_mut(&mut self, id: FeatureId) -> Option<&mut Feature> {
        self.features.iter_mut().find(|feature| feature.id == id)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
