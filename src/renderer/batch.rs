use std::collections::HashMap;

use glam::Mat4;

use crate::renderer::material::TexturedModel;
use crate::scene::Entity;

/// Snapshot of one submitted entity: everything a draw needs besides the
/// shared state carried by the batching key.
#[derive(Debug, Clone, Copy)]
pub struct EntityData {
    pub transform: Mat4,
}

/// Groups draw submissions by shared [`TexturedModel`] so geometry and
/// material state is bound once per group.
///
/// Submissions live for one frame: the renderer clears the batcher after
/// every flush, so callers resubmit everything each frame. Group iteration
/// order is unspecified; opaque depth-tested geometry produces the same
/// framebuffer in any draw order.
pub struct RenderBatcher {
    groups: HashMap<TexturedModel, Vec<EntityData>>,
}

impl RenderBatcher {
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    /// Queue an entity for this frame. O(1) amortized; touches no GPU state.
    pub fn submit(&mut self, entity: &Entity) {
        self.groups
            .entry(entity.model)
            .or_default()
            .push(EntityData {
                transform: entity.transform_matrix(),
            });
    }

    /// Drop this frame's submissions while keeping both the map entries and
    /// the per-group allocations for reuse next frame.
    pub fn clear(&mut self) {
        for group in self.groups.values_mut() {
            group.clear();
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = (TexturedModel, &[EntityData])> {
        self.groups
            .iter()
            .map(|(model, entities)| (*model, entities.as_slice()))
    }

    /// Number of distinct models with at least one submission this frame.
    pub fn group_count(&self) -> usize {
        self.groups.values().filter(|g| !g.is_empty()).count()
    }

    pub fn entity_count(&self) -> usize {
        self.groups.values().map(|g| g.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }
}

impl Default for RenderBatcher {
    fn default() -> Self {
        Self::new()
    }
}
