use glam::Mat4;

use crate::asset::{Handle, Mesh};
use crate::renderer::batch::{EntityData, RenderBatcher};
use crate::renderer::material::{Material, TexturedModel};
use crate::terrain::Terrain;

/// One terrain tile scheduled for this frame, with the uniform slot holding
/// its transform.
#[derive(Debug, Clone)]
pub struct TerrainDraw {
    pub mesh: Handle<Mesh>,
    pub material: Handle<Material>,
    pub transform: Mat4,
    pub slot: u32,
}

/// One entity group: the shared model plus the contiguous slot range its
/// entities occupy in the per-draw uniform buffer.
#[derive(Debug, Clone)]
pub struct DrawBatch {
    pub model: TexturedModel,
    pub first_slot: u32,
    pub entities: Vec<EntityData>,
}

/// CPU-side draw schedule for one frame, built from the batcher before any
/// command recording happens.
///
/// The plan pins down the frame's draw accounting: one bind sequence per
/// distinct model (and per terrain tile), one draw call per entity, slots
/// assigned contiguously per group. Empty groups left behind by
/// [`RenderBatcher::clear`] are skipped entirely.
pub struct FramePlan {
    terrains: Vec<TerrainDraw>,
    batches: Vec<DrawBatch>,
    slot_count: u32,
}

impl FramePlan {
    pub fn build(batcher: &RenderBatcher, terrains: &[Terrain]) -> Self {
        let mut slot = 0u32;

        let terrains = terrains
            .iter()
            .map(|terrain| {
                let draw = TerrainDraw {
                    mesh: terrain.mesh,
                    material: terrain.material,
                    transform: terrain.transform(),
                    slot,
                };
                slot += 1;
                draw
            })
            .collect();

        let mut batches = Vec::new();
        for (model, entities) in batcher.groups() {
            if entities.is_empty() {
                continue;
            }
            batches.push(DrawBatch {
                model,
                first_slot: slot,
                entities: entities.to_vec(),
            });
            slot += entities.len() as u32;
        }

        Self {
            terrains,
            batches,
            slot_count: slot,
        }
    }

    pub fn terrain_draws(&self) -> &[TerrainDraw] {
        &self.terrains
    }

    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    /// Total uniform slots the frame needs (terrain tiles + entities).
    pub fn slot_count(&self) -> u32 {
        self.slot_count
    }

    /// Slot/transform pairs in slot order, terrain first.
    pub fn transforms(&self) -> impl Iterator<Item = (u32, Mat4)> + '_ {
        let terrain = self
            .terrains
            .iter()
            .map(|draw| (draw.slot, draw.transform));
        let entities = self.batches.iter().flat_map(|batch| {
            batch
                .entities
                .iter()
                .enumerate()
                .map(move |(i, entity)| (batch.first_slot + i as u32, entity.transform))
        });
        terrain.chain(entities)
    }

    /// One draw call per entity plus one per terrain tile.
    pub fn draw_call_count(&self) -> usize {
        self.terrains.len() + self.entity_draw_count()
    }

    pub fn entity_draw_count(&self) -> usize {
        self.batches.iter().map(|b| b.entities.len()).sum()
    }

    /// One bind sequence per distinct model plus one per terrain tile.
    pub fn bind_count(&self) -> usize {
        self.terrains.len() + self.batches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Handle;
    use crate::scene::Entity;
    use glam::Vec3;

    fn model(mesh: u32, material: u32) -> TexturedModel {
        TexturedModel::new(Handle::new(mesh), Handle::new(material))
    }

    #[test]
    fn empty_frame_plans_zero_draws() {
        let batcher = RenderBatcher::new();
        let plan = FramePlan::build(&batcher, &[]);

        assert_eq!(plan.draw_call_count(), 0);
        assert_eq!(plan.bind_count(), 0);
        assert_eq!(plan.slot_count(), 0);
    }

    #[test]
    fn cleared_groups_do_not_produce_draws() {
        let mut batcher = RenderBatcher::new();
        batcher.submit(&Entity::new(model(0, 0), Vec3::ZERO, Vec3::ZERO, 1.0));
        batcher.clear();

        let plan = FramePlan::build(&batcher, &[]);
        assert_eq!(plan.draw_call_count(), 0);
        assert_eq!(plan.bind_count(), 0);
    }

    #[test]
    fn slots_are_contiguous_and_unique() {
        let mut batcher = RenderBatcher::new();
        for i in 0..4 {
            batcher.submit(&Entity::new(
                model(i % 2, 0),
                Vec3::new(i as f32, 0.0, 0.0),
                Vec3::ZERO,
                1.0,
            ));
        }

        let plan = FramePlan::build(&batcher, &[]);
        let mut slots: Vec<u32> = plan.transforms().map(|(slot, _)| slot).collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![0, 1, 2, 3]);
        assert_eq!(plan.slot_count(), 4);
    }
}
