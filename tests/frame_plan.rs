//! Draw-call accounting for batched frames, checked without a GPU device:
//! the plan stage fixes how many binds and draws a frame will record.

use glam::Vec3;

use wgpu_terra::asset::Handle;
use wgpu_terra::renderer::{FramePlan, RenderBatcher, TexturedModel};
use wgpu_terra::scene::Entity;
use wgpu_terra::terrain::Terrain;

fn model(mesh: u32, material: u32) -> TexturedModel {
    TexturedModel::new(Handle::new(mesh), Handle::new(material))
}

fn entity_at(model: TexturedModel, x: f32) -> Entity {
    Entity::new(model, Vec3::new(x, 0.0, 7.5), Vec3::new(0.0, x, 0.0), 1.0)
}

#[test]
fn two_hundred_entities_sharing_a_model_bind_once_and_draw_each() {
    let mut batcher = RenderBatcher::new();
    let shared = model(0, 0);

    for i in 0..200 {
        batcher.submit(&entity_at(shared, i as f32));
    }

    let plan = FramePlan::build(&batcher, &[]);

    assert_eq!(plan.bind_count(), 1);
    assert_eq!(plan.draw_call_count(), 200);
    assert_eq!(plan.batches().len(), 1);
    assert_eq!(plan.batches()[0].entities.len(), 200);
}

#[test]
fn distinct_models_bind_and_draw_separately() {
    let mut batcher = RenderBatcher::new();
    batcher.submit(&entity_at(model(0, 0), 0.0));
    batcher.submit(&entity_at(model(1, 1), 1.0));

    let plan = FramePlan::build(&batcher, &[]);

    assert_eq!(plan.bind_count(), 2);
    assert_eq!(plan.draw_call_count(), 2);
}

#[test]
fn no_submissions_means_no_draws() {
    let batcher = RenderBatcher::new();
    let plan = FramePlan::build(&batcher, &[]);
    assert_eq!(plan.draw_call_count(), 0);
    assert_eq!(plan.bind_count(), 0);
}

#[test]
fn clearing_forgets_the_previous_frame() {
    let mut batcher = RenderBatcher::new();
    for i in 0..10 {
        batcher.submit(&entity_at(model(i, 0), i as f32));
    }
    assert_eq!(FramePlan::build(&batcher, &[]).draw_call_count(), 10);

    batcher.clear();

    assert!(batcher.is_empty());
    let plan = FramePlan::build(&batcher, &[]);
    assert_eq!(plan.draw_call_count(), 0);
    assert_eq!(plan.bind_count(), 0);
}

#[test]
fn terrain_tiles_add_one_bind_and_draw_each() {
    let mut batcher = RenderBatcher::new();
    batcher.submit(&entity_at(model(0, 0), 0.0));

    let tile_mesh: Handle<_> = Handle::new(5);
    let ground: Handle<_> = Handle::new(3);
    let terrains = [
        Terrain::new(0, -1, tile_mesh, ground),
        Terrain::new(-1, -1, tile_mesh, ground),
    ];

    let plan = FramePlan::build(&batcher, &terrains);

    assert_eq!(plan.terrain_draws().len(), 2);
    assert_eq!(plan.bind_count(), 3);
    assert_eq!(plan.draw_call_count(), 3);
}

#[test]
fn every_submission_gets_its_own_uniform_slot() {
    let mut batcher = RenderBatcher::new();
    let a = model(0, 0);
    let b = model(1, 0);
    for i in 0..6 {
        batcher.submit(&entity_at(if i % 2 == 0 { a } else { b }, i as f32));
    }

    let tile_mesh: Handle<_> = Handle::new(9);
    let ground: Handle<_> = Handle::new(9);
    let terrains = [Terrain::new(0, 0, tile_mesh, ground)];

    let plan = FramePlan::build(&batcher, &terrains);

    let mut slots: Vec<u32> = plan.transforms().map(|(slot, _)| slot).collect();
    slots.sort_unstable();
    let expected: Vec<u32> = (0..plan.slot_count()).collect();
    assert_eq!(slots, expected);

    // Slots within a batch are contiguous, starting at first_slot.
    for batch in plan.batches() {
        let end = batch.first_slot + batch.entities.len() as u32;
        assert!(end <= plan.slot_count());
    }
}

#[test]
fn resubmitting_after_a_flush_rebuilds_the_same_plan() {
    let mut batcher = RenderBatcher::new();
    let shared = model(2, 4);

    for round in 0..3 {
        for i in 0..20 {
            batcher.submit(&entity_at(shared, i as f32));
        }
        let plan = FramePlan::build(&batcher, &[]);
        assert_eq!(plan.bind_count(), 1, "round {round}");
        assert_eq!(plan.draw_call_count(), 20, "round {round}");
        batcher.clear();
    }
}
