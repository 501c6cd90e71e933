pub mod camera;
pub mod entity;
pub mod input;
pub mod light;

pub use camera::Camera;
pub use entity::Entity;
pub use input::InputState;
pub use light::Light;

use glam::Vec3;

use crate::asset::{self, Assets};
use crate::renderer::{Material, RenderBatcher, Renderer, Texture, TexturedModel};
use crate::terrain::{self, Terrain};

/// Everything the demo world holds: the asset registries, the renderable
/// content, the camera and the sun, plus the frame batcher.
pub struct Scene {
    pub assets: Assets,
    pub entities: Vec<Entity>,
    pub terrains: Vec<Terrain>,
    pub camera: Camera,
    pub light: Light,
    batcher: RenderBatcher,
}

impl Scene {
    /// Build the demo world from the `res/` directory. Any missing or
    /// malformed asset is fatal; the error names the file.
    pub fn load(renderer: &Renderer) -> anyhow::Result<Self> {
        let device = renderer.device();
        let queue = renderer.queue();
        let mut assets = Assets::new();

        let dragon_mesh = assets
            .meshes
            .insert(asset::load_obj(device, "res/dragon.obj")?);
        let dragon_texture = assets
            .textures
            .insert(Texture::from_path(device, queue, "res/dragon.png")?);
        let dragon_material = assets
            .materials
            .insert(Material::new(dragon_texture).with_shine(10.0, 1.0));
        let dragon = TexturedModel::new(dragon_mesh, dragon_material);

        let grass_texture = assets
            .textures
            .insert(Texture::from_path(device, queue, "res/grass.png")?);
        let grass_material = assets.materials.insert(Material::new(grass_texture));
        let tile_mesh = assets.meshes.insert(terrain::generate_mesh(device));

        let entities = vec![Entity::new(
            dragon,
            Vec3::new(0.0, 0.0, -25.0),
            Vec3::ZERO,
            1.0,
        )];

        let terrains = vec![
            Terrain::new(0, -1, tile_mesh, grass_material),
            Terrain::new(-1, -1, tile_mesh, grass_material),
        ];

        Ok(Self {
            assets,
            entities,
            terrains,
            camera: Camera::default(),
            light: Light::new(Vec3::new(200.0, 200.0, 100.0), Vec3::ONE),
            batcher: RenderBatcher::new(),
        })
    }

    pub fn update(&mut self, dt: f32, input: &InputState) {
        self.camera.update(input, dt);
        for entity in &mut self.entities {
            entity.increase_rotation(0.0, 60.0 * dt, 0.0);
        }
    }

    /// Submit every entity, then flush the frame through the renderer.
    pub fn render(&mut self, renderer: &mut Renderer) -> Result<(), wgpu::SurfaceError> {
        for entity in &self.entities {
            self.batcher.submit(entity);
        }
        renderer.render(
            &self.assets,
            &mut self.batcher,
            &self.terrains,
            &self.light,
            &self.camera,
        )
    }
}
