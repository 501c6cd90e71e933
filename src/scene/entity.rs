use glam::{Mat4, Vec3};

use crate::renderer::TexturedModel;

/// One renderable instance: a shared model plus its own world transform.
///
/// Game logic mutates position and rotation every frame and resubmits the
/// entity to the batcher. The entity only references GPU resources through
/// handles; keeping those handles valid for the entity's lifetime is the
/// owner's responsibility.
#[derive(Debug, Clone, Copy)]
pub struct Entity {
    pub model: TexturedModel,
    pub position: Vec3,
    /// Euler rotation in degrees around X, Y, Z.
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f32,
}

impl Entity {
    pub fn new(model: TexturedModel, position: Vec3, rotation: Vec3, scale: f32) -> Self {
        Self {
            model,
            position,
            rotation,
            scale,
        }
    }

    pub fn increase_position(&mut self, dx: f32, dy: f32, dz: f32) {
        self.position += Vec3::new(dx, dy, dz);
    }

    pub fn increase_rotation(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation += Vec3::new(dx, dy, dz);
    }

    /// World transform: translate, rotate X then Y then Z, scale.
    pub fn transform_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rotation.x.to_radians())
            * Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_z(self.rotation.z.to_radians())
            * Mat4::from_scale(Vec3::splat(self.scale))
    }
}
