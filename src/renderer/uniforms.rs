use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::scene::{Camera, Light};

/// Per-frame camera constants: combined view-projection plus the world-space
/// eye position the fragment stage needs for specular highlights.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _pad: f32,
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            _pad: 0.0,
        }
    }

    pub fn from_camera(camera: &Camera, aspect: f32) -> Self {
        Self {
            view_proj: camera.view_proj(aspect).to_cols_array_2d(),
            position: camera.position.to_array(),
            _pad: 0.0,
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// The single sun light uploaded once per frame.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub color: [f32; 3],
    pub _pad1: f32,
}

impl LightUniform {
    pub fn from_light(light: &Light) -> Self {
        Self {
            position: light.position.to_array(),
            _pad0: 0.0,
            color: light.color.to_array(),
            _pad1: 0.0,
        }
    }
}

/// Per-draw transform, written at a dynamic offset per entity slot.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct EntityUniform {
    pub model: [[f32; 4]; 4],
}

impl EntityUniform {
    pub fn from_matrix(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// Specular response constants, one buffer per material.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct MaterialUniform {
    pub shine_damper: f32,
    pub reflectivity: f32,
    pub _pad: [f32; 2],
}

impl MaterialUniform {
    pub fn new(shine_damper: f32, reflectivity: f32) -> Self {
        Self {
            shine_damper,
            reflectivity,
            _pad: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_uniform_is_80_bytes() {
        // mat4x4<f32> + vec3<f32> + padding
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn light_uniform_is_32_bytes() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 32);
    }

    #[test]
    fn entity_uniform_is_64_bytes() {
        assert_eq!(std::mem::size_of::<EntityUniform>(), 64);
    }

    #[test]
    fn material_uniform_is_16_bytes() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 16);
    }
}
